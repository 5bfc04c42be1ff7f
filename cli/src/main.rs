//! Bank simulator CLI
//!
//! Searches the space of duration-partitioned line layouts for one that
//! beats the single shared line on both reported means, then confirms the
//! winner over a larger trial count.
//!
//! ```text
//! bank-simulator [search-config.json]
//! bank-simulator --replay <arrival-file> <service-file>
//! ```
//!
//! Replay mode runs one single-line trial from two debug delay files (one
//! integer per line, equal line counts) and prints the per-pass trace.

use bank_simulator_core::{
    read_delay_file, run_trials, stats, AggregateResult, DelayModel, PolicyConfig, RngManager,
    SimulationConfig, Trial,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::error::Error;
use std::process;

/// Partition search configuration, loadable from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct SearchConfig {
    /// Size of the teller pool
    teller_count: usize,
    /// Customers per trial
    customer_count: usize,
    /// Inter-arrival delay probability table
    arrival_delays: Vec<(usize, f64)>,
    /// Service duration probability table
    service_durations: Vec<(usize, f64)>,
    /// Fraction of covering partition sets to screen
    partition_fraction: f64,
    /// Trials per candidate in the screening pass
    screening_trials: usize,
    /// Trials for the final baseline-vs-winner comparison
    confirmation_trials: usize,
    /// Master seed for sampling and every simulation run
    rng_seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            teller_count: 1,
            customer_count: 100,
            arrival_delays: vec![(0, 0.25), (1, 0.5), (2, 0.25)],
            service_durations: vec![(1, 0.25), (2, 0.25), (3, 0.25), (4, 0.25)],
            partition_fraction: 0.001,
            screening_trials: 100,
            confirmation_trials: 10_000,
            rng_seed: 42,
        }
    }
}

impl SearchConfig {
    fn simulation(&self, policy: PolicyConfig) -> SimulationConfig {
        SimulationConfig {
            teller_count: self.teller_count,
            customer_count: self.customer_count,
            arrival_delays: DelayModel::Table {
                entries: self.arrival_delays.clone(),
            },
            service_durations: DelayModel::Table {
                entries: self.service_durations.clone(),
            },
            policy,
            accounting: Default::default(),
            rng_seed: self.rng_seed,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("--replay") => {
            if args.len() != 3 {
                return Err("usage: bank-simulator --replay <arrival-file> <service-file>".into());
            }
            replay(&args[1], &args[2])
        }
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            search(serde_json::from_str(&text)?)
        }
        None => search(SearchConfig::default()),
    }
}

/// Run one traced single-line trial from two debug delay files
fn replay(arrival_path: &str, service_path: &str) -> Result<(), Box<dyn Error>> {
    let arrivals = read_delay_file(arrival_path)?;
    let services = read_delay_file(service_path)?;

    let config = SimulationConfig {
        teller_count: 1,
        customer_count: services.len(),
        arrival_delays: DelayModel::Replay { values: arrivals },
        service_durations: DelayModel::Replay { values: services },
        policy: PolicyConfig::SingleLine,
        accounting: Default::default(),
        rng_seed: 0,
    };

    let mut trial = Trial::new(&config)?;
    while !trial.is_complete() {
        let pass = trial.step()?;
        let lengths: Vec<usize> = trial.lines().iter().map(|line| line.len()).collect();
        println!(
            "tick {:>4}  completions {}  arrival {:>4}  started {}  lines {:?}{}",
            pass.tick,
            pass.completions,
            pass.arrival_line
                .map(|i| i.to_string())
                .unwrap_or_else(|| "-".to_string()),
            pass.services_started,
            lengths,
            if pass.advanced { "" } else { "  (clock held)" },
        );
    }

    println!("Queue lengths: {:?}", trial.queue_samples());
    println!("Wait times: {:?}", trial.wait_samples());
    println!(
        "Mean queue length and wait time: {}, {}",
        stats::mean_counts(trial.queue_samples(), "queue length")?,
        stats::mean_counts(trial.wait_samples(), "wait time")?,
    );
    Ok(())
}

/// Screen a sampled fraction of covering partition sets against the
/// single-line baseline and confirm the best survivor
fn search(config: SearchConfig) -> Result<(), Box<dyn Error>> {
    let domain: Vec<usize> = config.service_durations.iter().map(|(d, _)| *d).collect();

    let mut candidates = covering_partition_sets(&domain);
    let total = candidates.len();

    let mut rng = RngManager::new(config.rng_seed);
    let sample_size = ((config.partition_fraction * total as f64) as usize).min(total);
    sample_in_place(&mut candidates, sample_size, &mut rng);
    println!(
        "Screening {} of {} covering partition sets over {} trials each.",
        candidates.len(),
        total,
        config.screening_trials
    );

    let baseline = run_trials(
        &config.simulation(PolicyConfig::SingleLine),
        config.screening_trials,
    )?;

    let mut passing: Vec<(Vec<Vec<usize>>, AggregateResult)> = Vec::new();
    for partitions in candidates {
        let policy = PolicyConfig::Partitioned {
            partitions: partitions.clone(),
        };
        let result = run_trials(&config.simulation(policy), config.screening_trials)?;
        if result.mean_queue_length < baseline.mean_queue_length
            && result.mean_wait_time < baseline.mean_wait_time
        {
            passing.push((partitions, result));
        }
    }

    println!("{} candidates found.", passing.len());
    let Some((partitions, _)) = passing.into_iter().min_by(|(_, a), (_, b)| {
        // Product of margins against the baseline as the heuristic.
        let margin = |r: &AggregateResult| {
            (baseline.mean_queue_length - r.mean_queue_length)
                * (baseline.mean_wait_time - r.mean_wait_time)
        };
        margin(a).total_cmp(&margin(b))
    }) else {
        println!("No partition layout beat the single line.");
        return Ok(());
    };

    println!("Top candidate: {:?}", partitions);

    let large_baseline = run_trials(
        &config.simulation(PolicyConfig::SingleLine),
        config.confirmation_trials,
    )?;
    let large_winner = run_trials(
        &config.simulation(PolicyConfig::Partitioned { partitions }),
        config.confirmation_trials,
    )?;

    println!(
        "Mean baseline queue length and wait time: {}, {}",
        large_baseline.mean_queue_length, large_baseline.mean_wait_time
    );
    println!(
        "Mean optimized queue length and wait time: {}, {}",
        large_winner.mean_queue_length, large_winner.mean_wait_time
    );
    Ok(())
}

/// Every ordered tuple of non-empty duration subsets, for line counts
/// 2..=domain size, that jointly covers the whole domain
fn covering_partition_sets(domain: &[usize]) -> Vec<Vec<Vec<usize>>> {
    let subsets = nonempty_subsets(domain);
    let mut covering = Vec::new();

    for line_count in 2..=domain.len() {
        // Odometer over subsets^line_count.
        let mut odometer = vec![0usize; line_count];
        loop {
            let candidate: Vec<Vec<usize>> =
                odometer.iter().map(|&i| subsets[i].clone()).collect();
            if covers(&candidate, domain) {
                covering.push(candidate);
            }

            let mut digit = line_count;
            loop {
                if digit == 0 {
                    break;
                }
                digit -= 1;
                odometer[digit] += 1;
                if odometer[digit] < subsets.len() {
                    break;
                }
                odometer[digit] = 0;
            }
            if odometer.iter().all(|&i| i == 0) {
                break;
            }
        }
    }
    covering
}

fn nonempty_subsets(domain: &[usize]) -> Vec<Vec<usize>> {
    (1u32..(1 << domain.len()))
        .map(|bits| {
            domain
                .iter()
                .enumerate()
                .filter(|(i, _)| bits & (1 << i) != 0)
                .map(|(_, d)| *d)
                .collect()
        })
        .collect()
}

fn covers(partitions: &[Vec<usize>], domain: &[usize]) -> bool {
    domain
        .iter()
        .all(|d| partitions.iter().any(|p| p.contains(d)))
}

/// Keep a uniform sample of `k` elements, in place (partial Fisher-Yates)
fn sample_in_place<T>(items: &mut Vec<T>, k: usize, rng: &mut RngManager) {
    let k = k.min(items.len());
    for i in 0..k {
        let j = i + rng.index(items.len() - i);
        items.swap(i, j);
    }
    items.truncate(k);
}

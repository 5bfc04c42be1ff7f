//! Trial runner
//!
//! Runs N independent trials of one configuration and reduces their
//! per-trial means to two grand means. Each trial gets its own seed,
//! delay sources, lines, tellers, and policy cursor, so trials share no
//! mutable state — the engine itself stays sequential, but nothing here
//! would stop a caller from farming trials out one-per-worker.

use crate::engine::{SimulationConfig, SimulationError, Trial, TrialResult};
use crate::rng::RngManager;
use crate::stats;
use serde::{Deserialize, Serialize};

/// Grand means over a whole run of trials
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Mean of the per-trial mean queue lengths
    pub mean_queue_length: f64,
    /// Mean of the per-trial mean wait times
    pub mean_wait_time: f64,
}

/// Run `trial_count` independent trials and average their means
///
/// Per-trial seeds are drawn from a master generator seeded with the
/// configuration's `rng_seed`, so a run is reproducible end to end while
/// every trial still sees an independent stream.
///
/// Zero trials is a degenerate run and fails with
/// [`SimulationError::Statistics`], like any other empty sample set.
///
/// # Example
/// ```
/// use bank_simulator_core::{run_trials, DelayModel, PolicyConfig, SimulationConfig};
///
/// let config = SimulationConfig {
///     teller_count: 1,
///     customer_count: 20,
///     arrival_delays: DelayModel::Table {
///         entries: vec![(0, 0.25), (1, 0.5), (2, 0.25)],
///     },
///     service_durations: DelayModel::Table {
///         entries: vec![(1, 0.5), (2, 0.5)],
///     },
///     policy: PolicyConfig::SingleLine,
///     accounting: Default::default(),
///     rng_seed: 42,
/// };
///
/// let aggregate = run_trials(&config, 10).unwrap();
/// assert!(aggregate.mean_wait_time >= 0.0);
/// ```
pub fn run_trials(
    config: &SimulationConfig,
    trial_count: usize,
) -> Result<AggregateResult, SimulationError> {
    let results = run_trial_results(config, trial_count)?;

    let queue_means: Vec<f64> = results.iter().map(|r| r.mean_queue_length).collect();
    let wait_means: Vec<f64> = results.iter().map(|r| r.mean_wait_time).collect();

    Ok(AggregateResult {
        mean_queue_length: stats::mean(&queue_means, "per-trial queue length")?,
        mean_wait_time: stats::mean(&wait_means, "per-trial wait time")?,
    })
}

/// Run `trial_count` independent trials and return every trial's result
///
/// Same seeding scheme as [`run_trials`]; useful when the caller wants the
/// per-trial spread rather than just the grand means.
pub fn run_trial_results(
    config: &SimulationConfig,
    trial_count: usize,
) -> Result<Vec<TrialResult>, SimulationError> {
    let mut master = RngManager::new(config.rng_seed);
    let mut results = Vec::with_capacity(trial_count);

    for _ in 0..trial_count {
        let seed = master.next();
        let mut trial = Trial::with_seed(config, seed)?;
        results.push(trial.run()?);
    }

    Ok(results)
}

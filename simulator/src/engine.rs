//! Trial engine
//!
//! One trial advances a bank from empty-and-idle back to empty-and-idle in
//! discrete ticks. Within a pass of the loop, four ordered phases execute
//! exactly once — the order is load-bearing for the tie-break semantics of
//! simultaneous events:
//!
//! ```text
//! For each pass:
//! 1. Service completion  (free tellers whose completion tick is due)
//! 2. Arrival admission   (at most one customer joins a line)
//! 3. Service start       (idle tellers dequeue via the routing policy)
//! 4. Sampling + clock    (queue-length sample; advance time only when
//!                         nothing more can happen at this tick)
//! ```
//!
//! A pass is not always a tick: when a second arrival is due at the same
//! tick, phase 4 declines to advance the clock and the loop runs another
//! pass at the same tick. A customer arriving in that second pass finds
//! the teller already claimed by the first (phase 3 ran before it) and
//! waits.
//!
//! # Queue-length accounting
//!
//! Two accounting schemes for the "mean queue length" metric exist, and
//! they are not equivalent; [`QueueLengthAccounting`] makes the choice an
//! explicit configuration knob rather than silently picking one. See the
//! variant docs.

use crate::delays::{DelayModel, DelaySource};
use crate::models::{Customer, Line, Teller};
use crate::policy::{self, PolicyConfig, RoutingPolicy};
use crate::rng::RngManager;
use crate::stats;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by configuration validation and trial execution
///
/// None of these are recoverable: a malformed configuration invalidates
/// every trial identically, so all variants abort the run they occur in.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Configuration rejected at construction or trial start
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A replay delay source was asked for more values than it was given
    #[error("replay delay sequence exhausted after {supplied} values")]
    ExhaustedSequence { supplied: usize },

    /// An arriving customer's service duration matched no partition
    #[error("no partition accepts service duration {duration}")]
    Routing { duration: usize },

    /// A trial or run produced zero samples to average
    #[error("cannot take the mean of zero {0} samples")]
    Statistics(String),
}

/// When a customer's queue-length contribution is measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueLengthAccounting {
    /// Every service completion increments every waiting customer's
    /// exposure counter; the counter is recorded when the customer is
    /// dequeued for service. This measures how many server slots opened
    /// up while the customer waited, and is the original accounting.
    #[default]
    CompletionExposure,

    /// Each arrival event records the destination line's length once, at
    /// the end of the pass that admitted it (after the service-start
    /// phase may already have shortened the line).
    ArrivalSample,
}

/// Complete configuration for one simulated bank
///
/// # Example
/// ```
/// use bank_simulator_core::{
///     DelayModel, PolicyConfig, QueueLengthAccounting, SimulationConfig,
/// };
///
/// let config = SimulationConfig {
///     teller_count: 2,
///     customer_count: 100,
///     arrival_delays: DelayModel::Table {
///         entries: vec![(0, 0.25), (1, 0.5), (2, 0.25)],
///     },
///     service_durations: DelayModel::Table {
///         entries: vec![(1, 0.5), (2, 0.5)],
///     },
///     policy: PolicyConfig::SingleLine,
///     accounting: QueueLengthAccounting::CompletionExposure,
///     rng_seed: 42,
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Size of the teller pool (positive)
    pub teller_count: usize,
    /// Customers created per trial
    pub customer_count: usize,
    /// Delay stream spacing consecutive arrivals apart
    pub arrival_delays: DelayModel,
    /// Delay stream giving each customer its service duration
    pub service_durations: DelayModel,
    /// Routing policy the trial consults for placement and selection
    pub policy: PolicyConfig,
    /// Queue-length accounting scheme
    #[serde(default)]
    pub accounting: QueueLengthAccounting,
    /// Master seed; the runner derives one independent seed per trial
    pub rng_seed: u64,
}

impl SimulationConfig {
    /// Validate the configuration before any trial runs
    ///
    /// Checks, in order: positive teller pool, probability tables summing
    /// to exactly 1.0, equal-length replay sequences, and — when the
    /// service-duration domain is known from a table — that a partitioned
    /// policy covers it. Replay-mode coverage can only surface lazily, as
    /// a [`SimulationError::Routing`] at the first offending arrival.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.teller_count == 0 {
            return Err(SimulationError::Configuration(
                "teller_count must be positive".to_string(),
            ));
        }

        self.arrival_delays.validate()?;
        self.service_durations.validate()?;

        if let (Some(arrivals), Some(services)) = (
            self.arrival_delays.replay_len(),
            self.service_durations.replay_len(),
        ) {
            if arrivals != services {
                return Err(SimulationError::Configuration(format!(
                    "replay sequences differ in length: {} arrival delays vs {} service durations",
                    arrivals, services
                )));
            }
        }

        if let PolicyConfig::Partitioned { partitions } = &self.policy {
            if partitions.is_empty() {
                return Err(SimulationError::Configuration(
                    "partitioned policy needs at least one partition".to_string(),
                ));
            }
            if let Some(domain) = self.service_durations.table_domain() {
                policy::validate_coverage(partitions, &domain)?;
            }
        }

        Ok(())
    }
}

/// What one pass of the trial loop did
///
/// Returned by [`Trial::step`] for debug traces and tick-exact tests.
/// `advanced` is false when the pass left the clock alone because more
/// work (another arrival, a service start) was still possible at the
/// current tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickResult {
    /// Tick this pass executed at
    pub tick: usize,
    /// Tellers freed in the completion phase
    pub completions: usize,
    /// Line index an arrival joined, if one was admitted
    pub arrival_line: Option<usize>,
    /// Services started in the service-start phase
    pub services_started: usize,
    /// Whether the clock advanced at the end of the pass
    pub advanced: bool,
}

/// Summary statistics of one completed trial
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    /// Mean of the queue-length accumulator
    pub mean_queue_length: f64,
    /// Mean of the recorded per-customer wait times
    pub mean_wait_time: f64,
}

/// One trial of the bank: fresh delay sources, lines, tellers, and policy
///
/// # Example
/// ```
/// use bank_simulator_core::{DelayModel, PolicyConfig, SimulationConfig, Trial};
///
/// let config = SimulationConfig {
///     teller_count: 1,
///     customer_count: 3,
///     arrival_delays: DelayModel::Replay { values: vec![0, 5, 0] },
///     service_durations: DelayModel::Replay { values: vec![3, 2, 1] },
///     policy: PolicyConfig::SingleLine,
///     accounting: Default::default(),
///     rng_seed: 1,
/// };
///
/// let mut trial = Trial::new(&config).unwrap();
/// let result = trial.run().unwrap();
/// assert_eq!(result.mean_wait_time, 2.0 / 3.0);
/// ```
pub struct Trial {
    current_tick: usize,
    next_arrival_tick: usize,
    customers_left: usize,
    lines: Vec<Line>,
    tellers: Vec<Teller>,
    arrivals: DelaySource,
    services: DelaySource,
    policy: Box<dyn RoutingPolicy>,
    rng: RngManager,
    accounting: QueueLengthAccounting,
    wait_times: Vec<usize>,
    queue_lengths: Vec<usize>,
}

impl Trial {
    /// Set up a trial seeded with the configuration's master seed
    pub fn new(config: &SimulationConfig) -> Result<Self, SimulationError> {
        Self::with_seed(config, config.rng_seed)
    }

    /// Set up a trial with an explicit seed (the runner derives one per
    /// trial so that trials share no RNG state)
    ///
    /// Validates the configuration and draws the first inter-arrival
    /// delay: the first customer arrives at that tick.
    pub fn with_seed(config: &SimulationConfig, seed: u64) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut rng = RngManager::new(seed);
        let mut arrivals = DelaySource::build(&config.arrival_delays)?;
        let services = DelaySource::build(&config.service_durations)?;
        let policy = policy::create_policy(&config.policy)?;
        let next_arrival_tick = arrivals.next_delay(&mut rng)?;

        Ok(Self {
            current_tick: 0,
            next_arrival_tick,
            customers_left: config.customer_count,
            lines: (0..policy.line_count()).map(|_| Line::new()).collect(),
            tellers: vec![Teller::idle(); config.teller_count],
            arrivals,
            services,
            policy,
            rng,
            accounting: config.accounting,
            wait_times: Vec::new(),
            queue_lengths: Vec::new(),
        })
    }

    /// Current value of the simulation clock
    pub fn current_tick(&self) -> usize {
        self.current_tick
    }

    /// Customers not yet admitted
    pub fn customers_left(&self) -> usize {
        self.customers_left
    }

    /// The lines, in policy index order
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The teller pool
    pub fn tellers(&self) -> &[Teller] {
        &self.tellers
    }

    /// Wait-time samples recorded so far, in service-start order
    pub fn wait_samples(&self) -> &[usize] {
        &self.wait_times
    }

    /// Queue-length samples recorded so far
    pub fn queue_samples(&self) -> &[usize] {
        &self.queue_lengths
    }

    /// Whether the trial has reached quiescence
    ///
    /// True once no customers remain to arrive, every line is empty, and
    /// no teller is busy.
    pub fn is_complete(&self) -> bool {
        self.customers_left == 0
            && self.lines.iter().all(Line::is_empty)
            && self.tellers.iter().all(|teller| !teller.is_busy())
    }

    /// Execute one pass of the four phases
    pub fn step(&mut self) -> Result<TickResult, SimulationError> {
        let now = self.current_tick;

        // Phase 1: free tellers whose service has run its course. Under
        // completion-exposure accounting each completion credits every
        // still-waiting customer with one opened slot.
        let mut completions = 0;
        for i in 0..self.tellers.len() {
            if self.tellers[i].is_due(now) {
                self.tellers[i].finish();
                completions += 1;
                if self.accounting == QueueLengthAccounting::CompletionExposure {
                    for line in &mut self.lines {
                        for customer in line.iter_mut() {
                            customer.increment_exposure();
                        }
                    }
                }
            }
        }

        // Phase 2: admit at most one arrival, then schedule the next one
        // unless this was the last customer.
        let mut arrival_line = None;
        if self.next_arrival_tick <= now && self.customers_left > 0 {
            let duration = self.services.next_delay(&mut self.rng)?;
            let customer = Customer::new(duration);
            let index = self
                .policy
                .handle_arrival(&self.lines, &customer, &mut self.rng)?;
            self.lines[index].push_back(customer);
            self.customers_left -= 1;
            if self.customers_left != 0 {
                let delay = self.arrivals.next_delay(&mut self.rng)?;
                self.next_arrival_tick = now + delay;
            }
            arrival_line = Some(index);
        }

        // Phase 3: idle tellers dequeue from whichever line the policy
        // selects. Wait time is recorded at the moment service begins.
        let mut services_started = 0;
        for i in 0..self.tellers.len() {
            if !self.tellers[i].is_busy() && self.lines.iter().any(|line| !line.is_empty()) {
                let index = self.policy.handle_service(&self.lines);
                // handle_service only returns non-empty lines
                if let Some(customer) = self.lines[index].pop_front() {
                    self.wait_times.push(customer.wait_time());
                    if self.accounting == QueueLengthAccounting::CompletionExposure {
                        self.queue_lengths.push(customer.queue_exposure());
                    }
                    self.tellers[i].start(now, customer.service_duration());
                    services_started += 1;
                }
            }
        }

        // Phase 4: sample the arrival's destination line after phase 3 has
        // had its chance to shorten it, then advance the clock only if no
        // teller can start more work this tick and no arrival is due.
        if self.accounting == QueueLengthAccounting::ArrivalSample {
            if let Some(index) = arrival_line {
                self.queue_lengths.push(self.lines[index].len());
            }
        }

        let no_service_can_start = self
            .tellers
            .iter()
            .all(|teller| !teller.is_busy() || teller.completion_tick() > now);
        let arrival_pending = self.next_arrival_tick <= now && self.customers_left > 0;

        let advanced = no_service_can_start && !arrival_pending;
        if advanced {
            self.current_tick += 1;
            for line in &mut self.lines {
                for customer in line.iter_mut() {
                    customer.increment_wait();
                }
            }
        }

        Ok(TickResult {
            tick: now,
            completions,
            arrival_line,
            services_started,
            advanced,
        })
    }

    /// Run the trial to quiescence and return its two means
    ///
    /// Termination is guaranteed: every arrival decrements the
    /// remaining-customer counter and every completion tick is finite.
    pub fn run(&mut self) -> Result<TrialResult, SimulationError> {
        while !self.is_complete() {
            self.step()?;
        }
        Ok(TrialResult {
            mean_queue_length: stats::mean_counts(&self.queue_lengths, "queue length")?,
            mean_wait_time: stats::mean_counts(&self.wait_times, "wait time")?,
        })
    }
}

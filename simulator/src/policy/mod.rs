//! Routing policies
//!
//! A routing policy makes the two line decisions a trial needs:
//!
//! 1. **Arrival**: which line does a newly created customer join?
//! 2. **Service**: which line's head customer does a freed teller take?
//!
//! Two policies exist in this domain, and only two, so the set is closed:
//!
//! - [`SingleLinePolicy`]: one shared line feeding the whole teller pool
//!   (the baseline every candidate is screened against).
//! - [`PartitionedPolicy`]: one line per partition of the service-duration
//!   domain, round-robin service selection across lines.
//!
//! Policies are built from a [`PolicyConfig`] via [`create_policy`]; a
//! fresh instance is built per trial so the round-robin cursor never leaks
//! between trials.

use crate::engine::SimulationError;
use crate::models::{Customer, Line};
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

pub mod partitioned;
pub mod single_line;

pub use partitioned::PartitionedPolicy;
pub use single_line::SingleLinePolicy;

/// Decision interface shared by all routing policies
///
/// `handle_service` must only be called when at least one line is
/// non-empty; the engine establishes that before asking.
pub trait RoutingPolicy {
    /// Number of lines this policy routes across
    fn line_count(&self) -> usize;

    /// Pick the line a newly arrived customer joins
    ///
    /// Returns a valid index in `[0, line_count)`, or
    /// [`SimulationError::Routing`] if no line is eligible for the
    /// customer's service duration.
    fn handle_arrival(
        &mut self,
        lines: &[Line],
        customer: &Customer,
        rng: &mut RngManager,
    ) -> Result<usize, SimulationError>;

    /// Pick the line whose head customer a freed teller serves next
    fn handle_service(&mut self, lines: &[Line]) -> usize;
}

/// Routing policy configuration
///
/// # Example
/// ```
/// use bank_simulator_core::policy::{create_policy, PolicyConfig, RoutingPolicy};
///
/// let config = PolicyConfig::Partitioned {
///     partitions: vec![vec![1, 2], vec![3, 4]],
/// };
/// let policy = create_policy(&config).unwrap();
/// assert_eq!(policy.line_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PolicyConfig {
    /// One shared line for the whole teller pool
    SingleLine,

    /// One line per partition of the service-duration domain
    Partitioned {
        /// Ordered partitions; partition i holds the durations line i accepts
        partitions: Vec<Vec<usize>>,
    },
}

impl PolicyConfig {
    /// Number of lines the configured policy will route across
    pub fn line_count(&self) -> usize {
        match self {
            PolicyConfig::SingleLine => 1,
            PolicyConfig::Partitioned { partitions } => partitions.len(),
        }
    }
}

/// Build a routing policy instance from its configuration
///
/// A partitioned configuration must declare at least one partition.
pub fn create_policy(config: &PolicyConfig) -> Result<Box<dyn RoutingPolicy>, SimulationError> {
    match config {
        PolicyConfig::SingleLine => Ok(Box::new(SingleLinePolicy::new())),
        PolicyConfig::Partitioned { partitions } => {
            if partitions.is_empty() {
                return Err(SimulationError::Configuration(
                    "partitioned policy needs at least one partition".to_string(),
                ));
            }
            Ok(Box::new(PartitionedPolicy::new(partitions.clone())))
        }
    }
}

/// Check that `partitions` jointly cover every duration in `domain`
///
/// Called at configuration time whenever the service-duration domain is
/// known up front (table mode). In replay mode coverage can only be
/// checked lazily, at the first offending arrival.
pub fn validate_coverage(
    partitions: &[Vec<usize>],
    domain: &[usize],
) -> Result<(), SimulationError> {
    let missing: Vec<usize> = domain
        .iter()
        .filter(|d| !partitions.iter().any(|p| p.contains(d)))
        .copied()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SimulationError::Configuration(format!(
            "partitions do not cover service durations {:?}",
            missing
        )))
    }
}

//! Partitioned policy
//!
//! Lines are partitioned by service duration: line i accepts only the
//! durations listed in partition i. An arrival joins a uniformly random
//! line among those eligible for its duration. Service selection is
//! round-robin across lines, so no line starves under a bounded arrival
//! rate and a selection costs at most one scan of the line set.

use super::RoutingPolicy;
use crate::engine::SimulationError;
use crate::models::{Customer, Line};
use crate::rng::RngManager;

/// One line per partition of the service-duration domain
///
/// The round-robin cursor persists across calls within a trial and starts
/// at line 0. It advances *before* testing, so with the cursor fresh at 0
/// the first scan examines line 1 first.
pub struct PartitionedPolicy {
    partitions: Vec<Vec<usize>>,
    cursor: usize,
}

impl PartitionedPolicy {
    /// Create a partitioned policy over the given duration partitions
    pub fn new(partitions: Vec<Vec<usize>>) -> Self {
        Self {
            partitions,
            cursor: 0,
        }
    }

    /// The duration partitions, in line order
    pub fn partitions(&self) -> &[Vec<usize>] {
        &self.partitions
    }
}

impl RoutingPolicy for PartitionedPolicy {
    fn line_count(&self) -> usize {
        self.partitions.len()
    }

    fn handle_arrival(
        &mut self,
        _lines: &[Line],
        customer: &Customer,
        rng: &mut RngManager,
    ) -> Result<usize, SimulationError> {
        let eligible: Vec<usize> = self
            .partitions
            .iter()
            .enumerate()
            .filter(|(_, partition)| partition.contains(&customer.service_duration()))
            .map(|(i, _)| i)
            .collect();

        if eligible.is_empty() {
            return Err(SimulationError::Routing {
                duration: customer.service_duration(),
            });
        }
        Ok(eligible[rng.index(eligible.len())])
    }

    fn handle_service(&mut self, lines: &[Line]) -> usize {
        debug_assert!(
            lines.iter().any(|line| !line.is_empty()),
            "handle_service called with every line empty"
        );
        loop {
            self.cursor = (self.cursor + 1) % self.partitions.len();
            if !lines[self.cursor].is_empty() {
                return self.cursor;
            }
        }
    }
}

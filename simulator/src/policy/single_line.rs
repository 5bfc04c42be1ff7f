//! Single-line policy
//!
//! The baseline: every customer joins the one shared line, and every freed
//! teller serves that line's head. Both decisions are the constant 0.

use super::RoutingPolicy;
use crate::engine::SimulationError;
use crate::models::{Customer, Line};
use crate::rng::RngManager;

/// Single shared line feeding the whole teller pool
pub struct SingleLinePolicy;

impl SingleLinePolicy {
    /// Create a new single-line policy
    pub fn new() -> Self {
        Self
    }
}

impl Default for SingleLinePolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutingPolicy for SingleLinePolicy {
    fn line_count(&self) -> usize {
        1
    }

    fn handle_arrival(
        &mut self,
        _lines: &[Line],
        _customer: &Customer,
        _rng: &mut RngManager,
    ) -> Result<usize, SimulationError> {
        Ok(0)
    }

    fn handle_service(&mut self, _lines: &[Line]) -> usize {
        0
    }
}

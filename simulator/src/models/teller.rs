//! Teller model
//!
//! A teller serves exactly one customer at a time. Between customers it is
//! stateless except for the completion deadline of the service in progress.

use serde::{Deserialize, Serialize};

/// One teller in the fixed-size server pool
///
/// # Example
/// ```
/// use bank_simulator_core::Teller;
///
/// let mut teller = Teller::idle();
/// assert!(!teller.is_busy());
///
/// teller.start(5, 3); // start at tick 5, duration 3
/// assert!(teller.is_busy());
/// assert!(!teller.is_due(7));
/// assert!(teller.is_due(8));
///
/// teller.finish();
/// assert!(!teller.is_busy());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teller {
    busy: bool,
    completion_tick: usize,
}

impl Teller {
    /// Create an idle teller
    pub fn idle() -> Self {
        Self {
            busy: false,
            completion_tick: 0,
        }
    }

    /// Whether this teller is currently serving a customer
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Tick at which the service in progress completes
    pub fn completion_tick(&self) -> usize {
        self.completion_tick
    }

    /// Whether the service in progress has run its course by `now`
    pub fn is_due(&self, now: usize) -> bool {
        self.busy && self.completion_tick <= now
    }

    /// Begin serving a customer at tick `now` for `duration` ticks
    pub fn start(&mut self, now: usize, duration: usize) {
        self.busy = true;
        self.completion_tick = now + duration;
    }

    /// Release the teller after a completed service
    pub fn finish(&mut self) {
        self.busy = false;
    }
}

impl Default for Teller {
    fn default() -> Self {
        Self::idle()
    }
}

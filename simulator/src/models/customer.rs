//! Customer model
//!
//! A customer is a value record: it carries the service duration drawn for
//! it on arrival plus two counters accumulated while it waits in a line.
//! The line owns the customer until a teller dequeues it; once its counters
//! are recorded into the trial accumulators the record is discarded.

use serde::{Deserialize, Serialize};

/// A customer waiting for (or receiving) service
///
/// # Example
/// ```
/// use bank_simulator_core::Customer;
///
/// let mut customer = Customer::new(3);
/// assert_eq!(customer.service_duration(), 3);
/// assert_eq!(customer.wait_time(), 0);
///
/// customer.increment_wait();
/// assert_eq!(customer.wait_time(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Ticks of teller time this customer requires
    service_duration: usize,
    /// Full ticks spent waiting in a line before service began
    wait_time: usize,
    /// Service completions observed while this customer was waiting
    ///
    /// Only maintained under completion-exposure accounting; see
    /// [`QueueLengthAccounting`](crate::QueueLengthAccounting).
    queue_exposure: usize,
}

impl Customer {
    /// Create a new customer requiring `service_duration` ticks of service
    pub fn new(service_duration: usize) -> Self {
        Self {
            service_duration,
            wait_time: 0,
            queue_exposure: 0,
        }
    }

    /// Ticks of teller time this customer requires
    pub fn service_duration(&self) -> usize {
        self.service_duration
    }

    /// Full ticks this customer has waited so far
    pub fn wait_time(&self) -> usize {
        self.wait_time
    }

    /// Service completions observed while waiting
    pub fn queue_exposure(&self) -> usize {
        self.queue_exposure
    }

    /// Record one full tick spent waiting
    pub fn increment_wait(&mut self) {
        self.wait_time += 1;
    }

    /// Record one service completion observed while waiting
    pub fn increment_exposure(&mut self) {
        self.queue_exposure += 1;
    }
}

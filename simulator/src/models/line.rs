//! Line model
//!
//! A line is a FIFO queue of waiting customers. Insertion order is service
//! order within a line; which line gets served is the routing policy's call.

use crate::models::Customer;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A FIFO line of waiting customers
///
/// # Example
/// ```
/// use bank_simulator_core::{Customer, Line};
///
/// let mut line = Line::new();
/// assert!(line.is_empty());
///
/// line.push_back(Customer::new(2));
/// line.push_back(Customer::new(4));
/// assert_eq!(line.len(), 2);
///
/// let head = line.pop_front().unwrap();
/// assert_eq!(head.service_duration(), 2);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Line {
    customers: VecDeque<Customer>,
}

impl Line {
    /// Create a new empty line
    pub fn new() -> Self {
        Self {
            customers: VecDeque::new(),
        }
    }

    /// Append a newly arrived customer to the tail
    pub fn push_back(&mut self, customer: Customer) {
        self.customers.push_back(customer);
    }

    /// Dequeue the head customer for service, if any
    pub fn pop_front(&mut self) -> Option<Customer> {
        self.customers.pop_front()
    }

    /// Number of customers currently waiting in this line
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Whether the line holds no customers
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Iterate over the waiting customers, head first
    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter()
    }

    /// Mutably iterate over the waiting customers, head first
    ///
    /// The engine uses this to bump every waiting customer's counters when
    /// the clock advances or a service completes.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Customer> {
        self.customers.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut line = Line::new();
        line.push_back(Customer::new(1));
        line.push_back(Customer::new(2));
        line.push_back(Customer::new(3));

        assert_eq!(line.pop_front().unwrap().service_duration(), 1);
        assert_eq!(line.pop_front().unwrap().service_duration(), 2);
        assert_eq!(line.pop_front().unwrap().service_duration(), 3);
        assert!(line.pop_front().is_none());
    }
}

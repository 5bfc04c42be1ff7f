//! Summary statistics helpers
//!
//! A trial's only outputs are means of its two accumulators, and the
//! aggregator's only outputs are means of per-trial means. The mean of an
//! empty sample set is a [`SimulationError::Statistics`]: it signals a
//! degenerate trial (for example zero configured customers), never a
//! condition to recover from.

use crate::engine::SimulationError;

/// Arithmetic mean of a non-empty f64 sample set
///
/// # Example
/// ```
/// use bank_simulator_core::stats;
///
/// let mean = stats::mean(&[1.0, 2.0, 3.0], "wait time").unwrap();
/// assert_eq!(mean, 2.0);
///
/// assert!(stats::mean(&[], "wait time").is_err());
/// ```
pub fn mean(values: &[f64], what: &str) -> Result<f64, SimulationError> {
    if values.is_empty() {
        return Err(SimulationError::Statistics(what.to_string()));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Arithmetic mean of a non-empty integer sample set
pub fn mean_counts(values: &[usize], what: &str) -> Result<f64, SimulationError> {
    if values.is_empty() {
        return Err(SimulationError::Statistics(what.to_string()));
    }
    Ok(values.iter().sum::<usize>() as f64 / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_counts() {
        assert_eq!(mean_counts(&[0, 0, 1], "queue length").unwrap(), 1.0 / 3.0);
        assert_eq!(mean_counts(&[4], "queue length").unwrap(), 4.0);
    }

    #[test]
    fn test_empty_samples_fail() {
        let err = mean_counts(&[], "wait time").unwrap_err();
        assert!(matches!(err, SimulationError::Statistics(_)));
    }
}

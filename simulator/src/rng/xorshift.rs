//! xorshift64* random number generator
//!
//! A fast, high-quality PRNG that is deterministic and suitable for
//! simulation purposes. It uses 64-bit state and produces 64-bit output.
//!
//! # Determinism
//!
//! Same seed → same sequence of random numbers. This matters for:
//! - Debugging (reproduce an exact trial tick by tick)
//! - Testing (assert on concrete sampled values)
//! - Comparing routing policies (common random numbers across candidates)

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use bank_simulator_core::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let raw = rng.next();
/// let draw = rng.next_f64(); // [0.0, 1.0)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with the given seed
    ///
    /// A zero seed is remapped to 1 (xorshift requires nonzero state).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate the next random u64 value, advancing the internal state
    pub fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate a random f64 in [0.0, 1.0)
    ///
    /// Used as the uniform draw for inverse-CDF sampling from the
    /// configured delay probability tables.
    ///
    /// # Example
    /// ```
    /// use bank_simulator_core::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// let draw = rng.next_f64();
    /// assert!(draw >= 0.0 && draw < 1.0);
    /// ```
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // 53 high bits scaled into [0.0, 1.0)
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Pick a uniform random index in [0, len)
    ///
    /// Used by the partitioned routing policy to choose among eligible
    /// lines for an arriving customer.
    ///
    /// # Panics
    /// Panics if `len` is zero.
    pub fn index(&mut self, len: usize) -> usize {
        assert!(len > 0, "len must be positive");
        (self.next() % len as u64) as usize
    }

    /// Get the current RNG state (for reseeding a derived generator)
    pub fn get_state(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.get_state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    #[should_panic(expected = "len must be positive")]
    fn test_index_empty_range() {
        let mut rng = RngManager::new(12345);
        rng.index(0);
    }

    #[test]
    fn test_index_in_range() {
        let mut rng = RngManager::new(42);
        for _ in 0..1000 {
            let i = rng.index(7);
            assert!(i < 7, "index() produced out-of-range value {}", i);
        }
    }

    #[test]
    fn test_next_f64_in_range() {
        let mut rng = RngManager::new(12345);
        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!(
                val >= 0.0 && val < 1.0,
                "next_f64() produced value {} outside [0.0, 1.0)",
                val
            );
        }
    }
}

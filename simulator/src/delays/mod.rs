//! Delay sources for inter-arrival delays and service durations
//!
//! A trial pulls two independent streams of non-negative integer delays:
//! one spacing customer arrivals apart, one giving each customer its
//! service duration. Each stream comes from a [`DelaySource`] built from a
//! [`DelayModel`]:
//!
//! 1. **Table**: weighted categorical sampling from an ordered probability
//!    table, via an inverse-CDF walk over a uniform draw. Infinite and
//!    deterministic given the RNG seed.
//! 2. **Replay**: a finite literal sequence consumed front to back, for
//!    deterministic testing and debug traces.
//!
//! Probabilities must sum to exactly 1.0 — no tolerance. A table that does
//! not is a configuration error, caught when the source is built.

use crate::engine::SimulationError;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;

/// Configuration for one delay stream
///
/// Table entries are an *ordered* sequence of `(delay, probability)` pairs.
/// Order determines which entry covers which slice of the unit interval,
/// not the sampled distribution itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DelayModel {
    /// Weighted categorical distribution over delay values
    Table {
        /// Ordered `(delay, probability)` pairs; probabilities sum to 1.0
        entries: Vec<(usize, f64)>,
    },

    /// Literal delay sequence, consumed once, front to back
    Replay {
        /// Delay values in consumption order
        values: Vec<usize>,
    },
}

impl DelayModel {
    /// Validate the model at configuration time
    ///
    /// A table's probabilities must sum to exactly 1.0 (the original
    /// equality check, deliberately tolerance-free: configuration tables
    /// are expected to use exactly representable probabilities).
    pub fn validate(&self) -> Result<(), SimulationError> {
        match self {
            DelayModel::Table { entries } => {
                let total: f64 = entries.iter().map(|(_, p)| p).sum();
                if total != 1.0 {
                    return Err(SimulationError::Configuration(format!(
                        "delay probabilities must sum to 1.0, got {}",
                        total
                    )));
                }
                Ok(())
            }
            DelayModel::Replay { .. } => Ok(()),
        }
    }

    /// The set of delay values a table can produce, in table order
    ///
    /// `None` for replay models: their domain is whatever the supplied
    /// sequence happens to contain.
    pub fn table_domain(&self) -> Option<Vec<usize>> {
        match self {
            DelayModel::Table { entries } => {
                Some(entries.iter().map(|(delay, _)| *delay).collect())
            }
            DelayModel::Replay { .. } => None,
        }
    }

    /// Length of the replay sequence, if this is a replay model
    pub fn replay_len(&self) -> Option<usize> {
        match self {
            DelayModel::Table { .. } => None,
            DelayModel::Replay { values } => Some(values.len()),
        }
    }
}

/// A live delay stream for one trial
///
/// Built fresh per trial so that replay cursors never leak across trials.
///
/// # Example
/// ```
/// use bank_simulator_core::{DelayModel, DelaySource, RngManager};
///
/// let model = DelayModel::Table {
///     entries: vec![(0, 0.5), (2, 0.5)],
/// };
/// let mut source = DelaySource::build(&model).unwrap();
/// let mut rng = RngManager::new(7);
///
/// let delay = source.next_delay(&mut rng).unwrap();
/// assert!(delay == 0 || delay == 2);
/// ```
#[derive(Debug, Clone)]
pub enum DelaySource {
    /// Inverse-CDF sampler over an ordered probability table
    Weighted { entries: Vec<(usize, f64)> },

    /// Front-to-back replay of a finite sequence
    Replay {
        remaining: VecDeque<usize>,
        supplied: usize,
    },
}

impl DelaySource {
    /// Build a source from its model, validating table probabilities
    pub fn build(model: &DelayModel) -> Result<Self, SimulationError> {
        model.validate()?;
        Ok(match model {
            DelayModel::Table { entries } => DelaySource::Weighted {
                entries: entries.clone(),
            },
            DelayModel::Replay { values } => DelaySource::Replay {
                remaining: values.iter().copied().collect(),
                supplied: values.len(),
            },
        })
    }

    /// Produce the next delay in the stream
    ///
    /// Weighted sampling draws r uniform in [0, 1), then walks the table
    /// subtracting each probability from a remainder that starts at 1; the
    /// first entry whose remainder drops to or below r is selected. If
    /// floating-point residue leaves no entry selected, the draw is
    /// discarded and retried.
    ///
    /// Replay sources fail with [`SimulationError::ExhaustedSequence`] once
    /// the supplied sequence is consumed. The engine never asks for more
    /// delays than the configured customer count requires, so hitting this
    /// in practice means the replay files are shorter than that count.
    pub fn next_delay(&mut self, rng: &mut RngManager) -> Result<usize, SimulationError> {
        match self {
            DelaySource::Weighted { entries } => loop {
                let r = rng.next_f64();
                let mut remaining = 1.0;
                for (delay, probability) in entries.iter() {
                    remaining -= probability;
                    if remaining <= r {
                        return Ok(*delay);
                    }
                }
            },
            DelaySource::Replay {
                remaining,
                supplied,
            } => remaining
                .pop_front()
                .ok_or(SimulationError::ExhaustedSequence { supplied: *supplied }),
        }
    }
}

/// Load a debug replay file: one non-negative integer delay per line
///
/// The whole file is materialized before the trial starts; the engine never
/// performs I/O mid-trial. Unreadable files and unparseable lines are
/// configuration errors.
pub fn read_delay_file<P: AsRef<Path>>(path: P) -> Result<Vec<usize>, SimulationError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        SimulationError::Configuration(format!("cannot read delay file {}: {}", path.display(), e))
    })?;

    text.lines()
        .enumerate()
        .map(|(i, line)| {
            line.trim().parse::<usize>().map_err(|e| {
                SimulationError::Configuration(format!(
                    "bad delay on line {} of {}: {}",
                    i + 1,
                    path.display(),
                    e
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sum_validation() {
        let bad = DelayModel::Table {
            entries: vec![(0, 0.25), (1, 0.5)],
        };
        assert!(matches!(
            bad.validate(),
            Err(SimulationError::Configuration(_))
        ));

        let good = DelayModel::Table {
            entries: vec![(0, 0.25), (1, 0.5), (2, 0.25)],
        };
        assert!(good.validate().is_ok());
    }

    #[test]
    fn test_replay_pops_in_order() {
        let model = DelayModel::Replay {
            values: vec![3, 1, 4],
        };
        let mut source = DelaySource::build(&model).unwrap();
        let mut rng = RngManager::new(1);

        assert_eq!(source.next_delay(&mut rng).unwrap(), 3);
        assert_eq!(source.next_delay(&mut rng).unwrap(), 1);
        assert_eq!(source.next_delay(&mut rng).unwrap(), 4);
        assert!(matches!(
            source.next_delay(&mut rng),
            Err(SimulationError::ExhaustedSequence { supplied: 3 })
        ));
    }

    #[test]
    fn test_single_entry_table_always_samples_it() {
        let model = DelayModel::Table {
            entries: vec![(5, 1.0)],
        };
        let mut source = DelaySource::build(&model).unwrap();
        let mut rng = RngManager::new(99);

        for _ in 0..100 {
            assert_eq!(source.next_delay(&mut rng).unwrap(), 5);
        }
    }
}

//! Bank Simulator Core
//!
//! Discrete-tick simulation of a single-teller-pool bank, built to compare
//! queue-routing policies statistically: one shared line versus multiple
//! lines partitioned by expected service duration.
//!
//! # Architecture
//!
//! - **models**: Domain types (Customer, Line, Teller)
//! - **delays**: Delay sources (weighted categorical tables and replay)
//! - **policy**: Routing policies (single-line, partitioned round-robin)
//! - **engine**: The four-phase tick loop for one trial
//! - **runner**: N independent trials reduced to two grand means
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded xorshift64*)
//! 2. Phase order within a tick is fixed: completion, arrival, service
//!    start, sampling/clock — simultaneous-event tie-breaks depend on it
//! 3. Trials share no mutable state; every trial builds fresh sources,
//!    lines, tellers, and policy cursor

// Module declarations
pub mod delays;
pub mod engine;
pub mod models;
pub mod policy;
pub mod rng;
pub mod runner;
pub mod stats;

// Re-exports for convenience
pub use delays::{read_delay_file, DelayModel, DelaySource};
pub use engine::{
    QueueLengthAccounting, SimulationConfig, SimulationError, TickResult, Trial, TrialResult,
};
pub use models::{Customer, Line, Teller};
pub use policy::{create_policy, PartitionedPolicy, PolicyConfig, RoutingPolicy, SingleLinePolicy};
pub use rng::RngManager;
pub use runner::{run_trial_results, run_trials, AggregateResult};

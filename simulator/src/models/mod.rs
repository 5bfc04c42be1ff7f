//! Domain models for the bank simulator

pub mod customer;
pub mod line;
pub mod teller;

// Re-exports
pub use customer::Customer;
pub use line::Line;
pub use teller::Teller;

//! Built-in job implementations.

pub mod timeout;

pub use timeout::{SweepSummary, TimeoutSweeper};

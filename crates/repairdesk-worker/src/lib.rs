//! Scheduled work for RepairDesk.
//!
//! This crate provides:
//! - The timeout sweeper, a plain callable that any scheduler can drive
//! - A cron scheduler that drives it in-process

pub mod jobs;
pub mod scheduler;

pub use jobs::{SweepSummary, TimeoutSweeper};
pub use scheduler::CronScheduler;

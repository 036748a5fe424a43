//! # repairdesk-core
//!
//! Core crate for RepairDesk. Contains the unified error system,
//! configuration schemas, the cache provider trait, pagination types,
//! and the order lifecycle event.
//!
//! This crate has **no** internal dependencies on other RepairDesk crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;

//! Core type definitions used across the RepairDesk workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};

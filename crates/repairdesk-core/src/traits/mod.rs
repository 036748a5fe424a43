//! Core traits defined in `repairdesk-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;

//! # repairdesk-cache
//!
//! Cache provider implementations for RepairDesk. Supports two modes:
//!
//! - **memory**: In-process cache using [moka](https://crates.io/crates/moka)
//!   with per-entry TTLs
//! - **redis**: Redis-backed cache using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration. On top of
//! it, [`ReadCache`] offers the typed get/set/get-or-create surface the
//! order engine uses for list-style queries.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
pub mod read_cache;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
pub use read_cache::ReadCache;

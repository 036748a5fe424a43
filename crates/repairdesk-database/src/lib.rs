//! # repairdesk-database
//!
//! Durable store access for RepairDesk: the store traits the services
//! depend on, PostgreSQL repositories implementing them, and an
//! in-memory store for development and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::{DatabasePool, Stores};
pub use memory::MemoryStore;
pub use store::{NotificationStore, OrderStore, RolePermissionStore, UserStore};

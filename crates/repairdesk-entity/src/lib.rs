//! # repairdesk-entity
//!
//! Domain entity models for RepairDesk. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod notification;
pub mod order;
pub mod permission;
pub mod user;

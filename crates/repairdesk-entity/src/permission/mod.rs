//! Permission entities.

pub mod action;

pub use action::{Action, RolePermission};

//! # repairdesk-auth
//!
//! Authorization for RepairDesk.
//!
//! ## Modules
//!
//! - `rbac`: role to action resolution and enforcement
//! - `jwt`: decoding bearer tokens into a principal; a signing helper
//!   for development tokens and tests

pub mod jwt;
pub mod rbac;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use rbac::{PermissionResolver, RbacEnforcer, RolePolicies};

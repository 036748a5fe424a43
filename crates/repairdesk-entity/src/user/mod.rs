//! User domain entities.

pub mod model;
pub mod role;

pub use model::{CreateUser, MaintainerSummary, User};
pub use role::UserRole;

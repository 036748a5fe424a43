//! Role-based access control.

pub mod enforcer;
pub mod policies;
pub mod resolver;

pub use enforcer::RbacEnforcer;
pub use policies::RolePolicies;
pub use resolver::PermissionResolver;

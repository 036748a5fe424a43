//! RBAC enforcement: turns a missing capability into `Forbidden`.

use std::collections::HashSet;

use repairdesk_core::error::AppError;
use repairdesk_entity::permission::Action;

/// Checks resolved action sets against required actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    /// Returns `Ok(())` if `granted` contains `action`.
    pub fn require(granted: &HashSet<Action>, action: Action) -> Result<(), AppError> {
        if granted.contains(&action) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Missing permission '{action}'"
            )))
        }
    }

    /// Returns `Ok(())` if `granted` contains at least one of `actions`.
    pub fn require_any(granted: &HashSet<Action>, actions: &[Action]) -> Result<(), AppError> {
        if actions.iter().any(|a| granted.contains(a)) {
            Ok(())
        } else {
            let names: Vec<&str> = actions.iter().map(|a| a.as_str()).collect();
            Err(AppError::forbidden(format!(
                "Requires one of: {}",
                names.join(", ")
            )))
        }
    }
}

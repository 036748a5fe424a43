//! Effective permission resolution.
//!
//! The built-in [`RolePolicies`] are the single authority for defaults.
//! The stored `role_permissions` relation can only extend them; the
//! effective set is the union of both.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use repairdesk_core::result::AppResult;
use repairdesk_database::store::RolePermissionStore;
use repairdesk_entity::permission::Action;
use repairdesk_entity::user::UserRole;

use super::policies::RolePolicies;

/// Derives the action set a role may perform.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    policies: RolePolicies,
    store: Option<Arc<dyn RolePermissionStore>>,
}

impl PermissionResolver {
    /// Resolver over the built-in policies only.
    pub fn new() -> Self {
        Self {
            policies: RolePolicies::new(),
            store: None,
        }
    }

    /// Resolver that also consults the stored relation.
    pub fn with_store(store: Arc<dyn RolePermissionStore>) -> Self {
        Self {
            policies: RolePolicies::new(),
            store: Some(store),
        }
    }

    /// Pure resolution: defaults for `role` plus `granted`.
    /// Unknown roles get the empty set, and `granted` is ignored for them.
    pub fn resolve(&self, role: &str, granted: &[Action]) -> HashSet<Action> {
        match role.parse::<UserRole>() {
            Ok(role) => {
                let mut actions = self.policies.actions_for(role);
                actions.extend(granted.iter().copied());
                actions
            }
            Err(_) => HashSet::new(),
        }
    }

    /// Effective actions for `role`, reading the stored relation if configured.
    pub async fn permissions_for(&self, role: &str) -> AppResult<HashSet<Action>> {
        let Ok(parsed) = role.parse::<UserRole>() else {
            warn!(role, "Unknown role resolved to no permissions");
            return Ok(HashSet::new());
        };
        let granted = match &self.store {
            Some(store) => store.find_actions_for_role(parsed).await?,
            None => Vec::new(),
        };
        Ok(self.resolve(role, &granted))
    }
}

impl Default for PermissionResolver {
    fn default() -> Self {
        Self::new()
    }
}

//! Built-in role-to-action mapping.

use std::collections::{HashMap, HashSet};

use repairdesk_entity::permission::Action;
use repairdesk_entity::user::UserRole;

/// Default capability set of every known role.
#[derive(Debug, Clone)]
pub struct RolePolicies {
    policies: HashMap<UserRole, HashSet<Action>>,
}

impl RolePolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        let mut policies = HashMap::new();

        policies.insert(UserRole::Admin, Action::ALL.into_iter().collect());

        policies.insert(
            UserRole::Manager,
            [Action::ViewAllOrders, Action::AssignOrder]
                .into_iter()
                .collect(),
        );

        policies.insert(
            UserRole::Maintainer,
            [
                Action::ViewOwnOrders,
                Action::ProcessOrder,
                Action::CompleteOrder,
            ]
            .into_iter()
            .collect(),
        );

        policies.insert(
            UserRole::Student,
            [Action::CreateOrder, Action::ViewOwnOrders]
                .into_iter()
                .collect(),
        );

        Self { policies }
    }

    /// Returns the default actions for a role.
    pub fn actions_for(&self, role: UserRole) -> HashSet<Action> {
        self.policies.get(&role).cloned().unwrap_or_default()
    }
}

impl Default for RolePolicies {
    fn default() -> Self {
        Self::new()
    }
}

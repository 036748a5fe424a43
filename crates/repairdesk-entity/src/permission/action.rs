//! Action tags a role may be granted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::user::UserRole;

/// Capabilities checked by the order engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "permission_action", rename_all = "PascalCase")]
pub enum Action {
    CreateOrder,
    ViewOwnOrders,
    ViewAllOrders,
    ManageUsers,
    AssignOrder,
    ProcessOrder,
    CompleteOrder,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 7] = [
        Self::CreateOrder,
        Self::ViewOwnOrders,
        Self::ViewAllOrders,
        Self::ManageUsers,
        Self::AssignOrder,
        Self::ProcessOrder,
        Self::CompleteOrder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateOrder => "CreateOrder",
            Self::ViewOwnOrders => "ViewOwnOrders",
            Self::ViewAllOrders => "ViewAllOrders",
            Self::ManageUsers => "ManageUsers",
            Self::AssignOrder => "AssignOrder",
            Self::ProcessOrder => "ProcessOrder",
            Self::CompleteOrder => "CompleteOrder",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = repairdesk_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| repairdesk_core::AppError::validation(format!("Invalid action: '{s}'")))
    }
}

/// A stored grant of one action to one role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct RolePermission {
    pub role: UserRole,
    pub action: Action,
}

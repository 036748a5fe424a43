//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a principal can hold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "user_role", rename_all = "PascalCase")]
pub enum UserRole {
    /// Full system administrator.
    Admin,
    /// Dispatches work like an admin, without user management or deletion.
    Manager,
    /// Maintenance staff who process assigned orders.
    Maintainer,
    /// Dormitory resident who files orders.
    Student,
}

impl UserRole {
    /// All known roles.
    pub const ALL: [UserRole; 4] = [Self::Admin, Self::Manager, Self::Maintainer, Self::Student];

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Admin or the manager-equivalent dispatcher role.
    pub fn is_dispatcher(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    /// Return the role's wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Maintainer => "Maintainer",
            Self::Student => "Student",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = repairdesk_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "maintainer" => Ok(Self::Maintainer),
            "student" => Ok(Self::Student),
            _ => Err(repairdesk_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: Admin, Manager, Maintainer, Student"
            ))),
        }
    }
}

//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::role::UserRole;

/// A registered principal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Opaque credential, managed by the login service.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// User role.
    pub role: UserRole,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// Inactive users are skipped as notification targets and assignees.
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Active maintainer, eligible for assignment.
    pub fn is_assignable(&self) -> bool {
        self.is_active && self.role == UserRole::Maintainer
    }
}

/// Entry in the maintainer roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MaintainerSummary {
    /// User id.
    pub id: i64,
    /// Login name.
    pub username: String,
}

/// Data for inserting a user. Credential handling lives outside this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
}

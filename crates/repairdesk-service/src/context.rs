//! Request context carrying the authenticated principal and its resolved actions.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use repairdesk_auth::rbac::RbacEnforcer;
use repairdesk_core::result::AppResult;
use repairdesk_entity::permission::Action;
use repairdesk_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built by the API extractor from the bearer token and passed into
/// service methods so every operation knows who is acting and what
/// that principal may do.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: i64,
    /// Username; doubles as the principal's push group.
    pub username: String,
    /// Role name as carried by the token. May name an unknown role.
    pub role: String,
    /// Effective actions resolved for `role`.
    pub permissions: HashSet<Action>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(
        user_id: i64,
        username: impl Into<String>,
        role: impl Into<String>,
        permissions: HashSet<Action>,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            role: role.into(),
            permissions,
            request_time: Utc::now(),
        }
    }

    /// Parsed role, `None` when the token names a role this build does not know.
    pub fn user_role(&self) -> Option<UserRole> {
        self.role.parse().ok()
    }

    pub fn is_admin(&self) -> bool {
        self.user_role() == Some(UserRole::Admin)
    }

    pub fn is_student(&self) -> bool {
        self.user_role() == Some(UserRole::Student)
    }

    pub fn is_maintainer(&self) -> bool {
        self.user_role() == Some(UserRole::Maintainer)
    }

    pub fn can(&self, action: Action) -> bool {
        self.permissions.contains(&action)
    }

    /// Fails with `Forbidden` unless the principal holds `action`.
    pub fn require(&self, action: Action) -> AppResult<()> {
        RbacEnforcer::require(&self.permissions, action)
    }

    /// Fails with `Forbidden` unless the principal holds one of `actions`.
    pub fn require_any(&self, actions: &[Action]) -> AppResult<()> {
        RbacEnforcer::require_any(&self.permissions, actions)
    }
}

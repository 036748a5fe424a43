//! JWT claims carried by access tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use repairdesk_entity::user::UserRole;

/// Claims payload of an access token.
///
/// `role` stays a raw string so that tokens naming a role this build
/// does not know still decode; such principals resolve to no permissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: i64,
    /// Username, also the principal's push group.
    pub username: String,
    /// Role name at issuance.
    pub role: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> i64 {
        self.sub
    }

    /// Parsed role, `None` when unknown.
    pub fn user_role(&self) -> Option<UserRole> {
        self.role.parse().ok()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

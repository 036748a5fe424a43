//! HS256 token signing for development tokens and tests.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};

use repairdesk_core::config::AuthConfig;
use repairdesk_core::error::AppError;

use super::claims::Claims;

/// Signs access tokens with the configured secret.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    issuer: Option<String>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtEncoder {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
        }
    }

    /// Issues a token for `user_id` valid for `ttl_seconds`.
    pub fn issue(
        &self,
        user_id: i64,
        username: &str,
        role: &str,
        ttl_seconds: i64,
    ) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            role: role.to_string(),
            iat: now,
            exp: now + ttl_seconds,
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))
    }
}

//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use repairdesk_core::config::AuthConfig;
use repairdesk_core::error::AppError;

use super::claims::Claims;

/// Validates HS256 access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;
        if let Some(issuer) = &config.jwt_issuer {
            validation.set_issuer(&[issuer.as_str()]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::unauthorized("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                        AppError::unauthorized("Unexpected token issuer")
                    }
                    _ => AppError::unauthorized(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use repairdesk_core::ErrorKind;
    use repairdesk_entity::user::UserRole;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_issuer: None,
            leeway_seconds: 0,
        }
    }

    #[test]
    fn test_round_trip_claims() {
        let cfg = config();
        let token = JwtEncoder::new(&cfg)
            .issue(7, "alice", UserRole::Student.as_str(), 3600)
            .unwrap();
        let claims = JwtDecoder::new(&cfg).decode_access_token(&token).unwrap();
        assert_eq!(claims.user_id(), 7);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.user_role(), Some(UserRole::Student));
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let token = JwtEncoder::new(&config())
            .issue(1, "bob", "Admin", 3600)
            .unwrap();
        let other = AuthConfig {
            jwt_secret: "other".to_string(),
            ..config()
        };
        let err = JwtDecoder::new(&other).decode_access_token(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let cfg = config();
        let token = JwtEncoder::new(&cfg).issue(1, "bob", "Admin", -120).unwrap();
        let err = JwtDecoder::new(&cfg).decode_access_token(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_garbage_is_unauthorized() {
        let err = JwtDecoder::new(&config())
            .decode_access_token("not-a-token")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_unknown_role_still_decodes() {
        let cfg = config();
        let token = JwtEncoder::new(&cfg).issue(3, "x", "Janitor", 60).unwrap();
        let claims = JwtDecoder::new(&cfg).decode_access_token(&token).unwrap();
        assert_eq!(claims.user_role(), None);
    }
}

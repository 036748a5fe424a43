//! Bearer-token authentication for REST handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use repairdesk_core::error::AppError;
use repairdesk_service::context::RequestContext;

use crate::state::AppState;

/// The authenticated caller. Derefs to its [`RequestContext`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;

    fn deref(&self) -> &RequestContext {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;
        let token = header
            .to_str()
            .ok()
            .and_then(bearer_token)
            .ok_or_else(|| AppError::unauthorized("Expected `Authorization: Bearer <token>`"))?;

        authenticate(state, token).await.map(AuthUser)
    }
}

/// Token part of a `Bearer <token>` header value; the scheme is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Decodes `token` and builds the request context for its principal.
///
/// An unknown role still authenticates; it just resolves to no actions.
pub async fn authenticate(state: &AppState, token: &str) -> Result<RequestContext, AppError> {
    let claims = state.jwt_decoder.decode_access_token(token)?;
    let permissions = state.permission_resolver.permissions_for(&claims.role).await?;

    Ok(RequestContext::new(
        claims.user_id(),
        claims.username,
        claims.role,
        permissions,
    ))
}

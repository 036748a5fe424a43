//! [`AppError`]: the one error type every RepairDesk crate returns.
//!
//! Errors carry a coarse [`ErrorKind`]; the HTTP layer maps kinds to
//! status codes and hides the message of internal kinds from clients.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The entity id does not exist, or is not visible to the caller.
    NotFound,
    /// No principal could be established for the request.
    Unauthorized,
    /// The principal may not act on this particular entity.
    Forbidden,
    Validation,
    /// Well-formed request, but the entity's current state disallows it.
    PreconditionFailed,
    Conflict,
    Internal,
    Database,
    Cache,
    Configuration,
    Serialization,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Validation => "VALIDATION",
            Self::PreconditionFailed => "PRECONDITION_FAILED",
            Self::Conflict => "CONFLICT",
            Self::Internal => "INTERNAL",
            Self::Database => "DATABASE",
            Self::Cache => "CACHE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
        }
    }

    /// Infrastructure faults. Their messages stay in the server log.
    pub fn is_internal(self) -> bool {
        matches!(
            self,
            Self::Internal | Self::Database | Self::Cache | Self::Configuration | Self::Serialization
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

macro_rules! kind_constructors {
    ($($name:ident => $kind:ident),* $(,)?) => {
        $(
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorKind::$kind, message)
            }
        )*
    };
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Like [`AppError::new`], keeping `source` for the log.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..Self::new(kind, message)
        }
    }

    kind_constructors! {
        not_found => NotFound,
        unauthorized => Unauthorized,
        forbidden => Forbidden,
        validation => Validation,
        precondition_failed => PreconditionFailed,
        conflict => Conflict,
        internal => Internal,
        database => Database,
        configuration => Configuration,
    }
}

/// Sources are not `Clone`; a clone keeps kind and message only.
impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

/// HTTP mapping for [`AppError`]. It lives next to the type because the
/// orphan rule forbids implementing `IntoResponse` for it in the API crate.
pub mod http {
    use axum::Json;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use serde::{Deserialize, Serialize};

    use super::{AppError, ErrorKind};

    /// Standard API error response body.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ApiErrorResponse {
        /// Machine-readable error code.
        pub error: String,
        /// Human-readable message.
        pub message: String,
    }

    /// Status code and error code for a kind.
    pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
        match kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::PreconditionFailed => (StatusCode::PRECONDITION_FAILED, "PRECONDITION_FAILED"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::Internal
            | ErrorKind::Database
            | ErrorKind::Cache
            | ErrorKind::Configuration
            | ErrorKind::Serialization => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let (status, error_code) = status_for(self.kind);

            let message = if self.kind.is_internal() {
                tracing::error!(
                    kind = %self.kind,
                    error = %self.message,
                    source = ?self.source,
                    "Internal server error"
                );
                "An internal error occurred".to_string()
            } else {
                self.message
            };

            let body = ApiErrorResponse {
                error: error_code.to_string(),
                message,
            };

            (status, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = AppError::precondition_failed("must assign a maintainer first");
        assert_eq!(
            err.to_string(),
            "PRECONDITION_FAILED: must assign a maintainer first"
        );
    }

    #[test]
    fn test_internal_kinds() {
        assert!(ErrorKind::Database.is_internal());
        assert!(ErrorKind::Cache.is_internal());
        assert!(!ErrorKind::Forbidden.is_internal());
        assert!(!ErrorKind::PreconditionFailed.is_internal());
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("disk");
        let err = AppError::with_source(ErrorKind::Internal, "boom", io);
        assert!(err.source.is_some());
        let cloned = err.clone();
        assert!(cloned.source.is_none());
        assert_eq!(cloned.kind, ErrorKind::Internal);
    }
}

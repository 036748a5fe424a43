//! Maps domain `AppError` to HTTP responses.
//!
//! The `IntoResponse` impl lives in `repairdesk_core::error::http` (orphan
//! rule); this module re-exports its public items.

pub use repairdesk_core::error::http::{ApiErrorResponse, status_for};

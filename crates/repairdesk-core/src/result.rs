//! Convenience result type alias for RepairDesk.

use crate::error::AppError;

/// A specialized `Result` type for RepairDesk operations.
pub type AppResult<T> = Result<T, AppError>;

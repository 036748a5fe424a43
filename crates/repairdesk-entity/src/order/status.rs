//! Order status state machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a repair order. Transitions are linear:
/// `Pending -> Processing -> Completed`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "order_status", rename_all = "PascalCase")]
pub enum OrderStatus {
    /// Filed, waiting to be picked up.
    Pending,
    /// A maintainer is working on it.
    Processing,
    /// Work is done. Terminal.
    Completed,
}

impl OrderStatus {
    /// The single status this one may advance to.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            Self::Pending => Some(Self::Processing),
            Self::Processing => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Whether `target` is exactly one step ahead.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        self.next() == Some(target)
    }

    /// Whether no further transition is permitted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Return the status's wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = repairdesk_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            _ => Err(repairdesk_core::AppError::validation(format!(
                "Invalid order status: '{s}'. Expected one of: Pending, Processing, Completed"
            ))),
        }
    }
}

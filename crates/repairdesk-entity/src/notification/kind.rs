//! Notification type tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag carried by every notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "PascalCase")]
pub enum NotificationKind {
    /// A student filed a new order.
    OrderCreated,
    /// A maintainer was assigned.
    OrderAssigned,
    /// The assignee was replaced.
    OrderReassigned,
    /// The order's status changed.
    OrderStatusChanged,
    /// The order stalled in `Pending`.
    OrderTimeout,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderCreated => "OrderCreated",
            Self::OrderAssigned => "OrderAssigned",
            Self::OrderReassigned => "OrderReassigned",
            Self::OrderStatusChanged => "OrderStatusChanged",
            Self::OrderTimeout => "OrderTimeout",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Lifecycle events emitted by the order engine.
//!
//! Events are handed to the notification service, which persists one
//! record per recipient and forwards it to the push gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderEventKind {
    /// A new order was filed.
    Created,
    /// A maintainer was assigned to an unassigned order.
    Assigned,
    /// The assignee was replaced.
    Reassigned,
    /// The order moved to a new status.
    StatusChanged,
    /// The order sat in the initial state past the sweep threshold.
    TimedOut,
}

/// A state change on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Kind of change.
    pub kind: OrderEventKind,
    /// Order identifier.
    pub order_id: i64,
    /// Order title at the time of the event.
    pub title: String,
    /// Status after the change, as its wire name.
    pub new_status: String,
    /// Username of the order's creator.
    pub creator: String,
    /// Assigned maintainer's id, if any.
    pub assignee: Option<i64>,
    /// Hours the order has been pending. Only set for `TimedOut`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_hours: Option<f64>,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
}

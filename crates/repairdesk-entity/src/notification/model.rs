//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::kind::NotificationKind;

/// A durable, per-recipient record of an order event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    /// Username of the recipient.
    pub receiver_username: String,
    pub title: String,
    pub message: String,
    /// Type tag.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Order this notification is about. May dangle after deletion.
    pub related_order_id: Option<i64>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    /// Set exactly when `is_read` is true.
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Check if the notification has been read.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}

/// Data for persisting a new notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateNotification {
    pub receiver_username: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub related_order_id: Option<i64>,
}

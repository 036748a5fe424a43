//! Order entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::OrderStatus;

/// Maximum title length in characters.
pub const TITLE_MAX_LEN: usize = 100;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// A repair request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Immutable identifier.
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Free-text location, e.g. building and room.
    pub location: String,
    /// Username of the student who filed the order.
    pub creator: String,
    pub status: OrderStatus,
    /// Stored upload path, if an image was attached.
    pub image_url: Option<String>,
    /// Assigned maintainer's user id.
    pub assigned_to: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Whether `username` filed this order.
    pub fn is_created_by(&self, username: &str) -> bool {
        self.creator == username
    }

    /// Whether `user_id` is the current assignee.
    pub fn is_assigned_to(&self, user_id: i64) -> bool {
        self.assigned_to == Some(user_id)
    }

    /// Hours since creation, relative to `now`.
    pub fn hours_pending(&self, now: DateTime<Utc>) -> f64 {
        (now - self.created_at).num_seconds() as f64 / 3600.0
    }
}

/// Data for inserting a new order. Status always starts at `Pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrder {
    pub title: String,
    pub description: String,
    pub location: String,
    pub creator: String,
    pub image_url: Option<String>,
}

/// Order with the assignee's display name resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    /// Username of the assigned maintainer.
    pub assigned_to_name: Option<String>,
}

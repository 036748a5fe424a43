//! Listing filter for orders.

use serde::{Deserialize, Serialize};

use super::status::OrderStatus;

/// Criteria for order listings. All set fields must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderFilter {
    /// Only orders in this status.
    pub status: Option<OrderStatus>,
    /// Only orders filed by this username.
    pub creator: Option<String>,
    /// Only orders assigned to this user id OR filed by this username.
    pub involving: Option<(i64, String)>,
}

impl OrderFilter {
    /// Stable textual form, used in cache keys.
    pub fn fingerprint(&self) -> String {
        let status = self.status.map(|s| s.as_str()).unwrap_or("any");
        let creator = self.creator.as_deref().unwrap_or("*");
        let involving = self
            .involving
            .as_ref()
            .map(|(id, name)| format!("{id}/{name}"))
            .unwrap_or_else(|| "*".to_string());
        format!("s={status}|c={creator}|i={involving}")
    }
}

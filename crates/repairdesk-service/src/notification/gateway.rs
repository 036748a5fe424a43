//! The seam between durable notifications and live delivery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use repairdesk_core::result::AppResult;

/// Data attached to a pushed notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    pub order_id: Option<i64>,
    pub title: String,
}

/// Best-effort delivery to every live connection of one recipient.
#[async_trait]
pub trait PushGateway: Send + Sync + std::fmt::Debug {
    /// Deliver to the recipient's group. Returns how many connections
    /// accepted the message; zero connections is not an error.
    async fn send_to_group(
        &self,
        recipient: &str,
        message: &str,
        data: &PushPayload,
    ) -> AppResult<usize>;
}

/// Gateway for processes with no live connections, such as a one-shot sweep.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPushGateway;

#[async_trait]
impl PushGateway for NullPushGateway {
    async fn send_to_group(
        &self,
        _recipient: &str,
        _message: &str,
        _data: &PushPayload,
    ) -> AppResult<usize> {
        Ok(0)
    }
}

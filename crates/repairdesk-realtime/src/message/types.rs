//! Inbound and outbound live-channel message definitions.

use serde::{Deserialize, Serialize};

use repairdesk_service::notification::PushPayload;

/// Messages sent by the client to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Liveness probe; answered with `Pong`.
    Ping,
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// A notification for the connected principal.
    ReceiveNotification {
        /// Notification body.
        message: String,
        /// Related order and notification title.
        data: PushPayload,
    },
    /// Reply to `Ping`.
    Pong {
        /// Server time, milliseconds since epoch.
        timestamp: i64,
    },
    /// The client sent something unparseable.
    Error { code: String, message: String },
}

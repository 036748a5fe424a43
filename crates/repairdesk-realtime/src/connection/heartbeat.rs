//! Ping/pong heartbeat.
//!
//! The server answers application-level pings with a pong and sends
//! transport ping frames on an interval to keep intermediaries from
//! idling the socket out. Neither side of this evicts a silent
//! connection; a connection only goes away when the transport fails.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time;

use super::handle::{ConnectionHandle, OutboundFrame};
use crate::message::types::OutboundMessage;

/// Reply to an inbound ping.
pub fn pong() -> OutboundMessage {
    OutboundMessage::Pong {
        timestamp: Utc::now().timestamp_millis(),
    }
}

/// Queue a keepalive ping frame every `interval` until the connection closes.
pub async fn run_keepalive(handle: Arc<ConnectionHandle>, interval: Duration) {
    let mut ticker = time::interval(interval);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        if !handle.is_alive() {
            break;
        }
        if !handle.send(OutboundFrame::Ping) && !handle.is_alive() {
            break;
        }
    }

    tracing::debug!(conn_id = %handle.id, "Keepalive loop ended");
}

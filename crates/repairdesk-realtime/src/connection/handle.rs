//! Individual live connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::state::ConnectionState;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// What the socket writer should put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundFrame {
    /// A serialized JSON message.
    Text(String),
    /// A transport-level keepalive ping.
    Ping,
}

/// A handle to a single live connection.
///
/// Holds the sender half of the connection's outbound queue plus the
/// identity of the principal it belongs to.
#[derive(Debug)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub user_id: i64,
    /// Username; the group this connection belongs to.
    pub username: String,
    sender: mpsc::Sender<OutboundFrame>,
    pub connected_at: DateTime<Utc>,
    alive: AtomicBool,
}

impl ConnectionHandle {
    pub fn new(user_id: i64, username: String, sender: mpsc::Sender<OutboundFrame>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            username,
            sender,
            connected_at: Utc::now(),
            alive: AtomicBool::new(true),
        }
    }

    /// Queue a frame without waiting. Returns whether it was accepted.
    pub fn send(&self, frame: OutboundFrame) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(frame) {
            Ok(_) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                false
            }
        }
    }

    pub fn send_text(&self, text: String) -> bool {
        self.send(OutboundFrame::Text(text))
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub fn mark_closed(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Server-side view of the connection's state.
    pub fn state(&self) -> ConnectionState {
        if self.is_alive() {
            ConnectionState::Connected
        } else {
            ConnectionState::Closed
        }
    }
}

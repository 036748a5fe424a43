//! Connection manager: registration, inbound handling, and group fan-out.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use repairdesk_core::config::RealtimeConfig;
use repairdesk_core::error::{AppError, ErrorKind};
use repairdesk_core::result::AppResult;
use repairdesk_service::notification::{PushGateway, PushPayload};

use super::handle::{ConnectionHandle, ConnectionId, OutboundFrame};
use super::heartbeat;
use super::pool::ConnectionPool;
use crate::message::serializer::{deserialize_inbound, serialize_outbound};
use crate::message::types::{InboundMessage, OutboundMessage};

/// Manages all open live connections.
#[derive(Debug)]
pub struct ConnectionManager {
    pool: Arc<ConnectionPool>,
    config: RealtimeConfig,
}

impl ConnectionManager {
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            pool: Arc::new(ConnectionPool::new()),
            config,
        }
    }

    /// Registers an authenticated connection in its principal's group.
    ///
    /// Returns the handle and the receiver the socket writer drains.
    pub fn register(
        &self,
        user_id: i64,
        username: String,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundFrame>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id, username, tx));

        let existing = self.pool.group(&handle.username);
        if existing.len() >= self.config.max_connections_per_user {
            warn!(
                username = %handle.username,
                count = existing.len(),
                max = self.config.max_connections_per_user,
                "User at max connections, oldest will be replaced"
            );
            if let Some(oldest) = existing.first() {
                oldest.mark_closed();
                self.pool.remove(&oldest.id);
            }
        }

        self.pool.add(handle.clone());

        info!(
            conn_id = %handle.id,
            username = %handle.username,
            "Live connection registered"
        );

        (handle, rx)
    }

    /// Removes a connection from its group. Other connections of the
    /// same principal keep receiving.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.mark_closed();
            info!(
                conn_id = %conn_id,
                username = %handle.username,
                "Live connection unregistered"
            );
        }
    }

    /// Processes a text frame from a client.
    pub fn handle_inbound(&self, conn_id: &ConnectionId, raw_message: &str) {
        let Some(handle) = self.pool.get(conn_id) else {
            warn!(conn_id = %conn_id, "Message from unknown connection");
            return;
        };

        let reply = match deserialize_inbound(raw_message) {
            Ok(InboundMessage::Ping) => heartbeat::pong(),
            Err(e) => OutboundMessage::Error {
                code: "INVALID_MESSAGE".to_string(),
                message: format!("Failed to parse message: {e}"),
            },
        };

        match serialize_outbound(&reply) {
            Ok(text) => {
                handle.send_text(text);
            }
            Err(e) => error!(error = %e, "Failed to serialize reply"),
        }
    }

    /// Sends to every connection in `recipient`'s group. Returns how many
    /// accepted the message.
    pub fn push_to_group(&self, recipient: &str, message: &OutboundMessage) -> AppResult<usize> {
        let connections = self.pool.group(recipient);
        if connections.is_empty() {
            debug!(recipient, "No live connections for recipient");
            return Ok(0);
        }

        let text = serialize_outbound(message).map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, "Failed to serialize push", e)
        })?;

        let mut delivered = 0;
        for conn in &connections {
            if conn.send_text(text.clone()) {
                delivered += 1;
            } else if !conn.is_alive() {
                self.pool.remove(&conn.id);
            }
        }
        Ok(delivered)
    }

    /// Closes every connection.
    pub fn close_all(&self) {
        let all = self.pool.all_connections();
        for conn in &all {
            conn.mark_closed();
            self.pool.remove(&conn.id);
        }
        info!(count = all.len(), "All live connections closed");
    }

    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Number of principals with at least one open connection.
    pub fn user_count(&self) -> usize {
        self.pool.group_count()
    }

    pub fn is_user_connected(&self, username: &str) -> bool {
        !self.pool.group(username).is_empty()
    }

    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }
}

#[async_trait]
impl PushGateway for ConnectionManager {
    async fn send_to_group(
        &self,
        recipient: &str,
        message: &str,
        data: &PushPayload,
    ) -> AppResult<usize> {
        let outbound = OutboundMessage::ReceiveNotification {
            message: message.to_string(),
            data: data.clone(),
        };
        self.push_to_group(recipient, &outbound)
    }
}

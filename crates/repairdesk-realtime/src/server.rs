//! The live-channel engine shared through application state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use repairdesk_core::config::RealtimeConfig;

use crate::connection::manager::ConnectionManager;

/// Connection registry plus a stop flag every socket task watches.
/// The flag is sticky: a socket accepted after shutdown began still sees it.
#[derive(Clone)]
pub struct RealtimeEngine {
    pub connections: Arc<ConnectionManager>,
    stopping: watch::Sender<bool>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("connections", &self.connections.connection_count())
            .field("stopping", &*self.stopping.borrow())
            .finish()
    }
}

impl RealtimeEngine {
    pub fn new(config: RealtimeConfig) -> Self {
        let per_user = config.max_connections_per_user;
        let engine = Self {
            connections: Arc::new(ConnectionManager::new(config)),
            stopping: watch::Sender::new(false),
        };
        info!(max_connections_per_user = per_user, "Real-time engine initialized");
        engine
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.connections.config().ping_interval_seconds.max(1))
    }

    pub fn stop_signal(&self) -> watch::Receiver<bool> {
        self.stopping.subscribe()
    }

    pub fn is_stopping(&self) -> bool {
        *self.stopping.borrow()
    }

    /// Tell socket tasks to close and drop every registered connection.
    /// Idempotent.
    pub fn shutdown(&self) {
        if self.stopping.send_replace(true) {
            return;
        }
        info!(
            open = self.connections.connection_count(),
            "Shutting down real-time engine"
        );
        self.connections.close_all();
    }
}

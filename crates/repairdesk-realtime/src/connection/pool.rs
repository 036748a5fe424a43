//! Connection pool: all open connections, grouped by username.

use std::sync::Arc;

use dashmap::DashMap;

use super::handle::{ConnectionHandle, ConnectionId};

/// Thread-safe registry of open connections.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    /// Username → that recipient's connections, oldest first.
    by_group: DashMap<String, Vec<Arc<ConnectionHandle>>>,
    /// Connection ID → handle for direct lookup.
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, handle.clone());
        self.by_group
            .entry(handle.username.clone())
            .or_default()
            .push(handle);
    }

    /// Removes one connection. Other members of its group are untouched.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        let now_empty = match self.by_group.get_mut(&handle.username) {
            Some(mut connections) => {
                connections.retain(|c| c.id != *conn_id);
                connections.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.by_group
                .remove_if(&handle.username, |_, connections| connections.is_empty());
        }
        Some(handle)
    }

    /// Snapshot of a group's members.
    pub fn group(&self, username: &str) -> Vec<Arc<ConnectionHandle>> {
        self.by_group
            .get(username)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(conn_id).map(|entry| entry.value().clone())
    }

    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Number of non-empty groups.
    pub fn group_count(&self) -> usize {
        self.by_group.len()
    }

    pub fn all_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        self.by_id
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}

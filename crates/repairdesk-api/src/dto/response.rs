//! Bodies returned by handlers. Everything goes out inside the
//! `{"success": true, "data": ...}` envelope; failures use the
//! `{error, message}` shape from [`crate::error`].

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Acknowledgement for deletes.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Result of unread counts and bulk mark-read.
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

/// Reachability of a backing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStatus {
    Connected,
    Unavailable,
}

impl From<bool> for DependencyStatus {
    fn from(reachable: bool) -> Self {
        if reachable {
            Self::Connected
        } else {
            Self::Unavailable
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealthResponse {
    /// `ok`, or `degraded` when any dependency is unavailable.
    pub status: &'static str,
    pub database: DependencyStatus,
    pub cache: DependencyStatus,
    pub ws_connections: usize,
    pub online_users: usize,
}

//! # repairdesk-realtime
//!
//! Live push gateway for RepairDesk. Provides:
//!
//! - Connection registry grouped by recipient username
//! - Best-effort fan-out of notifications to every open connection of a recipient
//! - Ping/pong heartbeat and server keepalive frames
//! - The connection state machine and the client reconnect policy

pub mod connection;
pub mod message;
pub mod server;

pub use connection::manager::ConnectionManager;
pub use connection::reconnect::ReconnectPolicy;
pub use connection::state::{ConnectionEvent, ConnectionState};
pub use server::RealtimeEngine;

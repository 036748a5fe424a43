//! Connection management: lifecycle, pool, handles, heartbeat, reconnect.

pub mod handle;
pub mod heartbeat;
pub mod manager;
pub mod pool;
pub mod reconnect;
pub mod state;

pub use handle::{ConnectionHandle, ConnectionId, OutboundFrame};
pub use manager::ConnectionManager;

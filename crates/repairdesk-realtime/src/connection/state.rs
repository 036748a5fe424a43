//! Per-connection lifecycle: `Connecting → Connected → (Reconnecting ⇄ Connected) → Closed`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Connecting,
    Connected,
    Reconnecting,
    Closed,
}

/// Inputs that drive [`ConnectionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The transport handshake completed.
    Opened,
    /// The transport failed or the peer went away.
    Dropped,
    /// The reconnect window ran out.
    GaveUp,
    /// Either side closed deliberately.
    Closed,
}

impl ConnectionState {
    /// Apply `event`. Events that do not apply leave the state unchanged;
    /// `Closed` absorbs everything.
    pub fn on(self, event: ConnectionEvent) -> ConnectionState {
        use ConnectionEvent as E;
        use ConnectionState as S;

        match (self, event) {
            (S::Closed, _) => S::Closed,
            (_, E::Closed) => S::Closed,
            (S::Connecting | S::Reconnecting, E::Opened) => S::Connected,
            (S::Connected, E::Dropped) => S::Reconnecting,
            (S::Connecting | S::Reconnecting, E::Dropped) => self,
            (S::Connecting | S::Reconnecting, E::GaveUp) => S::Closed,
            (state, _) => state,
        }
    }

    pub fn is_open(self) -> bool {
        self == ConnectionState::Connected
    }
}

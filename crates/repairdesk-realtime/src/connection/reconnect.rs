//! Client reconnect policy.
//!
//! Each attempt waits a uniformly random delay in `[0, max_delay]` so that
//! clients dropped by the same restart do not reconnect in lockstep.
//! Attempts stop once `window` has passed since the first disconnect.

use std::time::{Duration, Instant};

use rand::Rng;

use repairdesk_core::config::RealtimeConfig;

#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    window: Duration,
    max_delay: Duration,
    disconnected_at: Option<Instant>,
}

impl ReconnectPolicy {
    pub fn new(window: Duration, max_delay: Duration) -> Self {
        Self {
            window,
            max_delay,
            disconnected_at: None,
        }
    }

    pub fn from_config(config: &RealtimeConfig) -> Self {
        Self::new(
            Duration::from_secs(config.reconnect_window_seconds),
            Duration::from_millis(config.reconnect_max_delay_ms),
        )
    }

    /// Delay before the next attempt, or `None` once the window is spent.
    /// The first call after a successful connection starts the window.
    pub fn next_delay(&mut self, now: Instant) -> Option<Duration> {
        let started = *self.disconnected_at.get_or_insert(now);
        if now.duration_since(started) >= self.window {
            return None;
        }
        let max_ms = self.max_delay.as_millis() as u64;
        Some(Duration::from_millis(rand::rng().random_range(0..=max_ms)))
    }

    /// Forget the current outage after a successful reconnect.
    pub fn reset(&mut self) {
        self.disconnected_at = None;
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::from_config(&RealtimeConfig::default())
    }
}

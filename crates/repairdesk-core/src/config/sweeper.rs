//! Timeout sweeper configuration.

use serde::{Deserialize, Serialize};

/// Settings for the recurring stalled-order scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweeperConfig {
    /// Whether the in-process scheduler runs the sweep.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Six-field cron expression (seconds first).
    #[serde(default = "default_cron")]
    pub cron: String,
    /// Age after which a pending order counts as stalled.
    #[serde(default = "default_threshold_hours")]
    pub threshold_hours: u64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cron: default_cron(),
            threshold_hours: default_threshold_hours(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cron() -> String {
    "0 0 0 * * *".to_string()
}

fn default_threshold_hours() -> u64 {
    48
}

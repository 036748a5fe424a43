//! RepairDesk Server: dormitory repair ticketing.
//!
//! Main entry point that loads configuration, sets up logging, and runs
//! the server.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use repairdesk_core::config::{AppConfig, ENV_PREFIX, LogFormat, LoggingConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_configuration()?;

    init_logging(&config.logging);
    tracing::info!("Starting RepairDesk v{}", env!("CARGO_PKG_VERSION"));

    repairdesk_api::run_server(config)
        .await
        .context("Server error")
}

/// Load configuration from file and environment
fn load_configuration() -> anyhow::Result<AppConfig> {
    let config_path = std::env::var(format!("{ENV_PREFIX}_CONFIG"))
        .unwrap_or_else(|_| "config/default.toml".to_string());

    AppConfig::load(&config_path)
        .with_context(|| format!("Failed to load configuration from '{config_path}'"))
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

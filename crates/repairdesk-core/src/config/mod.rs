//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate.
//! Every section falls back to defaults, so a missing file still yields
//! a usable development configuration.

pub mod app;
pub mod auth;
pub mod cache;
pub mod database;
pub mod logging;
pub mod realtime;
pub mod sweeper;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::AuthConfig;
pub use self::cache::{CacheBackend, CacheConfig};
pub use self::database::{DatabaseBackend, DatabaseConfig};
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::realtime::RealtimeConfig;
pub use self::sweeper::SweeperConfig;

use crate::error::AppError;

/// Environment variable prefix for overrides, e.g. `REPAIRDESK__SERVER__PORT`.
pub const ENV_PREFIX: &str = "REPAIRDESK";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Durable store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Read cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Token verification settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Live push channel settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Timeout sweeper settings.
    #[serde(default)]
    pub sweeper: SweeperConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// Layers, later wins: the file at `path`, then `config/{env}.toml`
    /// where `env` comes from `REPAIRDESK_ENV`, then `REPAIRDESK__*`
    /// environment variables.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let env = std::env::var(format!("{ENV_PREFIX}_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

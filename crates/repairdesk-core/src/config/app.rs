//! `[server]` section.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// Defaults to 5002, the port the dormitory front end expects.
    #[serde(default = "default_port")]
    pub port: u16,
    /// How long in-flight requests may drain after SIGTERM/Ctrl+C
    /// before the process exits anyway.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: default_port(),
            shutdown_grace_seconds: default_shutdown_grace(),
            cors: CorsConfig::default(),
        }
    }
}

/// `[server.cors]`. A `"*"` entry allows any origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "any_origin")]
    pub allowed_origins: Vec<String>,
    /// Preflight `Access-Control-Max-Age`.
    #[serde(default = "default_preflight_max_age")]
    pub max_age_seconds: u64,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: any_origin(),
            max_age_seconds: default_preflight_max_age(),
        }
    }
}

fn default_host() -> String {
    ServerConfig::default().host
}

fn default_port() -> u16 {
    5002
}

fn default_shutdown_grace() -> u64 {
    30
}

fn any_origin() -> Vec<String> {
    vec!["*".into()]
}

fn default_preflight_max_age() -> u64 {
    60 * 60
}

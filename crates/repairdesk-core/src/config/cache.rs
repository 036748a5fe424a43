//! `[cache]` section: backend choice and read-cache lifetimes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Per-process moka cache. Fine for a single server instance.
    #[default]
    Memory,
    /// Shared Redis, for several instances behind a balancer.
    Redis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub provider: CacheBackend,
    /// Lifetime of a cached order listing page. Writes also invalidate.
    #[serde(default = "default_order_list_ttl")]
    pub order_list_ttl_seconds: u64,
    #[serde(default = "default_roster_ttl")]
    pub maintainer_roster_ttl_seconds: u64,
    #[serde(default)]
    pub redis: RedisCacheConfig,
    #[serde(default)]
    pub memory: MemoryCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: CacheBackend::Memory,
            order_list_ttl_seconds: default_order_list_ttl(),
            maintainer_roster_ttl_seconds: default_roster_ttl(),
            redis: RedisCacheConfig::default(),
            memory: MemoryCacheConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisCacheConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Prepended to every key so several deployments can share one Redis.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Entry count bound before moka starts evicting.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
        }
    }
}

fn default_order_list_ttl() -> u64 {
    10
}

// Half an hour: the roster only changes when staff accounts change.
fn default_roster_ttl() -> u64 {
    30 * 60
}

fn default_redis_url() -> String {
    "redis://localhost:6379".into()
}

fn default_key_prefix() -> String {
    "repairdesk:".into()
}

fn default_max_capacity() -> u64 {
    10_000
}

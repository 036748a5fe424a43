//! Key/value backend behind the order-list and roster caches.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// String-valued store with per-entry expiry. Implemented by the Redis
/// and moka backends; typed access lives one layer up.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// `None` for absent and expired keys alike.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Remove every key starting with `pattern` minus its trailing `*`,
    /// e.g. `orders:list:*`. Returns how many went.
    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64>;

    async fn health_check(&self) -> AppResult<bool>;
}

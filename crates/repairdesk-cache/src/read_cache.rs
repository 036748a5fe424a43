//! Typed read-through cache for list-style queries.
//!
//! The cache is never a system of record: a backend failure on read
//! or write is logged and the caller falls through to the store.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use repairdesk_core::result::AppResult;
use repairdesk_core::traits::cache::CacheProvider;

use crate::provider::CacheManager;

/// Typed facade over the shared [`CacheManager`].
#[derive(Debug, Clone)]
pub struct ReadCache {
    cache: Arc<CacheManager>,
}

impl ReadCache {
    pub fn new(cache: Arc<CacheManager>) -> Self {
        Self { cache }
    }

    /// Look up a value. Backend and decode failures read as a miss.
    pub async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        let raw = match self.cache.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key, error = %e, "Cache read failed; treating as miss");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Cached value no longer decodes; treating as miss");
                None
            }
        }
    }

    /// Store a value. Failures are logged, not returned.
    pub async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T, ttl: Duration) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "Could not encode value for cache");
                return;
            }
        };
        if let Err(e) = self.cache.set(key, &json, ttl).await {
            warn!(key, error = %e, "Cache write failed");
        }
    }

    pub async fn remove(&self, key: &str) {
        if let Err(e) = self.cache.delete(key).await {
            warn!(key, error = %e, "Cache delete failed");
        }
    }

    /// Return the cached value, or run `supplier`, cache its result, and
    /// return it. Supplier errors propagate and nothing is cached.
    pub async fn get_or_create<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        supplier: F,
    ) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = AppResult<T>> + Send,
    {
        if let Some(hit) = self.get::<T>(key).await {
            debug!(key, "Cache hit");
            return Ok(hit);
        }
        let value = supplier().await?;
        self.set(key, &value, ttl).await;
        Ok(value)
    }

    /// Remove every entry under a trailing-wildcard pattern.
    pub async fn invalidate_prefix(&self, pattern: &str) -> u64 {
        match self.cache.delete_pattern(pattern).await {
            Ok(count) => count,
            Err(e) => {
                warn!(pattern, error = %e, "Cache prefix invalidation failed");
                0
            }
        }
    }
}

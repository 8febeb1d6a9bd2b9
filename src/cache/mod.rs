//! Cache layer
//!
//! In-process cache (moka) for data read on every request. Currently that
//! is the site settings map injected into every template.
//!
//! # Usage
//!
//! ```rust,ignore
//! use shramic_cms::cache::{create_cache, CacheLayer};
//! use shramic_cms::config::CacheConfig;
//!
//! let cache = create_cache(&CacheConfig::default());
//! cache.set("settings:site", &map).await?;
//! ```

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;

pub use memory::MemoryCache;

/// Cache layer trait
///
/// Generic methods keep this trait from being object-safe, so services hold
/// a concrete `Arc<MemoryCache>`.
#[async_trait]
pub trait CacheLayer: Send + Sync {
    /// Get a value from cache
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>>;

    /// Store a value for the cache's configured TTL
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T) -> Result<()>;

    /// Delete a value from cache
    async fn delete(&self, key: &str) -> Result<()>;

    /// Delete every key starting with `prefix`
    async fn delete_prefix(&self, prefix: &str) -> Result<()>;

    /// Clear all cache entries
    async fn clear(&self) -> Result<()>;
}

/// Create the in-memory cache from configuration
pub fn create_cache(config: &CacheConfig) -> Arc<MemoryCache> {
    let ttl = Duration::from_secs(config.ttl_seconds.max(1));
    Arc::new(MemoryCache::with_capacity_and_ttl(1_000, ttl))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_cache_from_config() {
        let cache = create_cache(&CacheConfig::default());

        cache
            .set("test_key", &"test_value".to_string())
            .await
            .expect("Failed to set");
        let result: Option<String> = cache.get("test_key").await.expect("Failed to get");
        assert_eq!(result, Some("test_value".to_string()));
        assert_eq!(cache.default_ttl(), Duration::from_secs(300));
    }

    #[tokio::test]
    async fn test_zero_ttl_is_raised_to_one_second() {
        let cache = create_cache(&CacheConfig { ttl_seconds: 0 });
        assert_eq!(cache.default_ttl(), Duration::from_secs(1));
    }
}

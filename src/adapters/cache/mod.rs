//! Advisory read cache
//!
//! Query paths consult the [`Cache`] before the repository. Nothing depends
//! on an entry being present, and cache failures never fail a request.
//!
//! Commands fence a sample's keys at its new version after every persist, so
//! a lookup that read the previous version cannot write it back. A fence
//! lives for one TTL; a lookup stalled longer than that can still cache an
//! outdated sample for one more TTL.

pub mod memory;

pub use memory::InMemoryCache;

use crate::config::schema::CacheConfig;
use crate::domain::clock::SystemClock;
use crate::domain::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Key-value store with per-entry expiry
#[async_trait]
pub trait Cache: Send + Sync {
    /// Fetch a live entry
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store an entry that expires after `ttl`
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()>;

    /// Store an entry tagged with the version it was read at
    ///
    /// Returns `false` without storing when a live entry or fence for `key`
    /// carries a newer version.
    async fn set_versioned(
        &self,
        key: &str,
        value: Value,
        version: u64,
        ttl: Duration,
    ) -> Result<bool>;

    /// Drop the entry and refuse values older than `version` until `ttl` passes
    async fn fence(&self, key: &str, version: u64, ttl: Duration) -> Result<()>;

    /// Drop an entry if present
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Create the cache described by the configuration
///
/// Returns `None` when caching is disabled.
pub fn create_cache(config: &CacheConfig) -> Option<Arc<dyn Cache + Send + Sync>> {
    if !config.enabled {
        tracing::info!("Sample cache disabled");
        return None;
    }
    tracing::info!(ttl_seconds = config.ttl_seconds, "Using in-memory sample cache");
    Some(Arc::new(InMemoryCache::new(Arc::new(SystemClock))) as Arc<dyn Cache + Send + Sync>)
}

//! In-process TTL cache

use super::Cache;
use crate::domain::clock::Clock;
use crate::domain::{LabError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Inserts between sweeps of expired entries
const PURGE_INTERVAL: usize = 64;

/// A cached value, or a fence (`value: None`) left by [`Cache::fence`]
struct Entry {
    value: Option<Value>,
    version: u64,
    expires_at: DateTime<Utc>,
}

/// Cache held in a `HashMap`
///
/// An expired entry is dropped when it is read, and every `PURGE_INTERVAL`th
/// insert sweeps all expired entries.
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
    inserts: AtomicUsize,
}

impl InMemoryCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            inserts: AtomicUsize::new(0),
        }
    }

    /// Number of stored entries and fences, expired or not
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn expiry(&self, now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| LabError::InvalidArgument(format!("Invalid cache TTL: {e}")))?;
        now.checked_add_signed(ttl).ok_or_else(|| {
            LabError::InvalidArgument(format!(
                "Cache TTL of {}s is out of range",
                ttl.num_seconds()
            ))
        })
    }

    /// Insert under the write lock, sweeping expired entries now and then
    ///
    /// Unless `overwrite` is set, the entry is not written when a live entry
    /// holds a newer version.
    async fn insert(&self, key: &str, entry: Entry, now: DateTime<Utc>, overwrite: bool) -> bool {
        let mut entries = self.entries.write().await;
        if self.inserts.fetch_add(1, Ordering::Relaxed) % PURGE_INTERVAL == PURGE_INTERVAL - 1 {
            let before = entries.len();
            entries.retain(|_, existing| existing.expires_at > now);
            tracing::trace!(purged = before - entries.len(), "Expired cache entries purged");
        }

        if let Some(existing) = entries.get(key).filter(|_| !overwrite) {
            if existing.expires_at > now && existing.version > entry.version {
                return false;
            }
        }
        entries.insert(key.to_string(), entry);
        true
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let now = self.clock.now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Ok(entry.value.clone()),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        self.entries.write().await.remove(key);
        tracing::trace!(key = key, "Cache entry expired");
        Ok(None)
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        let now = self.clock.now();
        let entry = Entry {
            value: Some(value),
            version: 0,
            expires_at: self.expiry(now, ttl)?,
        };
        self.insert(key, entry, now, true).await;
        Ok(())
    }

    async fn set_versioned(
        &self,
        key: &str,
        value: Value,
        version: u64,
        ttl: Duration,
    ) -> Result<bool> {
        let now = self.clock.now();
        let entry = Entry {
            value: Some(value),
            version,
            expires_at: self.expiry(now, ttl)?,
        };
        let stored = self.insert(key, entry, now, false).await;
        if !stored {
            tracing::debug!(key = key, version = version, "Skipped caching an outdated sample");
        }
        Ok(stored)
    }

    async fn fence(&self, key: &str, version: u64, ttl: Duration) -> Result<()> {
        let now = self.clock.now();
        let entry = Entry {
            value: None,
            version,
            expires_at: self.expiry(now, ttl)?,
        };
        self.insert(key, entry, now, false).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::Mutex;

    struct SteppingClock(Mutex<DateTime<Utc>>);

    impl SteppingClock {
        fn advance(&self, seconds: i64) {
            let mut now = self.0.lock().unwrap();
            *now += chrono::Duration::seconds(seconds);
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn clock() -> Arc<SteppingClock> {
        Arc::new(SteppingClock(Mutex::new(
            Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
        )))
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let cache = InMemoryCache::new(clock());
        cache
            .set("sample:code:LAB-2025-000001", json!({"status": "Received"}), Duration::from_secs(60))
            .await
            .unwrap();

        let hit = cache.get("sample:code:LAB-2025-000001").await.unwrap();
        assert_eq!(hit, Some(json!({"status": "Received"})));

        cache.remove("sample:code:LAB-2025-000001").await.unwrap();
        assert!(cache.get("sample:code:LAB-2025-000001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let clock = clock();
        let cache = InMemoryCache::new(clock.clone());
        cache.set("a", json!(1), Duration::from_secs(30)).await.unwrap();
        cache.set("b", json!(2), Duration::from_secs(300)).await.unwrap();

        clock.advance(29);
        assert!(cache.get("a").await.unwrap().is_some());

        clock.advance(1);
        assert!(cache.get("a").await.unwrap().is_none());
        assert_eq!(cache.len().await, 1);

        clock.advance(1000);
        assert!(cache.get("b").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_fence_blocks_older_versions() {
        let cache = InMemoryCache::new(clock());
        let ttl = Duration::from_secs(60);
        assert!(cache.set_versioned("k", json!("v1"), 1, ttl).await.unwrap());

        cache.fence("k", 2, ttl).await.unwrap();
        assert!(cache.get("k").await.unwrap().is_none());

        // A reader that loaded version 1 before the fence must not repopulate
        assert!(!cache.set_versioned("k", json!("v1"), 1, ttl).await.unwrap());
        assert!(cache.get("k").await.unwrap().is_none());

        assert!(cache.set_versioned("k", json!("v2"), 2, ttl).await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), Some(json!("v2")));
    }

    #[tokio::test]
    async fn test_expired_fence_no_longer_blocks() {
        let clock = clock();
        let cache = InMemoryCache::new(clock.clone());
        cache.fence("k", 5, Duration::from_secs(10)).await.unwrap();

        clock.advance(11);
        assert!(cache.set_versioned("k", json!(3), 3, Duration::from_secs(10)).await.unwrap());
    }

    #[tokio::test]
    async fn test_out_of_range_ttl_is_rejected() {
        let cache = InMemoryCache::new(clock());
        let err = cache
            .set("k", json!(1), Duration::from_secs(10_000_000_000_000))
            .await
            .unwrap_err();
        assert!(matches!(err, LabError::InvalidArgument(_)));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_inserts_sweep_unrelated_expired_keys() {
        let clock = clock();
        let cache = InMemoryCache::new(clock.clone());
        for i in 0..10 {
            cache
                .set(&format!("sample:id:{i}"), json!(i), Duration::from_secs(30))
                .await
                .unwrap();
        }
        clock.advance(60);

        for i in 0..PURGE_INTERVAL - 10 {
            cache
                .set(&format!("sample:code:{i}"), json!(i), Duration::from_secs(300))
                .await
                .unwrap();
        }

        // The stale id entries were never read again
        assert_eq!(cache.len().await, PURGE_INTERVAL - 10);
        assert!(cache.get("sample:code:0").await.unwrap().is_some());
    }
}

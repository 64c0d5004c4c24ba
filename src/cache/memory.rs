//! In-process cache store

use crate::cache::CacheStore;
use crate::error::{BrandForgeError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cached value with its expiry
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: String,
    pub expires_at: Instant,
}

impl CacheEntry {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Thread-safe map with per-entry TTL.
///
/// Expired entries are dropped when read, and swept on every write so keys that
/// are never read again do not accumulate.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until purged
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        sweep_expired(&mut self.entries.write(), Instant::now())
    }
}

fn sweep_expired(entries: &mut HashMap<String, CacheEntry>, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired(now));
    before - entries.len()
}

/// Translate a `*` glob into an anchored regex
fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let escaped = regex::escape(pattern).replace(r"\*", ".*");
    Regex::new(&format!("^{}$", escaped))
        .map_err(|e| BrandForgeError::cache(format!("Invalid key pattern '{}': {}", pattern, e)))
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: re-check under the write lock, a concurrent set may have refreshed it
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let entry = CacheEntry {
            value: value.to_string(),
            expires_at: now + ttl,
        };

        let mut entries = self.entries.write();
        let swept = sweep_expired(&mut entries, now);
        if swept > 0 {
            tracing::debug!(swept, "Dropped expired cache entries");
        }
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete_matching(&self, pattern: &str) -> Result<usize> {
        let matcher = glob_to_regex(pattern)?;
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| !matcher.is_match(key));
        Ok(before - entries.len())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();
        cache.set_ex("foo", "bar", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get("foo").await.unwrap(), Some("bar".to_string()));
        assert_eq!(cache.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_refreshes_value() {
        let cache = MemoryCache::new();
        cache.set_ex("foo", "old", Duration::from_secs(60)).await.unwrap();
        cache.set_ex("foo", "new", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get("foo").await.unwrap(), Some("new".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_removed_on_read() {
        let cache = MemoryCache::new();
        cache.set_ex("foo", "bar", Duration::ZERO).await.unwrap();
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.get("foo").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let cache = MemoryCache::new();
        cache.set_ex("long", "2", Duration::from_secs(60)).await.unwrap();
        cache.set_ex("short", "1", Duration::ZERO).await.unwrap();

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("long").await.unwrap(), Some("2".to_string()));
        assert_eq!(cache.purge_expired(), 0);
    }

    #[tokio::test]
    async fn test_writes_sweep_unread_expired_entries() {
        let cache = MemoryCache::new();
        for i in 0..10 {
            cache.set_ex(&format!("stale{}", i), "x", Duration::from_millis(10)).await.unwrap();
        }
        assert_eq!(cache.len(), 10);

        tokio::time::sleep(Duration::from_millis(30)).await;
        // None of the stale keys is read again
        cache.set_ex("fresh", "y", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("fresh").await.unwrap(), Some("y".to_string()));
    }

    #[tokio::test]
    async fn test_delete_matching_glob() {
        let cache = MemoryCache::new();
        let ttl = Duration::from_secs(60);
        cache.set_ex("ai:brands:abc", "1", ttl).await.unwrap();
        cache.set_ex("ai:brands:def", "2", ttl).await.unwrap();
        cache.set_ex("ai:slogans:abc", "3", ttl).await.unwrap();
        cache.set_ex("ai.brands.xyz", "4", ttl).await.unwrap();

        assert_eq!(cache.delete_matching("ai:brands:*").await.unwrap(), 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.delete_matching("*abc").await.unwrap(), 1);
        assert_eq!(cache.delete_matching("nothing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_writers() {
        let cache = MemoryCache::new();
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let cache = cache.clone();
                tokio::spawn(async move {
                    cache
                        .set_ex(&format!("key{}", i % 4), &i.to_string(), Duration::from_secs(60))
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(cache.len(), 4);
    }
}

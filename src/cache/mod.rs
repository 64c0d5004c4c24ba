//! Generation result caching
//!
//! [`CacheStore`] is the raw key-value backend. [`GenerationCache`] sits on top of
//! it and is strictly best-effort: storage failures never reach the caller.

pub mod memory;
#[cfg(feature = "upstash")]
pub mod upstash;

pub use memory::MemoryCache;
#[cfg(feature = "upstash")]
pub use upstash::UpstashCache;

use crate::error::Result;
use crate::types::{GenerationParams, GenerationRequest, ProviderId};
use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;

/// Default time-to-live for cached generations
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Key-value store with per-entry expiry
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a live value
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value that expires after `ttl`
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Delete every key matching a glob pattern (`*` wildcard), returning how many were removed
    async fn delete_matching(&self, pattern: &str) -> Result<usize>;

    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Whether entries outlive the current process
    fn is_persistent(&self) -> bool {
        false
    }
}

#[derive(Serialize)]
struct KeyMaterial<'a> {
    params: &'a GenerationParams,
    provider: ProviderId,
}

/// Derive the cache key for a request: `ai:{operation}:{sha256 of canonical params}`
pub fn cache_key(request: &GenerationRequest) -> String {
    let params = request.params.normalized();
    let material = KeyMaterial {
        params: &params,
        provider: request.provider,
    };
    // Struct and enum fields serialize in declaration order, so the JSON is canonical
    let canonical = serde_json::to_string(&material).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("ai:{}:{:x}", request.operation().namespace(), hasher.finalize())
}

/// Best-effort cache of generated lists.
///
/// Reads that fail, or find something undecodable or empty, count as a miss.
/// Writes that fail are dropped. Both are logged at `warn`.
#[derive(Clone)]
pub struct GenerationCache {
    store: Option<Arc<dyn CacheStore>>,
    ttl: Duration,
}

impl GenerationCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self {
            store: Some(store),
            ttl,
        }
    }

    /// In-process cache with the default TTL
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCache::new()), DEFAULT_TTL)
    }

    /// A cache that never hits and never stores
    pub fn disabled() -> Self {
        Self {
            store: None,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// True when entries survive a restart, so warming or purging them is meaningful
    pub fn is_persistent(&self) -> bool {
        self.store.as_ref().is_some_and(|store| store.is_persistent())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached list for this request, if any
    pub async fn get(&self, request: &GenerationRequest) -> Option<Vec<String>> {
        let store = self.store.as_ref()?;
        let key = cache_key(request);

        let raw = match store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(
                    backend = store.name(),
                    key = %key,
                    error = %e,
                    "Cache read failed, treating as miss"
                );
                return None;
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(items) if !items.is_empty() => Some(items),
            Ok(_) => {
                tracing::warn!(backend = store.name(), key = %key, "Ignoring empty cached list");
                None
            }
            Err(e) => {
                tracing::warn!(
                    backend = store.name(),
                    key = %key,
                    error = %e,
                    "Ignoring undecodable cache entry"
                );
                None
            }
        }
    }

    /// Store a list under this request's key with the configured TTL
    pub async fn set(&self, request: &GenerationRequest, items: &[String]) {
        self.set_with_ttl(request, items, self.ttl).await
    }

    /// Store a list under this request's key with an explicit TTL
    pub async fn set_with_ttl(&self, request: &GenerationRequest, items: &[String], ttl: Duration) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        if items.is_empty() {
            return;
        }

        let key = cache_key(request);
        let value = match serde_json::to_string(items) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Could not serialize cache entry");
                return;
            }
        };

        if let Err(e) = store.set_ex(&key, &value, ttl).await {
            tracing::warn!(
                backend = store.name(),
                key = %key,
                error = %e,
                "Cache write failed, skipping"
            );
        } else {
            tracing::debug!(
                backend = store.name(),
                key = %key,
                ttl_secs = ttl.as_secs(),
                "Cached generation"
            );
        }
    }

    /// Purge keys matching a glob pattern such as `ai:brands:*`. Returns 0 on failure.
    pub async fn invalidate(&self, pattern: &str) -> usize {
        let Some(store) = self.store.as_ref() else {
            return 0;
        };

        match store.delete_matching(pattern).await {
            Ok(removed) => {
                tracing::info!(
                    backend = store.name(),
                    pattern = %pattern,
                    removed,
                    "Cache invalidated"
                );
                removed
            }
            Err(e) => {
                tracing::warn!(
                    backend = store.name(),
                    pattern = %pattern,
                    error = %e,
                    "Cache invalidation failed"
                );
                0
            }
        }
    }
}

impl std::fmt::Debug for GenerationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationCache")
            .field("backend", &self.store.as_ref().map(|s| s.name()))
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BrandForgeError;

    struct BrokenStore;

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(BrandForgeError::cache("connection refused"))
        }

        async fn set_ex(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<()> {
            Err(BrandForgeError::cache("connection refused"))
        }

        async fn delete_matching(&self, _pattern: &str) -> Result<usize> {
            Err(BrandForgeError::cache("connection refused"))
        }

        fn name(&self) -> &'static str {
            "broken"
        }
    }

    fn items(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_key_is_namespaced_and_stable() {
        let request = GenerationRequest::brand_names("tech", "modern", ProviderId::OpenAi);
        let key = cache_key(&request);
        assert!(key.starts_with("ai:brands:"));
        assert_eq!(key.len(), "ai:brands:".len() + 64);
        assert_eq!(key, cache_key(&request.clone()));

        let slogan_key = cache_key(&GenerationRequest::slogans("Nova", "tech", ProviderId::OpenAi));
        assert!(slogan_key.starts_with("ai:slogans:"));
    }

    #[test]
    fn test_key_uses_normalized_params() {
        let a = GenerationRequest::brand_names("tech", "modern", ProviderId::Gemini);
        let b = GenerationRequest::brand_names(" Tech", "MODERN ", ProviderId::Gemini);
        assert_eq!(cache_key(&a), cache_key(&b));
    }

    #[test]
    fn test_key_distinguishes_provider_and_params() {
        let base = GenerationRequest::brand_names("tech", "modern", ProviderId::OpenAi);
        assert_ne!(cache_key(&base), cache_key(&base.with_provider(ProviderId::Gemini)));
        assert_ne!(
            cache_key(&base),
            cache_key(&GenerationRequest::brand_names("tech", "eco", ProviderId::OpenAi))
        );
    }

    #[test]
    fn test_persistence_follows_store() {
        assert!(!GenerationCache::in_memory().is_persistent());
        assert!(!GenerationCache::new(Arc::new(BrokenStore), DEFAULT_TTL).is_persistent());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let cache = GenerationCache::in_memory();
        let request = GenerationRequest::slogans("Nova", "tech", ProviderId::DeepSeek);

        assert_eq!(cache.get(&request).await, None);
        cache.set(&request, &items(&["Shine on", "Go further"])).await;
        assert_eq!(cache.get(&request).await, Some(items(&["Shine on", "Go further"])));
    }

    #[tokio::test]
    async fn test_expiry() {
        let cache = GenerationCache::in_memory();
        let request = GenerationRequest::brand_names("food", "eco", ProviderId::OpenAi);

        cache
            .set_with_ttl(&request, &items(&["Leafy"]), Duration::from_millis(30))
            .await;
        assert!(cache.get(&request).await.is_some());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(cache.get(&request).await, None);
    }

    #[tokio::test]
    async fn test_storage_failures_are_swallowed() {
        let cache = GenerationCache::new(Arc::new(BrokenStore), DEFAULT_TTL);
        let request = GenerationRequest::brand_names("tech", "modern", ProviderId::OpenAi);

        cache.set(&request, &items(&["Brand1"])).await;
        assert_eq!(cache.get(&request).await, None);
        assert_eq!(cache.invalidate("ai:*").await, 0);
    }

    #[tokio::test]
    async fn test_undecodable_and_empty_entries_miss() {
        let store = Arc::new(MemoryCache::new());
        let cache = GenerationCache::new(store.clone(), DEFAULT_TTL);
        let request = GenerationRequest::brand_names("tech", "modern", ProviderId::OpenAi);
        let key = cache_key(&request);

        store.set_ex(&key, "not json", DEFAULT_TTL).await.unwrap();
        assert_eq!(cache.get(&request).await, None);

        store.set_ex(&key, "[]", DEFAULT_TTL).await.unwrap();
        assert_eq!(cache.get(&request).await, None);

        cache.set(&request, &[]).await;
        assert_eq!(store.get(&key).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_disabled_cache() {
        let cache = GenerationCache::disabled();
        let request = GenerationRequest::brand_names("tech", "modern", ProviderId::OpenAi);

        assert!(!cache.is_enabled());
        assert!(!cache.is_persistent());
        cache.set(&request, &items(&["Brand1"])).await;
        assert_eq!(cache.get(&request).await, None);
    }

    #[tokio::test]
    async fn test_invalidate_by_namespace() {
        let cache = GenerationCache::in_memory();
        let brands = GenerationRequest::brand_names("tech", "modern", ProviderId::OpenAi);
        let slogans = GenerationRequest::slogans("Nova", "tech", ProviderId::OpenAi);

        cache.set(&brands, &items(&["Brand1"])).await;
        cache.set(&slogans, &items(&["Slogan1"])).await;

        assert_eq!(cache.invalidate("ai:brands:*").await, 1);
        assert_eq!(cache.get(&brands).await, None);
        assert!(cache.get(&slogans).await.is_some());
    }
}

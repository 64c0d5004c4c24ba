//! Brand name and slogan generator
//!
//! Checks the cache, asks the requested provider on a miss, falls back once to
//! the default provider, and writes successful results back to the cache.

use crate::cache::GenerationCache;
use crate::error::{BrandForgeError, Result};
use crate::llm::{create_backend, parse_response, prompt, CompletionBackend};
use crate::types::{
    BrandNames, GenerationMetrics, GenerationRequest, GenerationResult, MetricsSnapshot,
    ProviderConfig, ProviderId, Slogans, POPULAR_COMBINATIONS,
};
use futures::future::join_all;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Generator shared across requests. Cloning is cheap; clones share backends, cache and metrics.
#[derive(Clone)]
pub struct BrandGenerator {
    backends: Arc<RwLock<HashMap<ProviderId, Arc<dyn CompletionBackend>>>>,
    default_provider: ProviderId,
    cache: GenerationCache,
    metrics: Arc<GenerationMetrics>,
}

/// Outcome of warming the cache with popular combinations
#[derive(Debug, Clone, Default, Serialize)]
pub struct PreloadReport {
    pub warmed: Vec<String>,
    pub failed: Vec<String>,
}

impl BrandGenerator {
    /// Create a generator backed by the given cache, falling back to OpenAI
    pub fn new(cache: GenerationCache) -> Self {
        Self {
            backends: Arc::new(RwLock::new(HashMap::new())),
            default_provider: ProviderId::default(),
            cache,
            metrics: Arc::new(GenerationMetrics::new()),
        }
    }

    /// Provider used when the requested one fails
    pub fn with_default_provider(mut self, provider: ProviderId) -> Self {
        self.default_provider = provider;
        self
    }

    /// Build and register a backend from configuration
    pub fn add_provider(&self, config: &ProviderConfig) -> Result<()> {
        let backend = create_backend(config)?;
        self.register_backend(backend);
        Ok(())
    }

    /// Register a backend, replacing any previous one for the same provider
    pub fn register_backend(&self, backend: Arc<dyn CompletionBackend>) {
        let provider = backend.provider();
        tracing::debug!(
            provider = %provider,
            model = backend.model(),
            "Registered completion backend"
        );
        self.backends.write().insert(provider, backend);
    }

    pub fn default_provider(&self) -> ProviderId {
        self.default_provider
    }

    pub fn cache(&self) -> &GenerationCache {
        &self.cache
    }

    /// Generate brand names for a sector and style
    pub async fn generate_brand_names(
        &self,
        sector: &str,
        style: &str,
        provider: &str,
    ) -> Result<BrandNames> {
        let provider: ProviderId = provider.parse()?;
        let request = GenerationRequest::brand_names(sector, style, provider);
        self.generate(&request).await.map(BrandNames::from)
    }

    /// Generate slogans for a brand in a sector
    pub async fn generate_slogans(
        &self,
        brand_name: &str,
        sector: &str,
        provider: &str,
    ) -> Result<Slogans> {
        let provider: ProviderId = provider.parse()?;
        let request = GenerationRequest::slogans(brand_name, sector, provider);
        self.generate(&request).await.map(Slogans::from)
    }

    /// Serve a request from cache, or generate it with one-shot fallback to the default provider
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        request.params.validate()?;
        self.metrics.increment_requests();
        let operation = request.operation();
        let overall_start = Instant::now();

        if let Some(items) = self.cache.get(request).await {
            self.metrics.increment_cache_hits();
            tracing::info!(
                provider = %request.provider,
                operation = %operation,
                from_cache = true,
                "Served generation from cache"
            );
            return Ok(GenerationResult {
                operation,
                items,
                provider: request.provider,
                from_cache: true,
            });
        }
        self.metrics.increment_cache_misses();

        let prompt = prompt::build_prompt(&request.params);

        let error = match self.generate_with_provider(request.provider, &prompt).await {
            Ok(items) => {
                self.cache.set(request, &items).await;
                tracing::info!(
                    provider = %request.provider,
                    operation = %operation,
                    fallback_used = false,
                    duration_ms = %overall_start.elapsed().as_millis(),
                    "Generation completed"
                );
                return Ok(GenerationResult {
                    operation,
                    items,
                    provider: request.provider,
                    from_cache: false,
                });
            }
            Err(e) => e,
        };

        if request.provider == self.default_provider {
            tracing::warn!(provider = %request.provider, error = %error, "Default provider failed");
            self.metrics.increment_failures();
            return Err(BrandForgeError::generation(operation));
        }

        tracing::warn!(
            provider = %request.provider,
            fallback = %self.default_provider,
            upstream = error.is_upstream_failure(),
            error = %error,
            "Provider failed, falling back to default provider"
        );
        self.metrics.increment_fallbacks();

        match self.generate_with_provider(self.default_provider, &prompt).await {
            Ok(items) => {
                // Cached under the provider that produced the items, not the one requested
                let produced = request.with_provider(self.default_provider);
                self.cache.set(&produced, &items).await;
                tracing::info!(
                    provider = %self.default_provider,
                    requested = %request.provider,
                    operation = %operation,
                    fallback_used = true,
                    duration_ms = %overall_start.elapsed().as_millis(),
                    "Generation completed with fallback provider"
                );
                Ok(GenerationResult {
                    operation,
                    items,
                    provider: self.default_provider,
                    from_cache: false,
                })
            }
            Err(e) => {
                tracing::warn!(
                    provider = %self.default_provider,
                    error = %e,
                    "Fallback provider failed"
                );
                self.metrics.increment_failures();
                Err(BrandForgeError::generation(operation))
            }
        }
    }

    /// Call one provider and parse its answer. An empty list counts as a failure.
    async fn generate_with_provider(
        &self,
        provider: ProviderId,
        prompt: &str,
    ) -> Result<Vec<String>> {
        let start_time = Instant::now();

        // Clone the Arc so no lock is held across the await
        let backend = self.backend(provider).ok_or_else(|| {
            BrandForgeError::config(format!("Provider not configured: {}", provider))
        })?;

        self.metrics.increment_upstream_calls();
        let result = backend.complete(prompt).await.and_then(|content| {
            let items = parse_response(&content);
            if items.is_empty() {
                Err(BrandForgeError::parse(
                    format!("No usable lines in {} response", provider),
                    Some(content),
                ))
            } else {
                Ok(items)
            }
        });

        match &result {
            Ok(items) => {
                tracing::debug!(
                    provider = %provider,
                    items = items.len(),
                    duration_ms = %start_time.elapsed().as_millis(),
                    "Provider call succeeded"
                );
            }
            Err(e) => {
                self.metrics.increment_upstream_failures();
                tracing::debug!(
                    provider = %provider,
                    error = %e,
                    duration_ms = %start_time.elapsed().as_millis(),
                    "Provider call failed"
                );
            }
        }

        result
    }

    fn backend(&self, provider: ProviderId) -> Option<Arc<dyn CompletionBackend>> {
        self.backends.read().get(&provider).cloned()
    }

    /// Providers with a registered backend, in preference order
    pub fn configured_providers(&self) -> Vec<ProviderId> {
        let backends = self.backends.read();
        ProviderId::ALL
            .into_iter()
            .filter(|p| backends.contains_key(p))
            .collect()
    }

    /// Check if provider has a backend
    pub fn has_provider(&self, provider: ProviderId) -> bool {
        self.backends.read().contains_key(&provider)
    }

    /// Check if any providers are configured
    pub fn is_ready(&self) -> bool {
        !self.backends.read().is_empty()
    }

    /// Providers that answer a trivial prompt right now, checked concurrently.
    ///
    /// Health checks bypass the cache and the fallback policy.
    pub async fn available_providers(&self) -> Vec<ProviderId> {
        let backends: Vec<_> = self
            .configured_providers()
            .into_iter()
            .filter_map(|p| self.backend(p))
            .collect();

        let checks = backends.iter().map(|backend| async move {
            let provider = backend.provider();
            match backend.complete(prompt::HEALTH_CHECK_PROMPT).await {
                Ok(_) => Some(provider),
                Err(e) => {
                    tracing::warn!(provider = %provider, error = %e, "Provider unavailable");
                    None
                }
            }
        });

        join_all(checks).await.into_iter().flatten().collect()
    }

    /// First provider, in preference order, that answers a health check
    pub async fn best_available_provider(&self) -> Result<ProviderId> {
        self.available_providers()
            .await
            .into_iter()
            .next()
            .ok_or_else(|| BrandForgeError::config("No AI provider is available"))
    }

    /// Warm the cache with popular sector/style combinations for every configured provider.
    ///
    /// Runs sequentially to stay gentle on provider rate limits.
    pub async fn preload_popular_combinations(&self) -> PreloadReport {
        let mut report = PreloadReport::default();

        for (sector, style) in POPULAR_COMBINATIONS {
            for provider in self.configured_providers() {
                let label = format!("{}/{}/{}", sector, style, provider);
                let request = GenerationRequest::brand_names(*sector, *style, provider);
                match self.generate(&request).await {
                    Ok(result) if result.provider == provider => {
                        tracing::info!(
                            combination = %label,
                            from_cache = result.from_cache,
                            "Preloaded"
                        );
                        report.warmed.push(label);
                    }
                    Ok(result) => {
                        // Fallback output lands under the fallback provider's key
                        tracing::warn!(
                            combination = %label,
                            produced_by = %result.provider,
                            "Preload fell back"
                        );
                        report.failed.push(label);
                    }
                    Err(e) => {
                        tracing::warn!(combination = %label, error = %e, "Preload failed");
                        report.failed.push(label);
                    }
                }
            }
        }

        report
    }

    /// Purge cached generations matching a glob pattern
    pub async fn invalidate_cache(&self, pattern: &str) -> usize {
        self.cache.invalidate(pattern).await
    }

    /// Get performance metrics
    pub fn get_metrics(&self) -> Arc<GenerationMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Get current metrics snapshot
    pub fn get_metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Default for BrandGenerator {
    fn default() -> Self {
        Self::new(GenerationCache::in_memory())
    }
}

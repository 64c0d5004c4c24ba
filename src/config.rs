//! Environment-driven configuration

use crate::cache::{GenerationCache, MemoryCache, DEFAULT_TTL};
use crate::config_error;
use crate::error::Result;
use crate::llm::BrandGenerator;
use crate::types::{ProviderConfig, ProviderId};
use std::sync::Arc;
use std::time::Duration;

/// Where generated lists are cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Upstash { url: String, token: String },
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            ttl: DEFAULT_TTL,
        }
    }
}

/// Everything needed to assemble a [`BrandGenerator`]
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// One entry per provider whose API key is set
    pub providers: Vec<ProviderConfig>,
    pub default_provider: ProviderId,
    pub cache: CacheConfig,
}

fn env_prefix(provider: ProviderId) -> &'static str {
    match provider {
        ProviderId::OpenAi => "OPENAI",
        ProviderId::Gemini => "GEMINI",
        ProviderId::DeepSeek => "DEEPSEEK",
    }
}

impl AppConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut providers = Vec::new();
        for provider in ProviderId::ALL {
            let prefix = env_prefix(provider);
            let Some(api_key) = get(format!("{}_API_KEY", prefix).as_str()) else {
                continue;
            };

            let mut config = ProviderConfig::new(provider, api_key);
            if let Some(model) = get(format!("{}_MODEL", prefix).as_str()) {
                config = config.with_model(model);
            }
            if let Some(base_url) = get(format!("{}_BASE_URL", prefix).as_str()) {
                config = config.with_base_url(base_url);
            }
            if let Some(raw) = get(format!("{}_TIMEOUT_SECS", prefix).as_str()) {
                let secs: u64 = raw.parse().map_err(|e| {
                    config_error!("Invalid {}_TIMEOUT_SECS '{}': {}", prefix, raw, e)
                })?;
                if secs == 0 {
                    return Err(config_error!("{}_TIMEOUT_SECS must be at least 1 second", prefix));
                }
                config = config.with_timeout(Duration::from_secs(secs));
            }
            providers.push(config);
        }

        let default_provider = match get("BRAND_FORGE_DEFAULT_PROVIDER") {
            Some(name) => name.parse()?,
            None => ProviderId::default(),
        };

        let ttl = match get("BRAND_FORGE_CACHE_TTL") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .map_err(|e| config_error!("Invalid BRAND_FORGE_CACHE_TTL '{}': {}", raw, e))?;
                if secs == 0 {
                    return Err(config_error!("BRAND_FORGE_CACHE_TTL must be at least 1 second"));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TTL,
        };

        let upstash = match (get("REDIS_URL"), get("REDIS_TOKEN")) {
            (Some(url), Some(token)) => Some(CacheBackend::Upstash { url, token }),
            _ => None,
        };

        let backend = match get("BRAND_FORGE_CACHE").map(|v| v.to_lowercase()).as_deref() {
            None => upstash.unwrap_or(CacheBackend::Memory),
            Some("memory") => CacheBackend::Memory,
            Some("none") | Some("off") => CacheBackend::Disabled,
            Some("upstash") => upstash.ok_or_else(|| {
                config_error!("BRAND_FORGE_CACHE=upstash needs REDIS_URL and REDIS_TOKEN")
            })?,
            Some(other) => {
                return Err(config_error!(
                    "Unknown BRAND_FORGE_CACHE '{}'. Use memory, upstash or none",
                    other
                ))
            }
        };

        Ok(Self {
            providers,
            default_provider,
            cache: CacheConfig { backend, ttl },
        })
    }

    /// Build the configured cache
    pub fn build_cache(&self) -> Result<GenerationCache> {
        let ttl = self.cache.ttl;
        match &self.cache.backend {
            CacheBackend::Memory => Ok(GenerationCache::new(Arc::new(MemoryCache::new()), ttl)),
            CacheBackend::Disabled => Ok(GenerationCache::disabled()),
            #[cfg(feature = "upstash")]
            CacheBackend::Upstash { url, token } => Ok(GenerationCache::new(
                Arc::new(crate::cache::UpstashCache::new(url.as_str(), token.as_str())?),
                ttl,
            )),
            #[cfg(not(feature = "upstash"))]
            CacheBackend::Upstash { .. } => Err(config_error!(
                "This build has no Upstash support. Rebuild with the `upstash` feature"
            )),
        }
    }

    /// Assemble a generator with every configured provider registered
    pub fn build_generator(&self) -> Result<BrandGenerator> {
        if self.providers.is_empty() {
            return Err(config_error!(
                "No AI providers configured. \
                 Please set OPENAI_API_KEY, GEMINI_API_KEY, or DEEPSEEK_API_KEY."
            ));
        }

        let generator = BrandGenerator::new(self.build_cache()?)
            .with_default_provider(self.default_provider);
        for provider in &self.providers {
            generator.add_provider(provider)?;
        }

        if !generator.has_provider(self.default_provider) {
            tracing::warn!(
                provider = %self.default_provider,
                "Default provider has no API key, fallback will not succeed"
            );
        }

        Ok(generator)
    }
}

//! Core types and structures for brand-forge

use crate::error::{BrandForgeError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Hosted text-generation provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAi,
    Gemini,
    DeepSeek,
}

impl ProviderId {
    /// Every known provider, in preference order
    pub const ALL: [ProviderId; 3] = [ProviderId::OpenAi, ProviderId::Gemini, ProviderId::DeepSeek];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::Gemini => "gemini",
            ProviderId::DeepSeek => "deepseek",
        }
    }

    /// Model used when none is configured
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "gpt-4-turbo-preview",
            ProviderId::Gemini => "gemini-pro",
            ProviderId::DeepSeek => "deepseek-chat",
        }
    }

    /// API root used when no base URL override is configured
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderId::OpenAi => "https://api.openai.com/v1",
            ProviderId::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            ProviderId::DeepSeek => "https://api.deepseek.com/v1",
        }
    }
}

impl Default for ProviderId {
    fn default() -> Self {
        ProviderId::OpenAi
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = BrandForgeError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase();
        ProviderId::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| BrandForgeError::unsupported_provider(s.trim()))
    }
}

/// Kind of content being generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    BrandNames,
    Slogans,
}

impl Operation {
    /// Cache namespace for this operation
    pub fn namespace(&self) -> &'static str {
        match self {
            Operation::BrandNames => "brands",
            Operation::Slogans => "slogans",
        }
    }

    /// Number of items requested from the model
    pub fn item_count(&self) -> usize {
        match self {
            Operation::BrandNames => 10,
            Operation::Slogans => 5,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::BrandNames => write!(f, "brand names"),
            Operation::Slogans => write!(f, "slogans"),
        }
    }
}

/// Operation-specific generation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum GenerationParams {
    BrandNames { sector: String, style: String },
    Slogans { brand_name: String, sector: String },
}

impl GenerationParams {
    pub fn operation(&self) -> Operation {
        match self {
            GenerationParams::BrandNames { .. } => Operation::BrandNames,
            GenerationParams::Slogans { .. } => Operation::Slogans,
        }
    }

    /// Trimmed copy with sector and style lower-cased.
    ///
    /// Brand names keep their casing since it is echoed back in slogans.
    pub fn normalized(&self) -> Self {
        match self {
            GenerationParams::BrandNames { sector, style } => GenerationParams::BrandNames {
                sector: sector.trim().to_lowercase(),
                style: style.trim().to_lowercase(),
            },
            GenerationParams::Slogans { brand_name, sector } => GenerationParams::Slogans {
                brand_name: brand_name.trim().to_string(),
                sector: sector.trim().to_lowercase(),
            },
        }
    }

    /// Reject blank parameters
    pub fn validate(&self) -> Result<()> {
        let fields: [(&str, &str); 2] = match self {
            GenerationParams::BrandNames { sector, style } => {
                [("sector", sector), ("style", style)]
            }
            GenerationParams::Slogans { brand_name, sector } => {
                [("brand name", brand_name), ("sector", sector)]
            }
        };

        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(crate::validation_error!("{} is required", field));
            }
        }
        Ok(())
    }
}

/// A single generation request. Immutable, built per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub params: GenerationParams,
    pub provider: ProviderId,
}

impl GenerationRequest {
    pub fn brand_names(
        sector: impl Into<String>,
        style: impl Into<String>,
        provider: ProviderId,
    ) -> Self {
        Self {
            params: GenerationParams::BrandNames {
                sector: sector.into(),
                style: style.into(),
            },
            provider,
        }
    }

    pub fn slogans(
        brand_name: impl Into<String>,
        sector: impl Into<String>,
        provider: ProviderId,
    ) -> Self {
        Self {
            params: GenerationParams::Slogans {
                brand_name: brand_name.into(),
                sector: sector.into(),
            },
            provider,
        }
    }

    pub fn operation(&self) -> Operation {
        self.params.operation()
    }

    /// Same parameters, addressed to another provider
    pub fn with_provider(&self, provider: ProviderId) -> Self {
        Self {
            params: self.params.clone(),
            provider,
        }
    }
}

/// Outcome of a successful generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub operation: Operation,
    pub items: Vec<String>,
    /// Provider that actually produced the items
    pub provider: ProviderId,
    pub from_cache: bool,
}

/// Brand name generation output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandNames {
    pub brands: Vec<String>,
    pub provider: ProviderId,
    pub from_cache: bool,
}

impl From<GenerationResult> for BrandNames {
    fn from(result: GenerationResult) -> Self {
        Self {
            brands: result.items,
            provider: result.provider,
            from_cache: result.from_cache,
        }
    }
}

/// Slogan generation output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slogans {
    pub slogans: Vec<String>,
    pub provider: ProviderId,
    pub from_cache: bool,
}

impl From<GenerationResult> for Slogans {
    fn from(result: GenerationResult) -> Self {
        Self {
            slogans: result.items,
            provider: result.provider,
            from_cache: result.from_cache,
        }
    }
}

/// Connection settings for one provider backend
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: ProviderId,
    pub model: String,
    pub api_key: String,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Limit for a whole request, body included
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Provider defaults with the given key
    pub fn new(provider: ProviderId, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            api_key: api_key.into(),
            base_url: None,
            temperature: 0.8,
            max_tokens: 300,
            timeout: crate::llm::providers::REQUEST_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configured base URL or the provider default, without a trailing slash
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }
}

/// Industry sector offered by the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorOption {
    pub value: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

impl std::fmt::Display for SectorOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.icon, self.label)
    }
}

/// Naming style offered by the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleOption {
    pub value: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

impl std::fmt::Display for StyleOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.label, self.description)
    }
}

pub const SECTORS: &[SectorOption] = &[
    SectorOption { value: "tech", label: "Technology", icon: "💻" },
    SectorOption { value: "fashion", label: "Fashion", icon: "👗" },
    SectorOption { value: "food", label: "Food", icon: "🍕" },
    SectorOption { value: "health", label: "Health", icon: "🏥" },
    SectorOption { value: "finance", label: "Finance", icon: "💰" },
    SectorOption { value: "education", label: "Education", icon: "📚" },
    SectorOption { value: "travel", label: "Travel", icon: "✈️" },
    SectorOption { value: "beauty", label: "Beauty", icon: "💄" },
    SectorOption { value: "sports", label: "Sports", icon: "⚽" },
    SectorOption { value: "real-estate", label: "Real estate", icon: "🏠" },
];

pub const STYLES: &[StyleOption] = &[
    StyleOption {
        value: "modern",
        label: "Modern",
        description: "Clean, minimalist, contemporary",
    },
    StyleOption {
        value: "creative",
        label: "Creative",
        description: "Artistic, original, innovative",
    },
    StyleOption {
        value: "professional",
        label: "Professional",
        description: "Serious, corporate, reliable",
    },
    StyleOption {
        value: "playful",
        label: "Playful",
        description: "Fun, relaxed, approachable",
    },
    StyleOption {
        value: "luxury",
        label: "Luxury",
        description: "Premium, elegant, exclusive",
    },
    StyleOption {
        value: "eco",
        label: "Eco",
        description: "Natural, sustainable, responsible",
    },
];

/// Sector/style pairs warmed by cache preloading
pub const POPULAR_COMBINATIONS: &[(&str, &str)] = &[
    ("tech", "modern"),
    ("fashion", "luxury"),
    ("food", "creative"),
    ("health", "professional"),
];

/// Counters for generation activity
#[derive(Debug, Default)]
pub struct GenerationMetrics {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    upstream_calls: AtomicU64,
    upstream_failures: AtomicU64,
    fallbacks: AtomicU64,
    failures: AtomicU64,
}

impl GenerationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_requests(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cache_hits(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cache_misses(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_upstream_calls(&self) {
        self.upstream_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_upstream_failures(&self) {
        self.upstream_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_fallbacks(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failures(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            upstream_calls: self.upstream_calls.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`GenerationMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub upstream_calls: u64,
    pub upstream_failures: u64,
    pub fallbacks: u64,
    pub failures: u64,
}

impl MetricsSnapshot {
    /// Share of requests answered from cache, 0.0 when idle
    pub fn cache_hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing() {
        assert_eq!("openai".parse::<ProviderId>().unwrap(), ProviderId::OpenAi);
        assert_eq!(" Gemini ".parse::<ProviderId>().unwrap(), ProviderId::Gemini);
        assert_eq!("DEEPSEEK".parse::<ProviderId>().unwrap(), ProviderId::DeepSeek);

        let err = "unknown".parse::<ProviderId>().unwrap_err();
        assert!(matches!(
            err,
            BrandForgeError::UnsupportedProvider { ref name, .. } if name == "unknown"
        ));
    }

    #[test]
    fn test_provider_serde_names() {
        let json = serde_json::to_string(&ProviderId::ALL).unwrap();
        assert_eq!(json, r#"["openai","gemini","deepseek"]"#);
    }

    #[test]
    fn test_provider_config_defaults() {
        let config = ProviderConfig::new(ProviderId::DeepSeek, "key");
        assert_eq!(config.model, "deepseek-chat");
        assert_eq!(config.timeout, crate::llm::providers::REQUEST_TIMEOUT);
        assert_eq!(config.resolved_base_url(), "https://api.deepseek.com/v1");

        let config = config
            .with_timeout(Duration::from_secs(5))
            .with_base_url("http://localhost:8080/");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.resolved_base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_params_normalization() {
        let params = GenerationParams::BrandNames {
            sector: "  Tech ".to_string(),
            style: "MODERN".to_string(),
        };
        assert_eq!(
            params.normalized(),
            GenerationParams::BrandNames {
                sector: "tech".to_string(),
                style: "modern".to_string(),
            }
        );

        let params = GenerationParams::Slogans {
            brand_name: " NovaLoop ".to_string(),
            sector: "Food".to_string(),
        };
        assert_eq!(
            params.normalized(),
            GenerationParams::Slogans {
                brand_name: "NovaLoop".to_string(),
                sector: "food".to_string(),
            }
        );
    }

    #[test]
    fn test_params_validation() {
        assert!(GenerationRequest::brand_names("tech", "modern", ProviderId::OpenAi)
            .params
            .validate()
            .is_ok());

        let err = GenerationRequest::brand_names("tech", "   ", ProviderId::OpenAi)
            .params
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("style is required"));

        let err = GenerationRequest::slogans("", "tech", ProviderId::OpenAi)
            .params
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("brand name is required"));
    }

    #[test]
    fn test_result_views_serialize_camel_case() {
        let result = GenerationResult {
            operation: Operation::BrandNames,
            items: vec!["Brand1".to_string()],
            provider: ProviderId::Gemini,
            from_cache: true,
        };
        let view: BrandNames = result.into();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["brands"][0], "Brand1");
        assert_eq!(json["provider"], "gemini");
        assert_eq!(json["fromCache"], true);
    }

    #[test]
    fn test_provider_config_base_url() {
        let config = ProviderConfig::new(ProviderId::DeepSeek, "key");
        assert_eq!(config.model, "deepseek-chat");
        assert_eq!(config.resolved_base_url(), "https://api.deepseek.com/v1");

        let config = config.with_base_url("http://localhost:8080/");
        assert_eq!(config.resolved_base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_catalog_values_are_unique() {
        let mut sectors: Vec<_> = SECTORS.iter().map(|s| s.value).collect();
        sectors.sort();
        sectors.dedup();
        assert_eq!(sectors.len(), SECTORS.len());

        for (sector, style) in POPULAR_COMBINATIONS {
            assert!(SECTORS.iter().any(|s| s.value == *sector));
            assert!(STYLES.iter().any(|s| s.value == *style));
        }
    }

    #[test]
    fn test_metrics_snapshot() {
        let metrics = GenerationMetrics::new();
        assert_eq!(metrics.snapshot().cache_hit_rate(), 0.0);

        metrics.increment_cache_hits();
        metrics.increment_cache_misses();
        metrics.increment_upstream_calls();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.upstream_calls, 1);
        assert_eq!(snapshot.cache_hit_rate(), 0.5);
    }
}

//! LLM (Large Language Model) integration module
//!
//! Prompt building, provider adapters, response parsing and the generator that
//! ties them to the cache.

pub mod generator;
pub mod parser;
pub mod prompt;
pub mod providers;

// Re-export main functionality
pub use generator::{BrandGenerator, PreloadReport};
pub use parser::parse_response;
pub use prompt::build_prompt;

use crate::error::Result;
use crate::types::{ProviderConfig, ProviderId};
use async_trait::async_trait;
use std::sync::Arc;

/// A hosted completion endpoint
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send a single prompt and return the raw text answer
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Provider this backend talks to
    fn provider(&self) -> ProviderId;

    /// Get model name being used
    fn model(&self) -> &str;

    /// Check if backend is configured and ready
    fn is_ready(&self) -> bool;
}

/// Names of every supported provider
pub fn supported_providers() -> Vec<&'static str> {
    ProviderId::ALL.iter().map(|p| p.as_str()).collect()
}

/// Create the backend matching a provider configuration
pub fn create_backend(config: &ProviderConfig) -> Result<Arc<dyn CompletionBackend>> {
    match config.provider {
        ProviderId::OpenAi | ProviderId::DeepSeek => {
            Ok(Arc::new(providers::OpenAiProvider::new(config)?))
        }
        ProviderId::Gemini => Ok(Arc::new(providers::GeminiProvider::new(config)?)),
    }
}

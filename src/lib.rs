//! Brand Forge - AI-powered brand name and slogan generation
//!
//! Generates brand names and slogans through several hosted LLM providers, with
//! a best-effort result cache and a one-shot fallback to a default provider.

pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod llm;
pub mod types;

// Re-export commonly used types
pub use error::{BrandForgeError, Result};
pub use types::{
    BrandNames, GenerationParams, GenerationRequest, GenerationResult, MetricsSnapshot, Operation,
    ProviderConfig, ProviderId, Slogans,
};

// Re-export main functionality
pub use cache::{CacheStore, GenerationCache, MemoryCache};
pub use config::AppConfig;
pub use export::ProjectExport;
pub use llm::{BrandGenerator, CompletionBackend};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}

//! LLM provider implementations
//!
//! Each transport is implemented in its own module. DeepSeek speaks the OpenAI
//! chat protocol and reuses [`OpenAiProvider`].

pub mod gemini;
pub mod openai;

// Re-export providers for easy access
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use crate::error::{BrandForgeError, Result};
use crate::types::ProviderId;
use reqwest::{Client, Response};
use std::time::Duration;

/// Timeout applied to every provider request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("brand-forge/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| BrandForgeError::network(e.to_string(), None, None))
}

/// Map a failed send or body read. Timeouts report the configured limit.
pub(crate) fn transport_error(
    provider: ProviderId,
    err: reqwest::Error,
    timeout: Duration,
) -> BrandForgeError {
    if err.is_timeout() {
        BrandForgeError::timeout(format!("{} request", provider), timeout.as_secs())
    } else {
        BrandForgeError::from(err)
    }
}

/// Turn a non-success response into a typed error
pub(crate) async fn error_from_response(
    provider: ProviderId,
    response: Response,
    url: &str,
) -> BrandForgeError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

    match status.as_u16() {
        401 => BrandForgeError::authentication(format!(
            "Authentication failed (401). Please check your {} API key",
            provider
        )),
        403 => BrandForgeError::authentication(format!(
            "Access forbidden (403). Your {} API key may not have permission",
            provider
        )),
        429 => BrandForgeError::rate_limit(
            format!("{} rate limit exceeded (429). Please try again later", provider),
            retry_after,
        ),
        500..=599 => BrandForgeError::provider(
            provider,
            format!("Server error ({}). The API service is experiencing issues", status),
            Some(status.as_u16()),
        ),
        _ => BrandForgeError::network(
            format!("{} API request failed ({}): {}", provider, status, error_text),
            Some(status.as_u16()),
            Some(url.to_string()),
        ),
    }
}

/// Reject answers that carry no text
pub(crate) fn non_empty_content(provider: ProviderId, content: Option<String>) -> Result<String> {
    match content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(BrandForgeError::parse(format!("Empty response from {} API", provider), None)),
    }
}

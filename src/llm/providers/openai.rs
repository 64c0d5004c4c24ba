//! OpenAI provider implementation
//!
//! Supports OpenAI API and OpenAI-compatible APIs (DeepSeek)

use crate::error::{BrandForgeError, Result};
use crate::llm::CompletionBackend;
use crate::types::{ProviderConfig, ProviderId};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{build_client, error_from_response, non_empty_content, transport_error};

/// Chat-completions provider, used for both OpenAI and DeepSeek
pub struct OpenAiProvider {
    client: Client,
    provider: ProviderId,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let label = match config.provider {
            ProviderId::OpenAi => "OpenAI",
            ProviderId::DeepSeek => "DeepSeek",
            other => {
                return Err(BrandForgeError::config(format!(
                    "{} does not speak the OpenAI chat protocol",
                    other
                )))
            }
        };
        if config.api_key.is_empty() {
            return Err(BrandForgeError::config(format!("{} API key is required", label)));
        }

        Ok(Self {
            client: build_client(config.timeout)?,
            provider: config.provider,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.resolved_base_url(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout,
        })
    }

    /// Intelligently constructs the full API URL
    fn build_url(&self, endpoint: &str) -> String {
        if self.base_url.ends_with("/v1") {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/v1{}", self.base_url, endpoint)
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![OpenAiMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let url = self.build_url("/chat/completions");
        let response = self.client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(self.provider, e, self.timeout))?;

        if !response.status().is_success() {
            return Err(error_from_response(self.provider, response, &url).await);
        }

        let openai_response: OpenAiResponse = response.json().await
            .map_err(|e| transport_error(self.provider, e, self.timeout))?;

        let content = openai_response.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);

        non_empty_content(self.provider, content)
    }

    fn provider(&self) -> ProviderId {
        self.provider
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// OpenAI API structures
#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

//! Upstash Redis cache store
//!
//! Talks to Redis through the Upstash REST API: each command is POSTed as a JSON
//! array and answered with `{"result": ...}` or `{"error": "..."}`.

use crate::cache::CacheStore;
use crate::error::{BrandForgeError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Redis-backed cache reached over HTTPS
pub struct UpstashCache {
    client: Client,
    url: String,
    token: String,
}

#[derive(Deserialize)]
struct UpstashResponse {
    #[serde(default)]
    result: Value,
    error: Option<String>,
}

impl UpstashCache {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let token = token.into();
        if url.is_empty() || token.is_empty() {
            return Err(BrandForgeError::config(
                "Upstash cache needs both REDIS_URL and REDIS_TOKEN",
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| BrandForgeError::network(e.to_string(), None, None))?;

        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Run one Redis command and return its `result`
    async fn command(&self, args: Value) -> Result<Value> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&args)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BrandForgeError::cache("Upstash request timed out")
                } else {
                    BrandForgeError::cache(format!("Failed to reach Upstash: {}", e))
                }
            })?;

        let status = response.status();
        let body: UpstashResponse = response
            .json()
            .await
            .map_err(|e| {
                BrandForgeError::cache(format!("Malformed Upstash response ({}): {}", status, e))
            })?;

        if let Some(error) = body.error {
            return Err(BrandForgeError::cache(format!("Upstash error ({}): {}", status, error)));
        }
        if !status.is_success() {
            return Err(BrandForgeError::cache(format!("Upstash request failed ({})", status)));
        }

        Ok(body.result)
    }
}

#[async_trait]
impl CacheStore for UpstashCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.command(json!(["GET", key])).await? {
            Value::Null => Ok(None),
            Value::String(value) => Ok(Some(value)),
            other => Ok(Some(other.to_string())),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        // SETEX rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        self.command(json!(["SETEX", key, seconds, value])).await?;
        Ok(())
    }

    async fn delete_matching(&self, pattern: &str) -> Result<usize> {
        let keys = match self.command(json!(["KEYS", pattern])).await? {
            Value::Array(keys) => keys,
            Value::Null => Vec::new(),
            other => {
                return Err(BrandForgeError::cache(format!("Unexpected KEYS result: {}", other)));
            }
        };
        if keys.is_empty() {
            return Ok(0);
        }

        let mut args = vec![Value::from("DEL")];
        args.extend(keys);
        let removed = self.command(Value::Array(args)).await?;
        Ok(removed.as_u64().unwrap_or(0) as usize)
    }

    fn name(&self) -> &'static str {
        "upstash"
    }

    fn is_persistent(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::GenerationCache;
    use mockito::{Matcher, Server};
    use std::sync::Arc;

    #[test]
    fn test_requires_credentials() {
        assert!(UpstashCache::new("", "token").is_err());
        assert!(UpstashCache::new("https://example.upstash.io", "").is_err());
        assert!(UpstashCache::new("https://example.upstash.io", "token").is_ok());
    }

    #[test]
    fn test_is_persistent() {
        let store = Arc::new(UpstashCache::new("https://example.upstash.io", "token").unwrap());
        assert!(store.is_persistent());
        assert!(GenerationCache::new(store, Duration::from_secs(60)).is_persistent());
    }

    #[tokio::test]
    async fn test_get_hit_and_miss() {
        let mut server = Server::new_async().await;
        let hit = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::Json(json!(["GET", "ai:brands:1"])))
            .with_status(200)
            .with_body(r#"{"result":"[\"Brand1\"]"}"#)
            .create_async()
            .await;
        let miss = server
            .mock("POST", "/")
            .match_body(Matcher::Json(json!(["GET", "ai:brands:2"])))
            .with_status(200)
            .with_body(r#"{"result":null}"#)
            .create_async()
            .await;

        let cache = UpstashCache::new(server.url(), "secret").unwrap();
        assert_eq!(cache.get("ai:brands:1").await.unwrap(), Some(r#"["Brand1"]"#.to_string()));
        assert_eq!(cache.get("ai:brands:2").await.unwrap(), None);

        hit.assert_async().await;
        miss.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_ex_sends_ttl_seconds() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::Json(json!(["SETEX", "k", 3600, "v"])))
            .with_status(200)
            .with_body(r#"{"result":"OK"}"#)
            .create_async()
            .await;

        let cache = UpstashCache::new(server.url(), "secret").unwrap();
        cache.set_ex("k", "v", Duration::from_secs(3600)).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_matching_runs_keys_then_del() {
        let mut server = Server::new_async().await;
        let keys = server
            .mock("POST", "/")
            .match_body(Matcher::Json(json!(["KEYS", "ai:brands:*"])))
            .with_status(200)
            .with_body(r#"{"result":["ai:brands:1","ai:brands:2"]}"#)
            .create_async()
            .await;
        let del = server
            .mock("POST", "/")
            .match_body(Matcher::Json(json!(["DEL", "ai:brands:1", "ai:brands:2"])))
            .with_status(200)
            .with_body(r#"{"result":2}"#)
            .create_async()
            .await;

        let cache = UpstashCache::new(server.url(), "secret").unwrap();
        assert_eq!(cache.delete_matching("ai:brands:*").await.unwrap(), 2);
        keys.assert_async().await;
        del.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_payload_is_cache_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(401)
            .with_body(r#"{"error":"Unauthorized"}"#)
            .create_async()
            .await;

        let cache = UpstashCache::new(server.url(), "wrong").unwrap();
        let err = cache.get("k").await.unwrap_err();
        assert!(matches!(err, BrandForgeError::Cache { .. }));
        assert!(err.to_string().contains("Unauthorized"));
    }
}

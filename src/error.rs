//! Error handling for brand-forge

use crate::llm::providers::REQUEST_TIMEOUT;
use crate::types::{Operation, ProviderId};
use thiserror::Error;

/// Main error type for brand-forge
#[derive(Error, Debug, Clone)]
pub enum BrandForgeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Provider error ({provider}): {message}")]
    Provider {
        provider: ProviderId,
        message: String,
        status_code: Option<u16>,
    },

    #[error("Unsupported AI provider '{name}'. Supported providers: {supported}")]
    UnsupportedProvider { name: String, supported: String },

    /// The single failure surfaced once the requested and the default provider
    /// have both been tried. Carries no vendor detail.
    #[error("Failed to generate {operation}")]
    Generation { operation: Operation },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    #[error("Timeout error: {operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("CLI error: {message}")]
    Cli { message: String },
}

impl BrandForgeError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a provider error
    pub fn provider(
        provider: ProviderId,
        message: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
            status_code,
        }
    }

    /// Create an unsupported provider error
    pub fn unsupported_provider(name: impl Into<String>) -> Self {
        Self::UnsupportedProvider {
            name: name.into(),
            supported: ProviderId::ALL
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create the generic generation failure
    pub fn generation(operation: Operation) -> Self {
        Self::Generation { operation }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a rate limit error
    pub fn rate_limit(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_secs,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a cache error
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a CLI error
    pub fn cli(message: impl Into<String>) -> Self {
        Self::Cli {
            message: message.into(),
        }
    }

    /// Whether this error came from talking to a hosted provider.
    ///
    /// These are the failures the generator recovers from by falling back to
    /// the default provider.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            Self::Provider { .. }
                | Self::Network { .. }
                | Self::Authentication { .. }
                | Self::RateLimit { .. }
                | Self::Timeout { .. }
                | Self::Parse { .. }
        )
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => format!(
                "❌ Configuration problem: {}\n💡 Check your .env file or configuration",
                message
            ),
            Self::Provider { provider, message, .. } => format!(
                "❌ AI provider ({}) error: {}\n💡 Check your API key and rate limits",
                provider, message
            ),
            Self::UnsupportedProvider { name, supported } => {
                format!("❌ Unknown AI provider '{}'\n💡 Choose one of: {}", name, supported)
            }
            Self::Generation { operation } => format!(
                "❌ Could not generate {}\n💡 Every provider failed, try again shortly",
                operation
            ),
            Self::Network { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", status, message)
            }
            Self::Authentication { message } => {
                format!("❌ Authentication failed: {}\n💡 Verify your API keys are correct", message)
            }
            Self::RateLimit { message, retry_after } => {
                let retry = retry_after.map_or(String::new(), |s| format!(" Retry in {}s.", s));
                format!(
                    "⏱️  Rate limit exceeded: {}{}\n💡 Wait a little before generating again",
                    message, retry
                )
            }
            Self::Timeout { operation, timeout_secs } => format!(
                "⏱️  {} timed out after {}s\n💡 The provider may be overloaded, try another one",
                operation, timeout_secs
            ),
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}\n💡 This might be a temporary issue, try again", message)
            }
            Self::Validation { message } => {
                format!("❌ Validation error: {}\n💡 Check your input", message)
            }
            Self::Cache { message } => {
                format!("⚠️  Cache unavailable: {}\n💡 Check REDIS_URL and REDIS_TOKEN", message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!(
                    "❌ File error{}: {}\n💡 Check file permissions and paths",
                    path_info, message
                )
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
            Self::Cli { message } => {
                format!("❌ Command error: {}\n💡 Use --help for usage information", message)
            }
        }
    }
}

/// Convert transport failures from the HTTP client
impl From<reqwest::Error> for BrandForgeError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::timeout("HTTP request", REQUEST_TIMEOUT.as_secs())
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {}", err), status_code, url)
        } else if err.is_decode() {
            Self::parse(format!("Malformed response body: {}", err), None)
        } else if err.is_request() {
            Self::network(format!("Request failed: {}", err), status_code, url)
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BrandForgeError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::BrandForgeError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::BrandForgeError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::BrandForgeError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::BrandForgeError::validation(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::error::BrandForgeError::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::BrandForgeError::internal(format!($fmt, $($arg)*))
    };
}

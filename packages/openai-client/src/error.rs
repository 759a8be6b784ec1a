//! Error types for the OpenAI client.

use thiserror::Error;

/// Result type for OpenAI client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// OpenAI client errors.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The API signalled a rate limit (HTTP 429 or a rate-limit error
    /// body). Kept distinct so callers can apply their retry policy.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Any other non-2xx API response
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl OpenAIError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, OpenAIError::RateLimited(_))
    }
}

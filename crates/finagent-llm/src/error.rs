//! Error types for LLM operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors from a completion provider
///
/// The HTTP status classes a provider can answer with get their own
/// variants so callers can tell auth and throttling apart from transient
/// failures.
#[derive(Debug, Error)]
pub enum LLMError {
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The provider answered 200 but the body did not parse
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

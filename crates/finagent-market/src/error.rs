//! Error types for market data providers

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors from market data providers
///
/// Display strings double as failure payloads shown to the model, so they
/// are written to be readable as-is.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Yahoo Finance error: {0}")]
    Yahoo(String),

    #[error("Alpha Vantage error: {0}")]
    AlphaVantage(String),

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded { provider: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse provider response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ProviderError> for finagent_tools::ToolError {
    fn from(e: ProviderError) -> Self {
        finagent_tools::ToolError::Execution(e.to_string())
    }
}

//! Error types for the tool bridge

use thiserror::Error;

pub type Result<T> = std::result::Result<T, McpError>;

/// Errors in transport and protocol handling
#[derive(Debug, Error)]
pub enum McpError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("not connected")]
    NotConnected,

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

//! Error types for agent execution

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExecutorError>;

/// Errors during agent execution
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("LLM error: {0}")]
    Llm(#[from] finagent_llm::LLMError),

    #[error("Tool server error: {0}")]
    Mcp(#[from] finagent_mcp::McpError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

//! Error types for tool registration and dispatch

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors raised while registering or invoking tools.
///
/// Dispatch-time variants are converted into failure results at the
/// dispatcher boundary; they never escape as transport faults.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("duplicate tool name: {0}")]
    DuplicateName(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("duplicate parameter '{param}' on tool '{tool}'")]
    DuplicateParameter { tool: String, param: String },

    #[error("missing required parameter {0}")]
    MissingParameter(String),

    #[error("invalid type for {0}")]
    InvalidType(String),

    /// Failure reported by a tool handler itself.
    #[error("{0}")]
    Execution(String),
}

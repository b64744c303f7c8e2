//! Agent reasoning loop for finagent-rs
//!
//! The [`AgentExecutor`] drives an LLM function-calling loop against a tool
//! server: discover tools, let the model decide, execute requested calls,
//! feed results back, and repeat until the model answers or the turn bound
//! is hit.

pub mod error;
pub mod executor;

pub use error::{ExecutorError, Result};
pub use executor::{AgentExecutor, AgentExecutorBuilder, ExecutorConfig};

//! Shared utilities for finagent-rs
//!
//! Small helpers used across the workspace: tracing initialization and
//! markdown rendering for tool payloads.

pub mod logging;
pub mod markdown;

pub use logging::{init_stderr_tracing, init_tracing};

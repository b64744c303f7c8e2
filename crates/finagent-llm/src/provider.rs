//! LLM provider trait definition

use async_trait::async_trait;

use crate::{CompletionRequest, CompletionResponse, Result};

/// Trait for LLM providers
///
/// Implementations provide access to a chat-completion service capable of
/// tool use.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the LLM
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Provider name (e.g., "openai")
    fn name(&self) -> &'static str;
}

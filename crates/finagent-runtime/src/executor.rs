//! Agent executor for running the reasoning loop
//!
//! The loop:
//! 1. Discover tools from the server and translate them to model functions
//! 2. Call the LLM with the conversation so far
//! 3. On tool use, invoke the tools through the server and append results
//! 4. Repeat until the model ends its turn or the turn bound is hit

use std::sync::Arc;

use tracing::{debug, info, warn};

use finagent_llm::{
    CompletionRequest, ContentBlock, LLMProvider, Message, StopReason, ToolDefinition,
};
use finagent_mcp::McpClient;

use crate::error::{ExecutorError, Result};

const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful financial assistant with access to market data tools.";

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of reasoning turns (prevents infinite loops)
    pub max_turns: usize,

    /// Model to use
    pub model: String,

    /// System prompt
    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_turns: 10,
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            max_tokens: 4096,
            temperature: Some(0.7),
        }
    }
}

/// Runs the agent loop against an LLM provider and a tool server
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    client: Arc<dyn McpClient>,
    config: ExecutorConfig,
}

impl AgentExecutor {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        client: Arc<dyn McpClient>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            provider,
            client,
            config,
        }
    }

    pub fn builder() -> AgentExecutorBuilder {
        AgentExecutorBuilder::new()
    }

    /// Run the loop for a single user question and return the final answer
    pub async fn run(&self, user_message: impl Into<String>) -> Result<String> {
        let mut conversation = vec![Message::user(user_message)];

        // Discover the tool surface once per session
        let tools = self.discover_tools().await?;
        debug!(tool_count = tools.len(), "discovered tools");

        let mut turn = 0;
        loop {
            turn += 1;
            if turn > self.config.max_turns {
                warn!(max_turns = self.config.max_turns, "turn bound reached");
                return Ok("Max turns reached without completion".to_string());
            }

            info!(turn, model = %self.config.model, "agent turn started");

            let mut request_builder = CompletionRequest::builder(&self.config.model)
                .messages(conversation.clone())
                .system(
                    self.config
                        .system_prompt
                        .clone()
                        .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
                )
                .max_tokens(self.config.max_tokens);

            if let Some(temperature) = self.config.temperature {
                request_builder = request_builder.temperature(temperature);
            }
            if !tools.is_empty() {
                request_builder = request_builder.tools(tools.clone());
            }

            let response = self.provider.complete(request_builder.build()).await?;

            info!(
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "completion received"
            );

            conversation.push(response.message.clone());

            match response.stop_reason {
                StopReason::EndTurn => {
                    let text = response.message.text().unwrap_or("No response").to_string();
                    info!(turn, response_length = text.len(), "agent completed");
                    return Ok(text);
                }

                StopReason::ToolUse => {
                    let results = self.execute_tools(&response.message).await?;
                    if results.is_empty() {
                        warn!("no tool results despite tool_use stop reason");
                        return Ok("Tool execution failed".to_string());
                    }
                    conversation.extend(results);
                }

                StopReason::MaxTokens => {
                    warn!("completion truncated at max tokens");
                    return Ok("Response truncated due to token limit".to_string());
                }
            }
        }
    }

    /// Translate the server's advertised tools into model function
    /// definitions
    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>> {
        let specs = self.client.list_tools().await?;
        Ok(specs
            .into_iter()
            .map(|spec| {
                ToolDefinition::new(
                    spec.name,
                    spec.description
                        .unwrap_or_else(|| "No description provided".to_string()),
                    spec.input_schema,
                )
            })
            .collect())
    }

    /// Execute every tool call in an assistant message, strictly in order
    async fn execute_tools(&self, message: &Message) -> Result<Vec<Message>> {
        let mut results = Vec::new();

        for tool_use in message.tool_uses() {
            let ContentBlock::ToolUse { id, name, input } = tool_use else {
                continue;
            };

            info!(tool = %name, tool_id = %id, "executing tool");
            let start = std::time::Instant::now();

            let result = self.client.call_tool(name, input.clone()).await?;
            let text = result.joined_text();
            let duration_ms = start.elapsed().as_millis() as u64;

            if result.is_error() {
                warn!(tool = %name, duration_ms, error = %text, "tool reported failure");
                results.push(Message::tool_error(id.clone(), text));
            } else {
                debug!(tool = %name, duration_ms, result_length = text.len(), "tool succeeded");
                results.push(Message::tool_result(id.clone(), text));
            }
        }

        Ok(results)
    }
}

/// Builder for AgentExecutor
#[derive(Default)]
pub struct AgentExecutorBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    client: Option<Arc<dyn McpClient>>,
    config: ExecutorConfig,
}

impl AgentExecutorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn client(mut self, client: Arc<dyn McpClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_turns(mut self, max_turns: usize) -> Self {
        self.config.max_turns = max_turns;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    pub fn build(self) -> Result<AgentExecutor> {
        let provider = self
            .provider
            .ok_or_else(|| ExecutorError::Configuration("Provider not set".to_string()))?;
        let client = self
            .client
            .ok_or_else(|| ExecutorError::Configuration("Tool client not set".to_string()))?;

        Ok(AgentExecutor::new(provider, client, self.config))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::eq;
    use serde_json::{Value, json};

    use finagent_llm::{
        CompletionResponse, LLMError, MessageContent, Role, TokenUsage,
    };
    use finagent_mcp::{CallResult, McpError, ServerInfo, ToolSpec};

    use super::*;

    mock! {
        Provider {}

        #[async_trait]
        impl LLMProvider for Provider {
            async fn complete(
                &self,
                request: CompletionRequest,
            ) -> std::result::Result<CompletionResponse, LLMError>;
            fn name(&self) -> &'static str;
        }
    }

    mock! {
        Client {}

        #[async_trait]
        impl McpClient for Client {
            async fn connect(&self) -> std::result::Result<(), McpError>;
            fn is_connected(&self) -> bool;
            async fn disconnect(&self) -> std::result::Result<(), McpError>;
            async fn list_tools(&self) -> std::result::Result<Vec<ToolSpec>, McpError>;
            async fn call_tool(
                &self,
                name: &str,
                arguments: Value,
            ) -> std::result::Result<CallResult, McpError>;
            async fn server_info(&self) -> Option<ServerInfo>;
        }
    }

    fn text_response(text: &str, stop_reason: StopReason) -> CompletionResponse {
        CompletionResponse {
            message: Message::assistant(text),
            stop_reason,
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            },
        }
    }

    fn tool_use_response(id: &str, name: &str, input: Value) -> CompletionResponse {
        CompletionResponse {
            message: Message {
                role: Role::Assistant,
                content: Some(MessageContent::Blocks(vec![ContentBlock::ToolUse {
                    id: id.to_string(),
                    name: name.to_string(),
                    input,
                }])),
            },
            stop_reason: StopReason::ToolUse,
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            },
        }
    }

    fn price_tool_spec() -> ToolSpec {
        ToolSpec {
            name: "get_stock_price".to_string(),
            description: Some("Get the current stock price".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {"symbol": {"type": "string"}},
                "required": ["symbol"],
            }),
        }
    }

    fn executor(provider: MockProvider, client: MockClient) -> AgentExecutor {
        AgentExecutor::builder()
            .provider(Arc::new(provider))
            .client(Arc::new(client))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_single_turn_answer() {
        let mut client = MockClient::new();
        client.expect_list_tools().returning(|| Ok(vec![]));
        client.expect_call_tool().never();

        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .times(1)
            .returning(|_| Ok(text_response("Hello there", StopReason::EndTurn)));

        let answer = executor(provider, client).run("Hi").await.unwrap();
        assert_eq!(answer, "Hello there");
    }

    #[tokio::test]
    async fn test_tool_use_turn_then_answer() {
        let mut client = MockClient::new();
        client
            .expect_list_tools()
            .returning(|| Ok(vec![price_tool_spec()]));
        client
            .expect_call_tool()
            .with(eq("get_stock_price"), eq(json!({"symbol": "AAPL"})))
            .times(1)
            .returning(|_, _| Ok(CallResult::text("Current price of AAPL: 228.50 USD", false)));

        let mut provider = MockProvider::new();
        let mut seq = mockall::Sequence::new();
        provider
            .expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|request| {
                // Tools are bound into the model request
                assert_eq!(request.tools.as_ref().map(Vec::len), Some(1));
                Ok(tool_use_response(
                    "call_1",
                    "get_stock_price",
                    json!({"symbol": "AAPL"}),
                ))
            });
        provider
            .expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|request| {
                // The tool result made it back into the conversation
                let last = request.messages.last().unwrap();
                assert_eq!(last.role, Role::User);
                let Some(MessageContent::Blocks(blocks)) = &last.content else {
                    panic!("expected tool result blocks");
                };
                assert!(matches!(
                    &blocks[0],
                    ContentBlock::ToolResult { content, is_error: None, .. }
                        if content.contains("228.50")
                ));
                Ok(text_response(
                    "AAPL trades at 228.50 USD.",
                    StopReason::EndTurn,
                ))
            });

        let answer = executor(provider, client)
            .run("What is AAPL trading at?")
            .await
            .unwrap();
        assert_eq!(answer, "AAPL trades at 228.50 USD.");
    }

    #[tokio::test]
    async fn test_tool_failure_flows_back_as_error_result() {
        let mut client = MockClient::new();
        client
            .expect_list_tools()
            .returning(|| Ok(vec![price_tool_spec()]));
        client
            .expect_call_tool()
            .times(1)
            .returning(|_, _| Ok(CallResult::text("unknown tool: get_weather", true)));

        let mut provider = MockProvider::new();
        let mut seq = mockall::Sequence::new();
        provider
            .expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(tool_use_response("call_1", "get_weather", json!({}))));
        provider
            .expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|request| {
                let last = request.messages.last().unwrap();
                let Some(MessageContent::Blocks(blocks)) = &last.content else {
                    panic!("expected tool result blocks");
                };
                assert!(matches!(
                    &blocks[0],
                    ContentBlock::ToolResult { is_error: Some(true), .. }
                ));
                Ok(text_response(
                    "That tool is not available.",
                    StopReason::EndTurn,
                ))
            });

        let answer = executor(provider, client).run("Weather?").await.unwrap();
        assert_eq!(answer, "That tool is not available.");
    }

    #[tokio::test]
    async fn test_max_turns_bound() {
        let mut client = MockClient::new();
        client
            .expect_list_tools()
            .returning(|| Ok(vec![price_tool_spec()]));
        client
            .expect_call_tool()
            .times(2)
            .returning(|_, _| Ok(CallResult::text("Current price of AAPL: 228.50 USD", false)));

        let mut provider = MockProvider::new();
        provider.expect_complete().times(2).returning(|_| {
            Ok(tool_use_response(
                "call_1",
                "get_stock_price",
                json!({"symbol": "AAPL"}),
            ))
        });

        let executor = AgentExecutor::builder()
            .provider(Arc::new(provider))
            .client(Arc::new(client))
            .max_turns(2)
            .build()
            .unwrap();

        let answer = executor.run("Loop forever").await.unwrap();
        assert_eq!(answer, "Max turns reached without completion");
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mut client = MockClient::new();
        client
            .expect_list_tools()
            .returning(|| Err(McpError::NotConnected));

        let provider = MockProvider::new();
        let result = executor(provider, client).run("Hi").await;
        assert!(matches!(result, Err(ExecutorError::Mcp(_))));
    }

    #[test]
    fn test_builder_requires_provider_and_client() {
        let result = AgentExecutor::builder().build();
        assert!(matches!(result, Err(ExecutorError::Configuration(_))));
    }

    #[test]
    fn test_default_config() {
        let config = ExecutorConfig::default();
        assert_eq!(config.max_turns, 10);
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.max_tokens, 4096);
    }
}

//! The tool server loop
//!
//! Reads JSON-RPC messages off a [`Transport`], routes `tools/list` and
//! `tools/call` to the registry and dispatcher, and writes replies back.
//! One request is handled at a time; responses keep arrival order.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, info, warn};

use finagent_tools::{Dispatcher, InvocationRequest, InvocationResult, ToolRegistry};

use crate::error::{McpError, Result};
use crate::protocol::{
    self, CallResult, Request, ToolSpec, error_response, result_response,
};
use crate::transport::Transport;

/// Serves a tool registry over a JSON-RPC transport
pub struct ToolServer {
    registry: Arc<ToolRegistry>,
    dispatcher: Dispatcher,
    name: String,
    version: String,
}

impl ToolServer {
    pub fn new(registry: Arc<ToolRegistry>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            dispatcher: Dispatcher::new(Arc::clone(&registry)),
            registry,
            name: name.into(),
            version: version.into(),
        }
    }

    /// Run the serve loop until the peer closes the stream.
    ///
    /// Malformed JSON gets a parse-error reply and the loop continues;
    /// transport I/O failures end the loop.
    pub async fn serve<T: Transport>(&self, transport: &mut T) -> Result<()> {
        info!(server = %self.name, tools = self.registry.len(), "tool server started");

        loop {
            let message = match transport.recv().await {
                Ok(Some(message)) => message,
                Ok(None) => {
                    info!("peer closed the stream, shutting down");
                    return Ok(());
                }
                Err(McpError::Json(e)) => {
                    warn!(error = %e, "received malformed JSON");
                    let reply =
                        error_response(Value::Null, protocol::PARSE_ERROR, format!("Parse error: {e}"));
                    transport.send(&reply).await?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some(reply) = self.handle_message(message).await {
                transport.send(&reply).await?;
            }
        }
    }

    /// Handle one message. Returns `None` for notifications.
    pub async fn handle_message(&self, message: Value) -> Option<Value> {
        let request: Request = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                return Some(error_response(
                    Value::Null,
                    protocol::INVALID_REQUEST,
                    format!("Invalid request: {e}"),
                ));
            }
        };

        let Some(id) = request.id else {
            // Notification: nothing goes back on the wire
            debug!(method = %request.method, "received notification");
            return None;
        };

        debug!(method = %request.method, "handling request");

        let reply = match request.method.as_str() {
            "initialize" => result_response(
                id,
                json!({
                    "protocolVersion": protocol::PROTOCOL_VERSION,
                    "capabilities": {
                        "tools": {}
                    },
                    "serverInfo": {
                        "name": self.name,
                        "version": self.version,
                    },
                }),
            ),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            method => error_response(
                id,
                protocol::METHOD_NOT_FOUND,
                format!("Method not found: {method}"),
            ),
        };

        Some(reply)
    }

    fn handle_list_tools(&self, id: Value) -> Value {
        let tools: Vec<ToolSpec> = self
            .registry
            .list()
            .iter()
            .map(|tool| ToolSpec {
                name: tool.descriptor.name.clone(),
                description: Some(tool.descriptor.description.clone()),
                input_schema: tool.descriptor.input_schema(),
            })
            .collect();

        match serde_json::to_value(tools) {
            Ok(tools) => result_response(id, json!({ "tools": tools })),
            Err(e) => error_response(
                id,
                protocol::INVALID_REQUEST,
                format!("Failed to serialize tools: {e}"),
            ),
        }
    }

    async fn handle_call_tool(&self, id: Value, params: Value) -> Value {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return error_response(
                id,
                protocol::INVALID_PARAMS,
                "Invalid params: missing tool name",
            );
        };

        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => serde_json::Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => {
                return error_response(
                    id,
                    protocol::INVALID_PARAMS,
                    "Invalid params: arguments must be an object",
                );
            }
        };

        let request = InvocationRequest::new(name, arguments);
        let result = self.dispatcher.dispatch(&request).await;

        // Tool failures are results, not protocol errors
        let call_result = match result {
            InvocationResult::Success { payload } => CallResult::text(payload, false),
            InvocationResult::Failure { message } => CallResult::text(message, true),
        };

        match serde_json::to_value(call_result) {
            Ok(value) => result_response(id, value),
            Err(e) => error_response(
                id,
                protocol::INVALID_REQUEST,
                format!("Failed to serialize result: {e}"),
            ),
        }
    }
}

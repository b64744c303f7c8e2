//! Invocation dispatch
//!
//! The dispatcher is the choke point between untrusted invocation requests
//! and tool handlers. It resolves the tool, validates and coerces arguments
//! against the descriptor, invokes the handler, and wraps every outcome in an
//! [`InvocationResult`]. Nothing a caller sends can make dispatch panic or
//! surface a transport fault.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::args::Arguments;
use crate::descriptor::{ParamSpec, ParamType, ParamValue};
use crate::error::{Result, ToolError};
use crate::registry::ToolRegistry;

/// A request to invoke one tool by name.
#[derive(Debug, Clone, Deserialize)]
pub struct InvocationRequest {
    pub tool_name: String,
    #[serde(default)]
    pub arguments: serde_json::Map<String, Value>,
}

impl InvocationRequest {
    pub fn new(tool_name: impl Into<String>, arguments: serde_json::Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

/// Outcome of a tool invocation.
///
/// Serializes as `{"status": "ok", "payload": ...}` or
/// `{"status": "error", "payload": ...}`. Failures travel as ordinary data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum InvocationResult {
    #[serde(rename = "ok")]
    Success { payload: String },
    #[serde(rename = "error")]
    Failure {
        #[serde(rename = "payload")]
        message: String,
    },
}

impl InvocationResult {
    pub fn success(payload: impl Into<String>) -> Self {
        Self::Success { payload: payload.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure { message: message.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The payload text, success or failure.
    pub fn payload(&self) -> &str {
        match self {
            Self::Success { payload } => payload,
            Self::Failure { message } => message,
        }
    }
}

/// Routes invocation requests to registered tool handlers.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Dispatch one invocation.
    ///
    /// Unknown tools, validation failures, and handler errors all come back
    /// as `Failure` results.
    pub async fn dispatch(&self, request: &InvocationRequest) -> InvocationResult {
        debug!(tool = %request.tool_name, "dispatching invocation");

        let tool = match self.registry.resolve(&request.tool_name) {
            Ok(tool) => tool,
            Err(e) => {
                warn!(tool = %request.tool_name, "invocation of unknown tool");
                return InvocationResult::failure(e.to_string());
            }
        };

        let args = match coerce_arguments(&tool.descriptor.params, &request.arguments) {
            Ok(args) => args,
            Err(e) => return InvocationResult::failure(e.to_string()),
        };

        match tool.handler.call(args).await {
            Ok(payload) => InvocationResult::success(payload),
            Err(e) => {
                warn!(tool = %request.tool_name, error = %e, "tool execution failed");
                InvocationResult::failure(e.to_string())
            }
        }
    }
}

/// Validate raw JSON arguments against the parameter specs and produce typed
/// values. Unknown keys are ignored, absent optionals take their defaults,
/// and JSON null counts as absent.
fn coerce_arguments(
    params: &[ParamSpec],
    raw: &serde_json::Map<String, Value>,
) -> Result<Arguments> {
    let mut values = BTreeMap::new();

    for spec in params {
        let supplied = raw.get(&spec.name).filter(|v| !v.is_null());
        match supplied {
            Some(value) => {
                values.insert(spec.name.clone(), coerce_value(spec, value)?);
            }
            None if spec.required => {
                return Err(ToolError::MissingParameter(spec.name.clone()));
            }
            None => {
                if let Some(default) = &spec.default {
                    values.insert(spec.name.clone(), default.clone());
                }
            }
        }
    }

    Ok(Arguments::new(values))
}

fn coerce_value(spec: &ParamSpec, value: &Value) -> Result<ParamValue> {
    let coerced = match spec.param_type {
        ParamType::Str => value.as_str().map(|s| ParamValue::Str(s.to_string())),
        ParamType::Int => match value {
            Value::Number(n) => n
                .as_i64()
                // Some JSON emitters render integers as 5.0.
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .map(ParamValue::Int),
            _ => None,
        },
        ParamType::Float => value.as_f64().map(ParamValue::Float),
        ParamType::Bool => value.as_bool().map(ParamValue::Bool),
    };

    coerced.ok_or_else(|| ToolError::InvalidType(spec.name.clone()))
}

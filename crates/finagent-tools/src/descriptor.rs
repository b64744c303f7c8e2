//! Tool descriptors and typed parameter specifications

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Result, ToolError};

/// The type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Str,
    Int,
    Float,
    Bool,
}

impl ParamType {
    /// JSON Schema type name for this parameter type.
    pub fn json_type(self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Int => "integer",
            Self::Float => "number",
            Self::Bool => "boolean",
        }
    }
}

/// A concrete parameter value after validation and coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    pub fn param_type(&self) -> ParamType {
        match self {
            Self::Str(_) => ParamType::Str,
            Self::Int(_) => ParamType::Int,
            Self::Float(_) => ParamType::Float,
            Self::Bool(_) => ParamType::Bool,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Str(s) => json!(s),
            Self::Int(i) => json!(i),
            Self::Float(f) => json!(f),
            Self::Bool(b) => json!(b),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric accessor. Integers widen to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Specification of a single tool parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    pub required: bool,
    pub default: Option<ParamValue>,
}

impl ParamSpec {
    /// A required parameter with no default.
    pub fn required(name: impl Into<String>, param_type: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: true,
            default: None,
        }
    }

    /// An optional parameter with a default value applied when the caller
    /// omits it.
    pub fn optional(
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
        default: ParamValue,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: false,
            default: Some(default),
        }
    }
}

/// Describes a tool: its name, human-readable description, and parameters.
///
/// The descriptor is the single source of truth for both validation and the
/// JSON Schema advertised over the wire.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub params: Vec<ParamSpec>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Check internal consistency. Parameter names must be unique.
    pub fn validate(&self) -> Result<()> {
        for (i, param) in self.params.iter().enumerate() {
            if self.params[..i].iter().any(|p| p.name == param.name) {
                return Err(ToolError::DuplicateParameter {
                    tool: self.name.clone(),
                    param: param.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Render the parameter list as a JSON Schema object suitable for
    /// `tools/list`.
    pub fn input_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &self.params {
            let mut prop = serde_json::Map::new();
            prop.insert("type".to_string(), json!(param.param_type.json_type()));
            prop.insert("description".to_string(), json!(param.description));
            if let Some(default) = &param.default {
                prop.insert("default".to_string(), default.to_json());
            }
            properties.insert(param.name.clone(), Value::Object(prop));

            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_type_json_names() {
        assert_eq!(ParamType::Str.json_type(), "string");
        assert_eq!(ParamType::Int.json_type(), "integer");
        assert_eq!(ParamType::Float.json_type(), "number");
        assert_eq!(ParamType::Bool.json_type(), "boolean");
    }

    #[test]
    fn test_float_accessor_widens_int() {
        assert_eq!(ParamValue::Int(3).as_float(), Some(3.0));
        assert_eq!(ParamValue::Float(2.5).as_float(), Some(2.5));
        assert_eq!(ParamValue::Str("x".to_string()).as_float(), None);
    }

    #[test]
    fn test_validate_rejects_duplicate_params() {
        let descriptor = ToolDescriptor::new("get_stock_price", "Get a stock price")
            .with_param(ParamSpec::required("symbol", ParamType::Str, "Ticker"))
            .with_param(ParamSpec::required("symbol", ParamType::Str, "Ticker again"));

        let err = descriptor.validate().unwrap_err();
        assert!(matches!(err, ToolError::DuplicateParameter { .. }));
        assert!(err.to_string().contains("symbol"));
    }

    #[test]
    fn test_input_schema_shape() {
        let descriptor = ToolDescriptor::new("get_stock_history", "Fetch price history")
            .with_param(ParamSpec::required("symbol", ParamType::Str, "Ticker symbol"))
            .with_param(ParamSpec::optional(
                "max_rows",
                ParamType::Int,
                "Maximum rows to return",
                ParamValue::Int(10),
            ));

        let schema = descriptor.input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["symbol"]["type"], "string");
        assert_eq!(schema["properties"]["max_rows"]["type"], "integer");
        assert_eq!(schema["properties"]["max_rows"]["default"], 10);
        assert_eq!(schema["required"], serde_json::json!(["symbol"]));
    }
}

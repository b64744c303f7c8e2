//! Validated arguments passed to tool handlers

use std::collections::BTreeMap;

use crate::descriptor::ParamValue;
use crate::error::{Result, ToolError};

/// Coerced, validated arguments for a single invocation.
///
/// By the time a handler sees an `Arguments`, every required parameter is
/// present and every value matches its declared type, so the typed accessors
/// only fail if a handler asks for a parameter its own descriptor never
/// declared.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: BTreeMap<String, ParamValue>,
}

impl Arguments {
    pub fn new(values: BTreeMap<String, ParamValue>) -> Self {
        Self { values }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn str(&self, name: &str) -> Result<&str> {
        self.get(name)
            .and_then(ParamValue::as_str)
            .ok_or_else(|| ToolError::MissingParameter(name.to_string()))
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        self.get(name)
            .and_then(ParamValue::as_int)
            .ok_or_else(|| ToolError::MissingParameter(name.to_string()))
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        self.get(name)
            .and_then(ParamValue::as_float)
            .ok_or_else(|| ToolError::MissingParameter(name.to_string()))
    }

    pub fn bool(&self, name: &str) -> Result<bool> {
        self.get(name)
            .and_then(ParamValue::as_bool)
            .ok_or_else(|| ToolError::MissingParameter(name.to_string()))
    }

    pub fn opt_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    pub fn opt_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParamValue::as_int)
    }
}

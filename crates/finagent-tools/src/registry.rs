//! Tool registry

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::descriptor::ToolDescriptor;
use crate::error::{Result, ToolError};
use crate::tool::ToolHandler;

/// A tool admitted to the registry, paired with its descriptor.
#[derive(Clone)]
pub struct RegisteredTool {
    pub descriptor: ToolDescriptor,
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Holds the set of registered tools.
///
/// Registration happens once at startup through `&mut self`; afterwards the
/// registry is shared behind an `Arc` and never mutated, so lookups need no
/// locking. Listing preserves registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool handler.
    ///
    /// Fails if the descriptor is malformed or another tool already claimed
    /// the name. A failed registration leaves the registry unchanged.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> Result<()> {
        let descriptor = handler.descriptor();
        descriptor.validate()?;

        if self.index.contains_key(&descriptor.name) {
            return Err(ToolError::DuplicateName(descriptor.name));
        }

        debug!(tool = %descriptor.name, "registered tool");
        self.index.insert(descriptor.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool { descriptor, handler });
        Ok(())
    }

    /// All registered tools, in registration order.
    pub fn list(&self) -> &[RegisteredTool] {
        &self.tools
    }

    /// Look up a tool by name.
    pub fn resolve(&self, name: &str) -> Result<&RegisteredTool> {
        self.index
            .get(name)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

//! The tool handler trait

use async_trait::async_trait;

use crate::args::Arguments;
use crate::descriptor::ToolDescriptor;
use crate::error::Result;

/// A callable tool.
///
/// Implementations return their descriptor for registration and schema
/// publication, and execute invocations against pre-validated arguments.
/// Handler errors are reported as failure results to the caller; they do not
/// tear down the bridge.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The tool's name, description, and parameter specification.
    fn descriptor(&self) -> ToolDescriptor;

    /// Execute the tool. The payload is pre-formatted text.
    async fn call(&self, args: Arguments) -> Result<String>;
}

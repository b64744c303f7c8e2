//! Tool descriptors, registry, and dispatcher
//!
//! The building blocks of the tool-invocation bridge: a [`ToolDescriptor`]
//! declares a tool's name and typed parameters, a [`ToolRegistry`] holds the
//! registered handlers, and a [`Dispatcher`] validates incoming requests and
//! routes them to handlers, wrapping every outcome in an [`InvocationResult`].
//!
//! Tool failures are data, not faults: the dispatcher never panics or returns
//! a transport-level error on a bad invocation. Callers always receive an
//! `InvocationResult`, success or failure.

pub mod args;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod tool;

pub use args::Arguments;
pub use descriptor::{ParamSpec, ParamType, ParamValue, ToolDescriptor};
pub use dispatch::{Dispatcher, InvocationRequest, InvocationResult};
pub use error::{Result, ToolError};
pub use registry::{RegisteredTool, ToolRegistry};
pub use tool::ToolHandler;

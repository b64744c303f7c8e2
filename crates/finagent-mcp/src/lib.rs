//! JSON-RPC tool bridge over stdio
//!
//! Exposes a [`finagent_tools::ToolRegistry`] to agent frontends over
//! newline-delimited JSON-RPC 2.0 on standard streams, following the MCP
//! conventions for `initialize`, `tools/list`, and `tools/call`.
//!
//! The server side lives in [`server`], the client side (spawning a server
//! as a child process) in [`client`]. Tool failures always travel as
//! `isError` results, never as JSON-RPC protocol errors.

pub mod client;
pub mod error;
pub mod protocol;
pub mod server;
pub mod transport;

pub use client::{McpClient, StdioClient};
pub use error::{McpError, Result};
pub use protocol::{CallResult, ContentItem, ServerInfo, ToolSpec, PROTOCOL_VERSION};
pub use server::ToolServer;
pub use transport::{stdio, LineTransport, Transport};

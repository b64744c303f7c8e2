//! Client side of the tool bridge
//!
//! Spawns a tool server as a child process and speaks JSON-RPC 2.0 to it
//! over the child's standard streams.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{McpError, Result};
use crate::protocol::{CallResult, PROTOCOL_VERSION, ServerInfo, ToolSpec};

/// Client trait for the tool bridge
///
/// All methods take `&self` so clients can be shared through `Arc`;
/// implementations use interior mutability for connection state.
#[async_trait]
pub trait McpClient: Send + Sync {
    /// Connect and run the initialization handshake
    async fn connect(&self) -> Result<()>;

    /// Check if the client is connected
    fn is_connected(&self) -> bool;

    /// Disconnect from the server
    async fn disconnect(&self) -> Result<()>;

    /// List the tools the server advertises
    async fn list_tools(&self) -> Result<Vec<ToolSpec>>;

    /// Invoke a tool by name
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<CallResult>;

    /// Server identity from the initialize handshake
    async fn server_info(&self) -> Option<ServerInfo>;
}

/// Tool bridge client over a spawned child process
pub struct StdioClient {
    command: String,
    args: Vec<String>,
    env: HashMap<String, String>,

    child: Arc<Mutex<Option<Child>>>,
    stdin: Arc<Mutex<Option<ChildStdin>>>,
    stdout: Arc<Mutex<Option<BufReader<ChildStdout>>>>,
    server_info: Arc<Mutex<Option<ServerInfo>>>,
    connected: Arc<Mutex<bool>>,
    request_id: Arc<Mutex<u64>>,
}

impl StdioClient {
    /// Create a client that will spawn `command args...` on connect
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            env: HashMap::new(),
            child: Arc::new(Mutex::new(None)),
            stdin: Arc::new(Mutex::new(None)),
            stdout: Arc::new(Mutex::new(None)),
            server_info: Arc::new(Mutex::new(None)),
            connected: Arc::new(Mutex::new(false)),
            request_id: Arc::new(Mutex::new(0)),
        }
    }

    /// Add an environment variable for the spawned server
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    async fn next_request_id(&self) -> u64 {
        let mut id = self.request_id.lock().await;
        *id += 1;
        *id
    }

    /// Send a JSON-RPC request and wait for its response
    async fn send_request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_request_id().await;

        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        });

        debug!("Sending request: {}", method);

        let mut stdin = self.stdin.lock().await;
        let stdin = stdin.as_mut().ok_or(McpError::NotConnected)?;

        let request_str = serde_json::to_string(&request)?;
        stdin
            .write_all(request_str.as_bytes())
            .await
            .map_err(|e| McpError::ConnectionFailed(e.to_string()))?;
        stdin
            .write_all(b"\n")
            .await
            .map_err(|e| McpError::ConnectionFailed(e.to_string()))?;
        stdin
            .flush()
            .await
            .map_err(|e| McpError::ConnectionFailed(e.to_string()))?;

        let mut stdout = self.stdout.lock().await;
        let stdout = stdout.as_mut().ok_or(McpError::NotConnected)?;

        let mut line = String::new();
        stdout
            .read_line(&mut line)
            .await
            .map_err(|e| McpError::ConnectionFailed(e.to_string()))?;

        if line.is_empty() {
            return Err(McpError::ConnectionFailed(
                "Server closed connection".to_string(),
            ));
        }

        let response: Value = serde_json::from_str(&line)?;

        debug!("Received response for: {}", method);

        if let Some(error) = response.get("error") {
            return Err(McpError::RequestFailed(format!("{method}: {error}")));
        }

        response
            .get("result")
            .cloned()
            .ok_or_else(|| McpError::RequestFailed("No result in response".to_string()))
    }

    /// Run the initialize handshake and send the initialized notification
    async fn initialize(&self) -> Result<ServerInfo> {
        let params = serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "clientInfo": {
                "name": "finagent-rs",
                "version": env!("CARGO_PKG_VERSION")
            }
        });

        let result = self.send_request("initialize", params).await?;

        let server_info = ServerInfo {
            name: result["serverInfo"]["name"]
                .as_str()
                .unwrap_or("unknown")
                .to_string(),
            version: result["serverInfo"]["version"]
                .as_str()
                .unwrap_or("unknown")
                .to_string(),
            protocol_version: result["protocolVersion"]
                .as_str()
                .unwrap_or(PROTOCOL_VERSION)
                .to_string(),
        };

        info!(
            "Connected to tool server: {} v{}",
            server_info.name, server_info.version
        );

        let notification = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        });

        let mut stdin = self.stdin.lock().await;
        if let Some(stdin) = stdin.as_mut() {
            let notification_str = serde_json::to_string(&notification)?;
            let _ = stdin.write_all(notification_str.as_bytes()).await;
            let _ = stdin.write_all(b"\n").await;
            let _ = stdin.flush().await;
        }

        Ok(server_info)
    }
}

#[async_trait]
impl McpClient for StdioClient {
    async fn connect(&self) -> Result<()> {
        debug!("Starting tool server: {} {:?}", self.command, self.args);

        let mut command = Command::new(&self.command);
        command.args(&self.args);
        command.stdin(Stdio::piped());
        command.stdout(Stdio::piped());
        // Server diagnostics pass through to our stderr
        command.stderr(Stdio::inherit());

        for (key, value) in &self.env {
            command.env(key, value);
        }

        let mut child = command
            .spawn()
            .map_err(|e| McpError::ConnectionFailed(format!("Failed to spawn process: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| McpError::ConnectionFailed("Failed to get stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| McpError::ConnectionFailed("Failed to get stdout".to_string()))?;

        *self.stdin.lock().await = Some(stdin);
        *self.stdout.lock().await = Some(BufReader::new(stdout));
        *self.child.lock().await = Some(child);

        let server_info = self.initialize().await?;
        *self.server_info.lock().await = Some(server_info);
        *self.connected.lock().await = true;

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
            .try_lock()
            .map(|guard| *guard)
            .unwrap_or(false)
    }

    async fn disconnect(&self) -> Result<()> {
        debug!("Disconnecting from tool server");

        *self.connected.lock().await = false;
        *self.stdin.lock().await = None;
        *self.stdout.lock().await = None;

        let mut child = self.child.lock().await;
        if let Some(child) = child.as_mut() {
            let _ = child.kill().await;
        }
        *child = None;

        Ok(())
    }

    async fn list_tools(&self) -> Result<Vec<ToolSpec>> {
        if !self.is_connected() {
            return Err(McpError::NotConnected);
        }

        let result = self.send_request("tools/list", serde_json::json!({})).await?;

        let tools: Vec<ToolSpec> = serde_json::from_value(result["tools"].clone())
            .map_err(|e| McpError::RequestFailed(format!("Failed to parse tools: {e}")))?;

        Ok(tools)
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<CallResult> {
        if !self.is_connected() {
            return Err(McpError::NotConnected);
        }

        let params = serde_json::json!({
            "name": name,
            "arguments": arguments
        });

        let result = self.send_request("tools/call", params).await?;

        let call_result: CallResult = serde_json::from_value(result)
            .map_err(|e| McpError::RequestFailed(format!("Failed to parse result: {e}")))?;

        Ok(call_result)
    }

    async fn server_info(&self) -> Option<ServerInfo> {
        self.server_info.lock().await.clone()
    }
}

impl Drop for StdioClient {
    fn drop(&mut self) {
        // Best effort cleanup of the child process
        if let Ok(mut child) = self.child.try_lock() {
            if let Some(child) = child.as_mut() {
                let _ = child.start_kill();
            }
        }
    }
}

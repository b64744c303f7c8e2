//! Newline-delimited JSON transport

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tracing::trace;

use crate::error::Result;

/// A bidirectional channel carrying one JSON value per line
#[async_trait]
pub trait Transport: Send {
    /// Write one message followed by a newline and flush
    async fn send(&mut self, message: &Value) -> Result<()>;

    /// Read the next message. `Ok(None)` means the peer closed the stream.
    async fn recv(&mut self) -> Result<Option<Value>>;
}

/// Line-oriented transport over any async reader/writer pair
pub struct LineTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
    line: String,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
            line: String::new(),
        }
    }
}

#[async_trait]
impl<R, W> Transport for LineTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, message: &Value) -> Result<()> {
        let encoded = serde_json::to_string(message)?;
        trace!(bytes = encoded.len(), "sending message");
        self.writer.write_all(encoded.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<Value>> {
        loop {
            self.line.clear();
            let n = self.reader.read_line(&mut self.line).await?;
            if n == 0 {
                return Ok(None);
            }
            // Skip blank lines between messages
            if self.line.trim().is_empty() {
                continue;
            }
            let value = serde_json::from_str(self.line.trim())?;
            return Ok(Some(value));
        }
    }
}

/// Transport over this process's standard streams
pub fn stdio() -> LineTransport<Stdin, Stdout> {
    LineTransport::new(tokio::io::stdin(), tokio::io::stdout())
}

//! Stdio transport: reads JSON-RPC from stdin, writes to stdout.
//!
//! Each request runs on its own task so a slow tool never blocks `ping`
//! or other calls. Responses funnel through a single writer task, so lines
//! on stdout never interleave.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::protocol::ProtocolHandler;
use crate::types::{McpError, McpResult, RequestId};

use super::framing;

/// Stdio transport for desktop MCP clients.
pub struct StdioTransport {
    handler: Arc<ProtocolHandler>,
}

impl StdioTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Run the transport loop: reads from stdin, writes to stdout.
    pub async fn run(&self) -> McpResult<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve newline-delimited JSON-RPC from `reader` until EOF.
    ///
    /// A line that is not UTF-8 or not JSON gets a parse error with a null
    /// id and the loop keeps going. A read failure stops intake, but
    /// responses already in flight are still written before returning.
    pub async fn serve<R, W>(&self, mut reader: R, output: W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut line = Vec::new();

        let (tx, rx) = mpsc::channel::<Value>(64);
        let writer = tokio::spawn(write_responses(rx, output));

        tracing::info!("Stdio transport started");

        loop {
            line.clear();
            let bytes_read = match reader.read_until(b'\n', &mut line).await {
                Ok(n) => n,
                Err(e) => {
                    tracing::error!("Read failed, draining outstanding responses: {e}");
                    break;
                }
            };

            if bytes_read == 0 {
                tracing::info!("EOF on stdin, shutting down");
                break;
            }

            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            match framing::decode_line(&line) {
                Ok(msg) => {
                    let handler = self.handler.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        if let Some(response) = handler.handle_message(msg).await {
                            if tx.send(response).await.is_err() {
                                tracing::warn!("Response dropped: writer closed");
                            }
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!("Parse error: {e}");
                    let value = serde_json::to_value(e.to_json_rpc_error(RequestId::Null))?;
                    if tx.send(value).await.is_err() {
                        break;
                    }
                }
            }
        }

        // Outstanding tasks hold their own senders; the writer drains until they finish.
        drop(tx);
        writer
            .await
            .map_err(|e| McpError::Transport(e.to_string()))??;

        Ok(())
    }
}

async fn write_responses<W>(mut rx: mpsc::Receiver<Value>, mut output: W) -> McpResult<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let framed = framing::frame_message(&response)?;
        output
            .write_all(framed.as_bytes())
            .await
            .map_err(McpError::Io)?;
        output.flush().await.map_err(McpError::Io)?;
    }
    Ok(())
}

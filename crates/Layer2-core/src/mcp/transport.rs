//! MCP Transport - newline-delimited JSON-RPC over stdio
//!
//! One reader loop, one writer task. Long-running requests are spawned on
//! their own task so a slow upstream fetch never blocks the next line;
//! every response goes back through the single writer.

use super::server::McpServer;
use super::types::JsonRpcResponse;
use baseball_foundation::{Error, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Serve on the process's stdin/stdout until stdin closes
pub async fn serve_stdio(server: McpServer) -> Result<()> {
    info!("MCP server listening on stdio");
    serve(
        server,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

/// Serve JSON-RPC lines from `reader`, writing responses to `writer`.
///
/// Returns once `reader` is exhausted and every in-flight request has
/// been answered.
pub async fn serve<R, W>(server: McpServer, reader: R, writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<JsonRpcResponse>(32);

    // writer task
    let mut writer = writer;
    let writer_task = tokio::spawn(async move {
        while let Some(response) = rx.recv().await {
            let line = match serde_json::to_string(&response) {
                Ok(line) => line,
                Err(e) => {
                    error!("Failed to serialize response: {}", e);
                    continue;
                }
            };
            debug!("-> {}", line);
            if let Err(e) = writer.write_all(format!("{}\n", line).as_bytes()).await {
                error!("Failed to write response: {}", e);
                break;
            }
            if let Err(e) = writer.flush().await {
                error!("Failed to flush response: {}", e);
                break;
            }
        }
    });

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request = match super::server::parse_request(line) {
            Ok(request) => request,
            Err(response) => {
                send(&tx, response).await;
                continue;
            }
        };

        if McpServer::is_long_running(&request.method) {
            let server = server.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_request(request).await {
                    send(&tx, response).await;
                }
            });
        } else if let Some(response) = server.handle_request(request).await {
            send(&tx, response).await;
        }
    }

    info!("stdin closed, draining in-flight requests");
    drop(tx);
    writer_task
        .await
        .map_err(|e| Error::Internal(format!("Writer task failed: {}", e)))
}

async fn send(tx: &mpsc::Sender<JsonRpcResponse>, response: JsonRpcResponse) {
    if tx.send(response).await.is_err() {
        error!("Response writer is gone");
    }
}

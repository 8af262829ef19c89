//! HTTP transport
//!
//! `POST /mcp` takes one JSON-RPC message per request; notifications are
//! acknowledged with `202 Accepted`. `GET /health` reports liveness and the
//! cache backend.

use super::server::{McpServer, SERVER_NAME, SERVER_VERSION};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use baseball_foundation::{Error, Result, ToolContext};
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server: &'static str,
    version: &'static str,
    cache_type: &'static str,
    degraded: bool,
}

/// Create the HTTP router
pub fn create_router(server: McpServer) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp))
        .route("/health", get(health))
        .with_state(server)
}

/// Bind `host:port` and serve until the process exits
pub async fn serve_http(server: McpServer, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind {}: {}", addr, e)))?;
    info!("MCP server listening on http://{}/mcp", addr);

    axum::serve(listener, create_router(server)).await?;
    Ok(())
}

async fn handle_mcp(State(server): State<McpServer>, body: String) -> Response {
    match server.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn health(State(server): State<McpServer>) -> Json<HealthResponse> {
    let store = server.context().store();
    Json(HealthResponse {
        status: "ok",
        server: SERVER_NAME,
        version: SERVER_VERSION,
        cache_type: store.backend_kind().as_str(),
        degraded: store.is_degraded(),
    })
}

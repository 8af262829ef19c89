//! MCP Server - Model Context Protocol over JSON-RPC 2.0
//!
//! ## Methods
//! - `initialize`, `notifications/initialized`, `ping`
//! - `tools/list`, `tools/call`
//! - `resources/list`, `resources/read`
//!
//! ## Transports
//! - stdio (newline-delimited JSON-RPC)
//! - HTTP (`POST /mcp`, `GET /health`)
//!
//! ## Reference
//! - https://modelcontextprotocol.io/

mod http;
mod server;
mod transport;
mod types;

pub use http::{create_router, serve_http};
pub use server::{parse_request, McpServer, SERVER_NAME, SERVER_VERSION};
pub use transport::{serve, serve_stdio};
pub use types::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpContent, McpResource, McpResourceContents,
    McpResourceRead, McpTool, McpToolCall, McpToolResult, JSONRPC_VERSION, PROTOCOL_VERSION,
};

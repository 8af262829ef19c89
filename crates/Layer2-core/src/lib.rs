//! baseball-core: Core Runtime for baseball-mcp
//!
//! Layer2 - loaders, tools and the MCP server
//!
//! # Modules
//!
//! - `loader`: read-through loaders (cache first, upstream on miss)
//! - `tool`: the ten MCP tools and their registry
//! - `resource`: `team-season://`, `stat-definitions://`, `cache://`
//! - `mcp`: JSON-RPC dispatch with stdio and HTTP transports
//! - `context`: `ServiceContext`, the composition root
//!
//! # Example
//!
//! ```ignore
//! use baseball_core::{serve_stdio, McpServer, ServiceContext};
//!
//! let ctx = ServiceContext::default_context()?;
//! let result = ctx.execute_tool("get_standings", json!({"year": 2024})).await;
//! println!("{}", result.text());
//!
//! serve_stdio(McpServer::new(ctx)).await?;
//! ```

pub mod context;
pub mod loader;
pub mod mcp;
pub mod resource;
pub mod tool;

#[cfg(test)]
mod testing;

// Re-exports: Context
pub use context::{default_store, ExecutionStats, ServiceContext, ToolExecutionResult};

// Re-exports: Loaders
pub use loader::{
    fetch_player_stats, fetch_schedule, fetch_standings, fetch_statcast, fetch_team_stats,
    infer_date, read_through, StatcastFormat, StatcastRequest, UpstreamErrorPolicy,
};

// Re-exports: MCP
pub use mcp::{
    create_router, serve_http, serve_stdio, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    McpContent, McpResource, McpResourceContents, McpServer, McpTool, McpToolResult,
    PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION,
};

// Re-exports: Resources
pub use resource::ResourceHandler;

// Re-exports: Tool
pub use tool::{all_tools, Tool, ToolContext, ToolRegistry};

//! MCP Server - JSON-RPC method dispatch
//!
//! Transport independent: the stdio and HTTP front ends hand every raw
//! message to `McpServer::handle_message` and write back whatever it
//! returns. Notifications produce no response.

use super::types::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpResourceRead, McpTool, McpToolCall,
    McpToolResult, JSONRPC_VERSION, PROTOCOL_VERSION,
};
use crate::context::ServiceContext;
use crate::resource::ResourceHandler;
use baseball_foundation::Error;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "baseball-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

type MethodResult = std::result::Result<Value, JsonRpcError>;

#[derive(Clone)]
pub struct McpServer {
    context: ServiceContext,
    resources: ResourceHandler,
}

impl McpServer {
    pub fn new(context: ServiceContext) -> Self {
        Self {
            context,
            resources: ResourceHandler::new(),
        }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.context
    }

    /// Methods slow enough to deserve their own task
    pub fn is_long_running(method: &str) -> bool {
        matches!(method, "tools/call" | "resources/read")
    }

    /// Handle one raw JSON-RPC message
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        match parse_request(raw) {
            Ok(request) => self.handle_request(request).await,
            Err(response) => Some(response),
        }
    }

    /// Dispatch a parsed request; `None` for notifications
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("<- {} (id: {:?})", request.method, request.id);

        let Some(id) = request.id else {
            self.handle_notification(&request.method);
            return None;
        };

        let result = match request.method.as_str() {
            "initialize" => Ok(self.initialize(request.params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.list_tools()),
            "tools/call" => self.call_tool(request.params).await,
            "resources/list" => Ok(json!({ "resources": self.resources.list() })),
            "resources/read" => self.read_resource(request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => {
                debug!("-> error {}: {}", error.code, error.message);
                JsonRpcResponse::failure(id, error)
            }
        })
    }

    fn handle_notification(&self, method: &str) {
        match method {
            "notifications/initialized" => info!("Client initialized"),
            "notifications/cancelled" => debug!("Client cancelled a request"),
            other => debug!("Ignoring notification {}", other),
        }
    }

    // ========================================================================
    // Methods
    // ========================================================================

    fn initialize(&self, params: Option<&Value>) -> Value {
        if let Some(client) = params.and_then(|p| p.get("clientInfo")) {
            info!(
                "Initialize from {} {}",
                client.get("name").and_then(serde_json::Value::as_str).unwrap_or("unknown"),
                client.get("version").and_then(serde_json::Value::as_str).unwrap_or("")
            );
        }

        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            }
        })
    }

    fn list_tools(&self) -> Value {
        let tools: Vec<McpTool> = self
            .context
            .tools()
            .all()
            .into_iter()
            .map(|tool| McpTool {
                name: tool.name().to_string(),
                description: Some(tool.meta().description),
                input_schema: tool.schema(),
            })
            .collect();
        json!({ "tools": tools })
    }

    async fn call_tool(&self, params: Option<Value>) -> MethodResult {
        let call: McpToolCall = parse_params(params)?;
        let result = self.context.execute_tool(&call.name, call.arguments).await;
        debug!(
            "Tool '{}' finished in {}ms (success: {})",
            result.tool_name, result.duration_ms, result.success
        );

        let result = if result.success {
            McpToolResult::success(result.output)
        } else {
            McpToolResult::error(result.text())
        };
        to_value(&result)
    }

    async fn read_resource(&self, params: Option<Value>) -> MethodResult {
        let read: McpResourceRead = parse_params(params)?;
        match self.resources.read(&read.uri, &self.context).await {
            Ok(contents) => Ok(json!({ "contents": [contents] })),
            Err(e) => {
                warn!("Resource {} failed: {}", read.uri, e);
                Err(match e {
                    Error::ResourceNotFound(msg) => JsonRpcError::resource_not_found(msg),
                    Error::Validation(msg) => JsonRpcError::invalid_params(msg),
                    other => JsonRpcError::internal_error(other.to_string()),
                })
            }
        }
    }
}

/// Parse a raw message, or the error response owed for it
pub fn parse_request(raw: &str) -> std::result::Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| JsonRpcResponse::failure(Value::Null, JsonRpcError::parse_error(e.to_string())))?;

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    let request: JsonRpcRequest = serde_json::from_value(value)
        .map_err(|e| JsonRpcResponse::failure(id.clone(), JsonRpcError::invalid_request(e.to_string())))?;

    if request.jsonrpc != JSONRPC_VERSION {
        return Err(JsonRpcResponse::failure(
            id,
            JsonRpcError::invalid_request(format!("unsupported jsonrpc version '{}'", request.jsonrpc)),
        ));
    }
    Ok(request)
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> std::result::Result<T, JsonRpcError> {
    let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))
}

fn to_value<T: serde::Serialize>(value: &T) -> MethodResult {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

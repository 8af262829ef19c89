//! Service Context - what every tool call runs against
//!
//! Holds the shared cache, the upstream provider and the tool registry,
//! and implements `ToolContext` for the tools. This is the composition
//! root: the process-wide default store is only ever reached from here.
//!
//! ```ignore
//! let ctx = ServiceContext::default_context()?;
//! let result = ctx.execute_tool("get_player_stats", json!({
//!     "player_name": "Aaron Judge",
//!     "year": 2024
//! })).await;
//! ```

use crate::tool::ToolRegistry;
use baseball_foundation::{
    BaseballConfig, BlobStore, Result, StatsProvider, ToolContext, ToolResult,
};
use baseball_provider::StatsGateway;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

lazy_static::lazy_static! {
    /// Process-wide cache opened from the global configuration on first use
    static ref DEFAULT_STORE: BlobStore =
        BlobStore::open(Some(BaseballConfig::load().cache_location()));
}

/// Shared handle to the process-wide cache
pub fn default_store() -> BlobStore {
    DEFAULT_STORE.clone()
}

// ============================================================================
// Tool Execution Result
// ============================================================================

#[derive(Debug, Clone)]
pub struct ToolExecutionResult {
    pub tool_name: String,
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl ToolExecutionResult {
    /// Text shown to the caller; failures read `Error: <message>`
    pub fn text(&self) -> String {
        if self.success {
            self.output.clone()
        } else {
            format!("Error: {}", self.error.as_deref().unwrap_or("Unknown error"))
        }
    }
}

/// Counters over the life of the context
#[derive(Debug, Clone, Default)]
pub struct ExecutionStats {
    pub tool_executions: usize,
    pub tool_successes: usize,
    pub tool_failures: usize,
    pub total_duration_ms: u64,
}

// ============================================================================
// Service Context
// ============================================================================

/// Cheap to clone; clones share the store, provider, registry and stats
#[derive(Clone)]
pub struct ServiceContext {
    store: BlobStore,
    provider: Arc<dyn StatsProvider>,
    tools: Arc<ToolRegistry>,
    stats: Arc<RwLock<ExecutionStats>>,
}

impl ServiceContext {
    /// Context over an explicit store and provider, with the builtin tools
    pub fn new(store: BlobStore, provider: Arc<dyn StatsProvider>) -> Self {
        Self::with_registry(store, provider, ToolRegistry::with_builtins())
    }

    pub fn with_registry(
        store: BlobStore,
        provider: Arc<dyn StatsProvider>,
        tools: ToolRegistry,
    ) -> Self {
        Self {
            store,
            provider,
            tools: Arc::new(tools),
            stats: Arc::new(RwLock::new(ExecutionStats::default())),
        }
    }

    /// Context for `config`: its cache location if one is set, otherwise
    /// the process-wide store; the live upstream gateway.
    pub fn from_config(config: &BaseballConfig) -> Result<Self> {
        let store = match &config.cache {
            Some(_) => BlobStore::open(Some(config.cache_location())),
            None => default_store(),
        };
        let provider = StatsGateway::from_config(&config.upstream)?;

        info!(
            "Service context ready (cache: {}, backend: {}, provider: {})",
            store.location(),
            store.backend_kind().as_str(),
            provider.name()
        );
        Ok(Self::new(store, Arc::new(provider)))
    }

    /// Context from the global configuration file and environment
    pub fn default_context() -> Result<Self> {
        Self::from_config(&BaseballConfig::load())
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    // ========================================================================
    // Tool Execution
    // ========================================================================

    /// Run a tool by name.
    ///
    /// Never fails: an unknown tool, bad input or a loader error all come
    /// back as an unsuccessful result carrying the message.
    pub async fn execute_tool(&self, name: &str, input: Value) -> ToolExecutionResult {
        let start = Instant::now();
        debug!("Executing tool '{}' with input: {}", name, input);

        let result = match self.tools.get(name) {
            Some(tool) => match tool.execute(input, self).await {
                Ok(result) => result,
                Err(e) => {
                    if e.is_user_facing() {
                        debug!("Tool '{}' rejected call: {}", name, e);
                    } else {
                        error!("Tool '{}' execution failed: {}", name, e);
                    }
                    ToolResult::error(e.to_string())
                }
            },
            None => ToolResult::error(format!("Unknown tool: {}", name)),
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        {
            let mut stats = self.stats.write().await;
            stats.tool_executions += 1;
            stats.total_duration_ms += duration_ms;
            if result.success {
                stats.tool_successes += 1;
            } else {
                stats.tool_failures += 1;
            }
        }

        ToolExecutionResult {
            tool_name: name.to_string(),
            success: result.success,
            output: result.output,
            error: result.error,
            duration_ms,
        }
    }

    pub async fn stats(&self) -> ExecutionStats {
        self.stats.read().await.clone()
    }
}

impl ToolContext for ServiceContext {
    fn store(&self) -> &BlobStore {
        &self.store
    }

    fn provider(&self) -> &dyn StatsProvider {
        self.provider.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{table, StubProvider};
    use baseball_foundation::Cell;
    use serde_json::json;

    fn context() -> ServiceContext {
        let provider = StubProvider::new().with_table(
            "batting_stats",
            table(
                &["Name", "HR"],
                vec![vec![Cell::from("Test Player"), Cell::from(1)]],
            ),
        );
        ServiceContext::new(BlobStore::in_memory(), Arc::new(provider))
    }

    #[tokio::test]
    async fn test_execute_tool_success() {
        let ctx = context();
        let result = ctx
            .execute_tool(
                "get_player_stats",
                json!({"player_name": "Test Player", "year": 2024}),
            )
            .await;

        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.text(), "Name\tHR\nTest Player\t1\n");
        assert_eq!(result.tool_name, "get_player_stats");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_an_error_result() {
        let ctx = context();
        let result = ctx.execute_tool("no_such_tool", json!({})).await;

        assert!(!result.success);
        assert_eq!(result.text(), "Error: Unknown tool: no_such_tool");
    }

    #[tokio::test]
    async fn test_stats_are_counted() {
        let ctx = context();
        ctx.execute_tool("list_team_abbreviations", json!({})).await;
        ctx.execute_tool("get_schedule", json!({})).await;

        let stats = ctx.stats().await;
        assert_eq!(stats.tool_executions, 2);
        assert_eq!(stats.tool_successes, 1);
        assert_eq!(stats.tool_failures, 1);
    }

    #[test]
    fn test_clones_share_the_store() {
        let ctx = context();
        let clone = ctx.clone();
        ctx.store().set("k", b"v").unwrap();
        assert_eq!(clone.store().get("k").unwrap(), Some(b"v".to_vec()));
    }
}

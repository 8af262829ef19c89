//! Core Traits - seams implemented by the upper layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Layer3-CLI                                                 │
//! │  └── composition root (config, store, provider, transport)  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Layer2-Core                                                │
//! │  ├── Tool implementations (get_player_stats, ...)           │
//! │  └── ToolContext implementation (ServiceContext)            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Layer2-Provider                                            │
//! │  └── StatsProvider implementation (StatsGateway)            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Layer1-Foundation (this layer)                             │
//! │  └── Trait definitions (StatsProvider, Tool, ToolContext)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use super::types::DivisionStandings;
use crate::storage::BlobStore;
use crate::table::Table;
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;

// ============================================================================
// StatsProvider - upstream fetch contract
// ============================================================================

/// Raw statistics source
///
/// Every method returns the upstream's data as-is; caching, filtering and
/// normalisation happen in the loaders. Errors are returned, never swallowed.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &str;

    /// Season batting lines for every player
    async fn batting_stats(&self, year: i32) -> Result<Table>;

    /// Season team batting; `None` means all teams
    async fn team_batting(&self, year: i32, team: Option<&str>) -> Result<Table>;

    /// Season schedule and results for one team. The `Date` column may
    /// carry partial dates such as `Thursday, Mar 27`.
    async fn schedule_and_record(&self, season: i32, team: &str) -> Result<Table>;

    /// Pitch-level events for all players between two dates, inclusive
    async fn statcast(&self, start: NaiveDate, end: NaiveDate) -> Result<Table>;

    async fn statcast_batter(&self, start: NaiveDate, end: NaiveDate, player_id: i64)
        -> Result<Table>;

    async fn statcast_pitcher(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        player_id: i64,
    ) -> Result<Table>;

    /// Division standings, as of `date` or the end of the season
    async fn standings(&self, year: i32, date: Option<NaiveDate>)
        -> Result<Vec<DivisionStandings>>;
}

// ============================================================================
// Tool Trait
// ============================================================================

/// Tool metadata
#[derive(Debug, Clone)]
pub struct ToolMeta {
    /// Unique identifier
    pub name: String,
    pub display_name: String,
    pub description: String,
    /// Grouping (players, teams, games, reference ...)
    pub category: String,
}

impl ToolMeta {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            description: String::new(),
            category: "general".to_string(),
        }
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn category(mut self, cat: impl Into<String>) -> Self {
        self.category = cat.into();
        self
    }
}

/// Result of one tool execution
///
/// A failed execution still produces a result: the message is shown to the
/// caller as text rather than surfacing as a protocol fault.
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
    pub metadata: HashMap<String, Value>,
}

impl ToolResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
            metadata: HashMap::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(message.into()),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Text shown to the caller: the output, or `Error: <message>`
    pub fn display_text(&self) -> String {
        if self.success {
            self.output.clone()
        } else {
            format!("Error: {}", self.error.as_deref().unwrap_or("Unknown error"))
        }
    }
}

/// Tool interface
///
/// Implemented in Layer2-core.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn meta(&self) -> ToolMeta;

    /// JSON Schema of the input object
    fn schema(&self) -> Value;

    /// Run the tool.
    ///
    /// `Err` is reserved for failures of the tool itself; the registry turns
    /// it into an error result like any other.
    async fn execute(&self, input: Value, context: &dyn ToolContext) -> Result<ToolResult>;
}

/// What a tool can reach while executing
pub trait ToolContext: Send + Sync {
    /// Cache shared by every loader call
    fn store(&self) -> &BlobStore;

    /// Upstream data source
    fn provider(&self) -> &dyn StatsProvider;
}

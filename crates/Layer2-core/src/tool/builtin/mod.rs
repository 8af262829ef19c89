//! Builtin Tools
//!
//! ### Players
//! - `get_player_stats` - season batting line for one player
//! - `compare_players` - several players side by side
//! - `similarity_score` - metric-by-metric difference of two players
//!
//! ### Teams
//! - `get_team_stats` - season team batting
//! - `list_team_abbreviations` - valid team codes
//!
//! ### Games
//! - `get_schedule` - games and results in a date range
//! - `get_game_log` - player season line or team schedule
//! - `get_standings` - division standings
//!
//! ### Statcast
//! - `get_statcast` - pitch events, summarised or raw
//!
//! ### Reference
//! - `park_factors` - ballpark run and home-run factors

pub mod games;
pub mod players;
pub mod reference;
pub mod statcast;
pub mod teams;

pub use games::{GetGameLogTool, GetScheduleTool, GetStandingsTool};
pub use players::{ComparePlayersTool, GetPlayerStatsTool, SimilarityScoreTool};
pub use reference::ParkFactorsTool;
pub use statcast::GetStatcastTool;
pub use teams::{GetTeamStatsTool, ListTeamAbbreviationsTool};

use baseball_foundation::{Error, Result, Table, Tool, ToolResult};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;

/// One instance of every builtin tool
pub fn all_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        // Players
        Arc::new(GetPlayerStatsTool::new()) as Arc<dyn Tool>,
        Arc::new(ComparePlayersTool::new()),
        Arc::new(SimilarityScoreTool::new()),
        // Teams
        Arc::new(GetTeamStatsTool::new()),
        Arc::new(ListTeamAbbreviationsTool::new()),
        // Games
        Arc::new(GetScheduleTool::new()),
        Arc::new(GetGameLogTool::new()),
        Arc::new(GetStandingsTool::new()),
        // Statcast
        Arc::new(GetStatcastTool::new()),
        // Reference
        Arc::new(ParkFactorsTool::new()),
    ]
}

/// Deserialize tool arguments; a missing argument object counts as `{}`
pub(crate) fn parse_input<T: DeserializeOwned>(input: Value) -> Result<T> {
    let input = if input.is_null() { json!({}) } else { input };
    serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))
}

/// Render `table` as TSV, or `empty_message` when it has no rows
pub(crate) fn table_result(table: &Table, empty_message: impl Into<String>) -> Result<ToolResult> {
    if table.is_empty() {
        return Ok(ToolResult::success(empty_message).with_metadata("rows", json!(0)));
    }
    Ok(ToolResult::success(table.to_tsv()?)
        .with_metadata("rows", json!(table.len()))
        .with_metadata("columns", json!(table.columns())))
}

/// JSON Schema fragment for a season year
pub(crate) fn year_schema(description: &str) -> Value {
    json!({
        "type": "integer",
        "description": description,
        "minimum": crate::loader::MIN_YEAR
    })
}

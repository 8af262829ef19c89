//! Player tools - season stats, comparisons and similarity

use super::{parse_input, table_result, year_schema};
use crate::loader::{current_year, fetch_player_stats};
use async_trait::async_trait;
use baseball_foundation::{
    Cell, Error, Result, Table, Tool, ToolContext, ToolMeta, ToolResult,
};
use serde::Deserialize;
use serde_json::{json, Value};

// ============================================================================
// get_player_stats
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PlayerStatsInput {
    #[serde(default)]
    pub player_name: String,

    /// Defaults to the current season
    #[serde(default)]
    pub year: Option<i32>,
}

pub struct GetPlayerStatsTool;

impl GetPlayerStatsTool {
    pub const NAME: &'static str = "get_player_stats";

    pub fn new() -> Self {
        Self
    }
}

impl Default for GetPlayerStatsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for GetPlayerStatsTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> ToolMeta {
        ToolMeta::new(Self::NAME)
            .display_name("Player Stats")
            .description("Get player statistics for a specific player")
            .category("players")
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "player_name": {
                    "type": "string",
                    "description": "Name of the player"
                },
                "year": year_schema("Year for statistics (optional)")
            },
            "required": ["player_name"]
        })
    }

    async fn execute(&self, input: Value, context: &dyn ToolContext) -> Result<ToolResult> {
        let input: PlayerStatsInput = parse_input(input)?;
        let table = fetch_player_stats(
            context.store(),
            context.provider(),
            &input.player_name,
            input.year,
            None,
        )
        .await?;

        table_result(&table, format!("No stats found for {}", input.player_name))
    }
}

// ============================================================================
// compare_players
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ComparePlayersInput {
    #[serde(default)]
    pub players: Vec<String>,

    #[serde(default)]
    pub year: Option<i32>,

    /// Column to rank by
    #[serde(default)]
    pub metric: Option<String>,
}

pub struct ComparePlayersTool;

impl ComparePlayersTool {
    pub const NAME: &'static str = "compare_players";

    pub fn new() -> Self {
        Self
    }
}

impl Default for ComparePlayersTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ComparePlayersTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> ToolMeta {
        ToolMeta::new(Self::NAME)
            .display_name("Compare Players")
            .description("Compare statistics between multiple players")
            .category("players")
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "players": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "List of player names to compare",
                    "minItems": 2
                },
                "year": year_schema("Year for comparison"),
                "metric": {
                    "type": "string",
                    "description": "Specific metric to focus on (optional)"
                }
            },
            "required": ["players", "year"]
        })
    }

    async fn execute(&self, input: Value, context: &dyn ToolContext) -> Result<ToolResult> {
        let input: ComparePlayersInput = parse_input(input)?;
        if input.players.len() < 2 {
            return Err(Error::validation("Need at least 2 players to compare"));
        }
        let year = input.year.unwrap_or_else(current_year);

        let mut found = Vec::new();
        for player in &input.players {
            let table =
                fetch_player_stats(context.store(), context.provider(), player, Some(year), None)
                    .await?;
            if !table.is_empty() {
                found.push(table.with_column("Player", Cell::from(player.as_str())));
            }
        }
        if found.is_empty() {
            return Ok(ToolResult::success("No player statistics found for comparison"));
        }

        let combined = Table::concat(found);
        let comparison = match input.metric.as_deref() {
            Some(metric) if combined.has_column(metric) => {
                let mut ranked = combined.select(&["Player", metric]);
                ranked.sort_by_column_desc(metric);
                ranked
            }
            _ => combined,
        };

        table_result(&comparison, "No player statistics found for comparison")
    }
}

// ============================================================================
// similarity_score
// ============================================================================

const BATTING_METRICS: &[&str] = &["AVG", "HR", "RBI", "OPS"];
const PITCHING_METRICS: &[&str] = &["ERA", "WHIP", "K/9", "BB/9"];
const ALL_METRICS: &[&str] = &["AVG", "HR", "RBI", "OPS", "ERA", "WHIP"];

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricSet {
    #[default]
    Batting,
    Pitching,
    All,
}

impl MetricSet {
    fn metrics(&self) -> &'static [&'static str] {
        match self {
            MetricSet::Batting => BATTING_METRICS,
            MetricSet::Pitching => PITCHING_METRICS,
            MetricSet::All => ALL_METRICS,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SimilarityInput {
    #[serde(default)]
    pub player_a: String,

    #[serde(default)]
    pub player_b: String,

    #[serde(default)]
    pub year: Option<i32>,

    #[serde(default)]
    pub metric_set: MetricSet,
}

pub struct SimilarityScoreTool;

impl SimilarityScoreTool {
    pub const NAME: &'static str = "similarity_score";

    pub fn new() -> Self {
        Self
    }
}

impl Default for SimilarityScoreTool {
    fn default() -> Self {
        Self::new()
    }
}

/// Metric, both players' first-row values and their absolute difference
fn similarity_table(a: &Table, b: &Table, names: (&str, &str), metrics: &[&str]) -> Option<Table> {
    let available: Vec<&str> = metrics
        .iter()
        .copied()
        .filter(|m| a.has_column(m) && b.has_column(m))
        .collect();
    if available.is_empty() {
        return None;
    }

    let mut table = Table::new(["Metric", names.0, names.1, "Difference"]);
    for metric in available {
        let value_a = a.cell(0, metric).cloned().unwrap_or(Cell::Null);
        let value_b = b.cell(0, metric).cloned().unwrap_or(Cell::Null);
        let difference = match (value_a.as_f64(), value_b.as_f64()) {
            (Some(x), Some(y)) => Cell::from((x - y).abs()),
            _ => Cell::Null,
        };
        table
            .push_row(vec![Cell::from(metric), value_a, value_b, difference])
            .ok()?;
    }
    Some(table)
}

#[async_trait]
impl Tool for SimilarityScoreTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> ToolMeta {
        ToolMeta::new(Self::NAME)
            .display_name("Similarity Score")
            .description("Calculate sabermetric similarity between two players")
            .category("players")
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "player_a": {
                    "type": "string",
                    "description": "First player name"
                },
                "player_b": {
                    "type": "string",
                    "description": "Second player name"
                },
                "year": year_schema("Year for comparison"),
                "metric_set": {
                    "type": "string",
                    "enum": ["batting", "pitching", "all"],
                    "description": "Set of metrics to use for similarity",
                    "default": "batting"
                }
            },
            "required": ["player_a", "player_b", "year"]
        })
    }

    async fn execute(&self, input: Value, context: &dyn ToolContext) -> Result<ToolResult> {
        let input: SimilarityInput = parse_input(input)?;
        let year = Some(input.year.unwrap_or_else(current_year));

        let a = fetch_player_stats(context.store(), context.provider(), &input.player_a, year, None)
            .await?;
        let b = fetch_player_stats(context.store(), context.provider(), &input.player_b, year, None)
            .await?;
        if a.is_empty() || b.is_empty() {
            return Ok(ToolResult::success(format!(
                "Cannot find stats for comparison between {} and {}",
                input.player_a, input.player_b
            )));
        }

        match similarity_table(
            &a,
            &b,
            (input.player_a.as_str(), input.player_b.as_str()),
            input.metric_set.metrics(),
        ) {
            Some(table) => table_result(&table, "No common metrics found for comparison"),
            None => Ok(ToolResult::success("No common metrics found for comparison")),
        }
    }
}

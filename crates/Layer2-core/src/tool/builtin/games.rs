//! Game tools - schedules, game logs and standings

use super::{parse_input, table_result, year_schema};
use crate::loader::{
    current_year, fetch_player_stats, fetch_schedule, fetch_standings, parse_date,
};
use async_trait::async_trait;
use baseball_foundation::{Result, Tool, ToolContext, ToolMeta, ToolResult};
use chrono::Datelike;
use serde::Deserialize;
use serde_json::{json, Value};

fn date_schema(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

// ============================================================================
// get_schedule
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ScheduleInput {
    #[serde(default)]
    pub team: String,

    #[serde(default)]
    pub start_date: String,

    #[serde(default)]
    pub end_date: String,
}

pub struct GetScheduleTool;

impl GetScheduleTool {
    pub const NAME: &'static str = "get_schedule";

    pub fn new() -> Self {
        Self
    }
}

impl Default for GetScheduleTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for GetScheduleTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> ToolMeta {
        ToolMeta::new(Self::NAME)
            .display_name("Schedule")
            .description("Get game schedule for a team and date range")
            .category("games")
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "team": {
                    "type": "string",
                    "description": "Team abbreviation"
                },
                "start_date": date_schema("Start date (YYYY-MM-DD)"),
                "end_date": date_schema("End date (YYYY-MM-DD)")
            },
            "required": ["team", "start_date", "end_date"]
        })
    }

    async fn execute(&self, input: Value, context: &dyn ToolContext) -> Result<ToolResult> {
        let input: ScheduleInput = parse_input(input)?;
        let table = fetch_schedule(
            context.store(),
            context.provider(),
            &input.team,
            &input.start_date,
            &input.end_date,
        )
        .await?;

        table_result(
            &table,
            format!(
                "No games found for {} between {} and {}",
                input.team, input.start_date, input.end_date
            ),
        )
    }
}

// ============================================================================
// get_game_log
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    #[default]
    Player,
    Team,
}

#[derive(Debug, Deserialize)]
pub struct GameLogInput {
    /// Player name or team abbreviation
    #[serde(default)]
    pub entity: String,

    #[serde(default)]
    pub entity_type: EntityType,

    #[serde(default)]
    pub start_date: String,

    #[serde(default)]
    pub end_date: String,
}

/// Players: the season line for the start date's season.
/// Teams: the schedule over the range.
pub struct GetGameLogTool;

impl GetGameLogTool {
    pub const NAME: &'static str = "get_game_log";

    pub fn new() -> Self {
        Self
    }
}

impl Default for GetGameLogTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for GetGameLogTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> ToolMeta {
        ToolMeta::new(Self::NAME)
            .display_name("Game Log")
            .description("Get game-by-game log for a player or team")
            .category("games")
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "entity": {
                    "type": "string",
                    "description": "Player name or team abbreviation"
                },
                "entity_type": {
                    "type": "string",
                    "enum": ["player", "team"],
                    "description": "Type of entity",
                    "default": "player"
                },
                "start_date": date_schema("Start date (YYYY-MM-DD)"),
                "end_date": date_schema("End date (YYYY-MM-DD)")
            },
            "required": ["entity", "start_date", "end_date"]
        })
    }

    async fn execute(&self, input: Value, context: &dyn ToolContext) -> Result<ToolResult> {
        let input: GameLogInput = parse_input(input)?;

        match input.entity_type {
            EntityType::Player => {
                let season = parse_date("start_date", &input.start_date)?.year();
                let table = fetch_player_stats(
                    context.store(),
                    context.provider(),
                    &input.entity,
                    Some(season),
                    None,
                )
                .await?;
                table_result(&table, format!("No game log found for player {}", input.entity))
            }
            EntityType::Team => {
                let table = fetch_schedule(
                    context.store(),
                    context.provider(),
                    &input.entity,
                    &input.start_date,
                    &input.end_date,
                )
                .await?;
                table_result(&table, format!("No game log found for team {}", input.entity))
            }
        }
    }
}

// ============================================================================
// get_standings
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StandingsInput {
    #[serde(default)]
    pub year: Option<i32>,

    /// Standings as of this date (YYYY-MM-DD)
    #[serde(default)]
    pub date: Option<String>,
}

pub struct GetStandingsTool;

impl GetStandingsTool {
    pub const NAME: &'static str = "get_standings";

    pub fn new() -> Self {
        Self
    }
}

impl Default for GetStandingsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for GetStandingsTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> ToolMeta {
        ToolMeta::new(Self::NAME)
            .display_name("Standings")
            .description("Get division and league standings")
            .category("games")
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "year": year_schema("Year for standings"),
                "date": date_schema("Optional date (YYYY-MM-DD) for standings on specific date")
            },
            "required": ["year"]
        })
    }

    async fn execute(&self, input: Value, context: &dyn ToolContext) -> Result<ToolResult> {
        let input: StandingsInput = parse_input(input)?;
        let year = input.year.unwrap_or_else(current_year);

        let table = fetch_standings(
            context.store(),
            context.provider(),
            year,
            input.date.as_deref(),
        )
        .await?;
        table_result(&table, format!("No standings data found for {}", year))
    }
}

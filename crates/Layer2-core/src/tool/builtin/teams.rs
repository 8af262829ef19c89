//! Team tools

use super::{parse_input, table_result, year_schema};
use crate::loader::fetch_team_stats;
use async_trait::async_trait;
use baseball_foundation::{
    Error, Result, Tool, ToolContext, ToolMeta, ToolResult, TEAM_DIRECTORY,
};
use serde::Deserialize;
use serde_json::{json, Value};

// ============================================================================
// get_team_stats
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TeamStatsInput {
    #[serde(default)]
    pub team: String,

    /// Required; kept as raw JSON so a non-integer gets a clear message
    #[serde(default)]
    pub year: Value,
}

pub struct GetTeamStatsTool;

impl GetTeamStatsTool {
    pub const NAME: &'static str = "get_team_stats";

    pub fn new() -> Self {
        Self
    }
}

impl Default for GetTeamStatsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for GetTeamStatsTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> ToolMeta {
        ToolMeta::new(Self::NAME)
            .display_name("Team Stats")
            .description("Get team statistics for a specific team and year")
            .category("teams")
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "team": {
                    "type": "string",
                    "description": "Team abbreviation (e.g., 'NYY', 'BOS')"
                },
                "year": year_schema("Year for statistics")
            },
            "required": ["team", "year"]
        })
    }

    async fn execute(&self, input: Value, context: &dyn ToolContext) -> Result<ToolResult> {
        let input: TeamStatsInput = parse_input(input)?;
        let year = input
            .year
            .as_i64()
            .and_then(|y| i32::try_from(y).ok())
            .ok_or_else(|| Error::validation("Year must be an integer"))?;

        let table =
            fetch_team_stats(context.store(), context.provider(), &input.team, year, None).await?;
        table_result(
            &table,
            format!("No stats found for team {} in {}", input.team, year),
        )
    }
}

// ============================================================================
// list_team_abbreviations
// ============================================================================

pub struct ListTeamAbbreviationsTool;

impl ListTeamAbbreviationsTool {
    pub const NAME: &'static str = "list_team_abbreviations";

    pub fn new() -> Self {
        Self
    }

    fn render() -> String {
        let mut entries: Vec<&(&str, &str)> = TEAM_DIRECTORY.iter().collect();
        entries.sort();

        let mut out = String::from("Valid Team Abbreviations:\n");
        out.push_str(&"=".repeat(50));
        out.push('\n');
        for (abbr, name) in entries {
            out.push_str(&format!("{:<4} - {}\n", abbr, name));
        }
        out.push_str("\nNote: Some teams have multiple valid abbreviations (shown in parentheses).");
        out.push_str("\nExample: Use 'SD' or 'SDP' for San Diego Padres");
        out
    }
}

impl Default for ListTeamAbbreviationsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ListTeamAbbreviationsTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> ToolMeta {
        ToolMeta::new(Self::NAME)
            .display_name("Team Abbreviations")
            .description("List valid team abbreviations for use with team tools")
            .category("teams")
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(&self, _input: Value, _context: &dyn ToolContext) -> Result<ToolResult> {
        Ok(ToolResult::success(Self::render()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ServiceContext;
    use crate::testing::{table, StubProvider};
    use baseball_foundation::{BlobStore, Cell};
    use std::sync::Arc;

    fn context() -> ServiceContext {
        let provider = StubProvider::new().with_table(
            "team_batting",
            table(
                &["Team", "HR"],
                vec![vec![Cell::from("SDP"), Cell::from(190)]],
            ),
        );
        ServiceContext::new(BlobStore::in_memory(), Arc::new(provider))
    }

    #[tokio::test]
    async fn test_team_stats() {
        let ctx = context();
        let result = GetTeamStatsTool::new()
            .execute(json!({"team": "SD", "year": 2024}), &ctx)
            .await
            .unwrap();
        assert_eq!(result.output, "Team\tHR\nSDP\t190\n");

        let result = GetTeamStatsTool::new()
            .execute(json!({"team": "BOS", "year": 2024}), &ctx)
            .await
            .unwrap();
        assert_eq!(result.output, "No stats found for team BOS in 2024");
    }

    #[tokio::test]
    async fn test_team_stats_year_must_be_integer() {
        let ctx = context();
        for year in [json!("2024"), json!(null), json!(2024.5)] {
            let err = GetTeamStatsTool::new()
                .execute(json!({"team": "SD", "year": year}), &ctx)
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "Year must be an integer");
        }
    }

    #[tokio::test]
    async fn test_list_team_abbreviations() {
        let ctx = context();
        let result = ListTeamAbbreviationsTool::new()
            .execute(json!({}), &ctx)
            .await
            .unwrap();

        let lines: Vec<&str> = result.output.lines().collect();
        assert_eq!(lines[0], "Valid Team Abbreviations:");
        assert_eq!(lines[1], "=".repeat(50));
        assert_eq!(lines[2], "ARI  - Arizona Diamondbacks");
        assert!(lines.contains(&"SD   - San Diego Padres (also SDP)"));
        assert!(result
            .output
            .ends_with("Example: Use 'SD' or 'SDP' for San Diego Padres"));
    }
}

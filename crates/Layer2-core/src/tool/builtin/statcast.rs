//! get_statcast tool

use super::{parse_input, table_result};
use crate::loader::{fetch_statcast, StatcastFormat, StatcastRequest};
use async_trait::async_trait;
use baseball_foundation::{Result, StatcastType, Tool, ToolContext, ToolMeta, ToolResult};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct StatcastInput {
    #[serde(default)]
    pub start_date: String,

    #[serde(default)]
    pub end_date: String,

    #[serde(default)]
    pub player_id: Option<i64>,

    #[serde(default)]
    pub statcast_type: StatcastType,

    #[serde(default)]
    pub format_type: StatcastFormat,
}

pub struct GetStatcastTool;

impl GetStatcastTool {
    pub const NAME: &'static str = "get_statcast";

    pub fn new() -> Self {
        Self
    }
}

impl Default for GetStatcastTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for GetStatcastTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> ToolMeta {
        ToolMeta::new(Self::NAME)
            .display_name("Statcast")
            .description("Get Statcast data for a date range")
            .category("statcast")
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "start_date": {
                    "type": "string",
                    "description": "Start date (YYYY-MM-DD)"
                },
                "end_date": {
                    "type": "string",
                    "description": "End date (YYYY-MM-DD)"
                },
                "player_id": {
                    "type": "integer",
                    "description": "Optional player ID for filtering"
                },
                "statcast_type": {
                    "type": "string",
                    "enum": ["all", "batter", "pitcher"],
                    "description": "Type of Statcast data",
                    "default": "all"
                },
                "format_type": {
                    "type": "string",
                    "enum": ["summary", "raw", "parquet"],
                    "description": "Format of returned data: per-game summary or every pitch ('parquet' is an alias of 'raw')",
                    "default": "summary"
                }
            },
            "required": ["start_date", "end_date"]
        })
    }

    async fn execute(&self, input: Value, context: &dyn ToolContext) -> Result<ToolResult> {
        let input: StatcastInput = parse_input(input)?;
        let request = StatcastRequest {
            start_date: &input.start_date,
            end_date: &input.end_date,
            player_id: input.player_id,
            statcast_type: input.statcast_type,
            format: input.format_type,
        };

        let table = fetch_statcast(context.store(), context.provider(), &request).await?;
        Ok(table_result(
            &table,
            format!(
                "No Statcast data found for {} to {}",
                input.start_date, input.end_date
            ),
        )?
        .with_metadata("format", json!(input.format_type.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ServiceContext;
    use crate::testing::{table, StubProvider};
    use baseball_foundation::{BlobStore, Cell};
    use std::sync::Arc;

    fn pitches() -> baseball_foundation::Table {
        table(
            &["game_date", "player_name", "batter", "launch_speed", "pitch_type"],
            vec![
                vec![
                    Cell::from("2024-04-01"),
                    Cell::from("Judge, Aaron"),
                    Cell::from(592450),
                    Cell::from(110.0),
                    Cell::from("FF"),
                ],
                vec![
                    Cell::from("2024-04-01"),
                    Cell::from("Judge, Aaron"),
                    Cell::from(592450),
                    Cell::from(100.0),
                    Cell::from("SL"),
                ],
            ],
        )
    }

    #[tokio::test]
    async fn test_summary_is_default() {
        let provider = StubProvider::new().with_table("statcast_batter", pitches());
        let ctx = ServiceContext::new(BlobStore::in_memory(), Arc::new(provider));

        let result = GetStatcastTool::new()
            .execute(
                json!({
                    "start_date": "2024-04-01",
                    "end_date": "2024-04-01",
                    "player_id": 592450,
                    "statcast_type": "batter"
                }),
                &ctx,
            )
            .await
            .unwrap();

        assert_eq!(
            result.output,
            "game_date\tplayer_name\tbatter\tavg_exit_velocity\tmax_exit_velocity\tpitch_count\n\
             2024-04-01\tJudge, Aaron\t592450\t105.0\t110.0\t2\n"
        );
        assert_eq!(result.metadata["format"], json!("summary"));
    }

    #[tokio::test]
    async fn test_parquet_alias_returns_raw_pitches() {
        let provider = StubProvider::new().with_table("statcast", pitches());
        let ctx = ServiceContext::new(BlobStore::in_memory(), Arc::new(provider));

        let result = GetStatcastTool::new()
            .execute(
                json!({"start_date": "2024-04-01", "end_date": "2024-04-01", "format_type": "parquet"}),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(result.output.lines().count(), 3);
        assert_eq!(result.metadata["format"], json!("raw"));
    }

    #[tokio::test]
    async fn test_upstream_failure_reads_as_no_data() {
        let provider = StubProvider::new().failing("statcast");
        let ctx = ServiceContext::new(BlobStore::in_memory(), Arc::new(provider));

        let result = GetStatcastTool::new()
            .execute(json!({"start_date": "2024-04-01", "end_date": "2024-04-02"}), &ctx)
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(
            result.output,
            "No Statcast data found for 2024-04-01 to 2024-04-02"
        );
    }

    #[tokio::test]
    async fn test_unknown_statcast_type_is_invalid_input() {
        let ctx = ServiceContext::new(BlobStore::in_memory(), Arc::new(StubProvider::new()));
        let err = GetStatcastTool::new()
            .execute(
                json!({"start_date": "2024-04-01", "end_date": "2024-04-02", "statcast_type": "fielder"}),
                &ctx,
            )
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid input:"));
    }
}

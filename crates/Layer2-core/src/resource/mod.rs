//! MCP resources
//!
//! - `team-season://TEAM/YEAR` - team batting line and full season schedule
//! - `stat-definitions://v1` - glossary of batting, pitching and Statcast terms
//! - `cache://status` - cache location, backend and size

mod definitions;

pub use definitions::STAT_DEFINITIONS_MARKDOWN;

use crate::loader::{fetch_schedule, fetch_team_stats};
use crate::mcp::{McpResource, McpResourceContents};
use baseball_foundation::{normalize_team, Error, Result, Table, ToolContext};
use serde_json::json;
use tracing::{debug, warn};

pub const TEAM_SEASON_SCHEME: &str = "team-season://";
pub const STAT_DEFINITIONS_URI: &str = "stat-definitions://v1";
pub const CACHE_SCHEME: &str = "cache://";
pub const CACHE_STATUS_URI: &str = "cache://status";

const MARKDOWN: &str = "text/markdown";
const JSON: &str = "application/json";

/// Lists and renders the server's resources
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceHandler;

impl ResourceHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn list(&self) -> Vec<McpResource> {
        vec![
            McpResource {
                uri: format!("{}SDP/2024", TEAM_SEASON_SCHEME),
                name: "Team Season Package".to_string(),
                description: Some(
                    "Complete team season data including stats and schedule. \
                     Example: team-season://SDP/2024 Format: team-season://TEAM/YEAR"
                        .to_string(),
                ),
                mime_type: Some(MARKDOWN.to_string()),
            },
            McpResource {
                uri: STAT_DEFINITIONS_URI.to_string(),
                name: "Baseball Statistics Definitions".to_string(),
                description: Some(
                    "Comprehensive glossary of baseball statistics and metrics".to_string(),
                ),
                mime_type: Some(MARKDOWN.to_string()),
            },
            McpResource {
                uri: CACHE_STATUS_URI.to_string(),
                name: "Cache Status".to_string(),
                description: Some("Cache location, backend and size".to_string()),
                mime_type: Some(JSON.to_string()),
            },
        ]
    }

    /// Render the resource at `uri`.
    ///
    /// Malformed or unknown URIs are errors. A team-season package whose
    /// data cannot be loaded still renders, with the failure in its body.
    pub async fn read(&self, uri: &str, context: &dyn ToolContext) -> Result<McpResourceContents> {
        debug!("Reading resource {}", uri);

        if let Some(path) = uri.strip_prefix(TEAM_SEASON_SCHEME) {
            let (team, year) = parse_team_season(path)?;
            let text = team_season_markdown(&team, year, context).await;
            return Ok(McpResourceContents::text(uri, MARKDOWN, text));
        }

        if uri == STAT_DEFINITIONS_URI {
            return Ok(McpResourceContents::text(
                uri,
                MARKDOWN,
                STAT_DEFINITIONS_MARKDOWN,
            ));
        }

        if uri.starts_with(CACHE_SCHEME) {
            if uri != CACHE_STATUS_URI {
                return Err(Error::ResourceNotFound(format!(
                    "Unknown cache resource: {}",
                    uri
                )));
            }
            return Ok(McpResourceContents::text(uri, JSON, cache_status(context)?));
        }

        Err(Error::ResourceNotFound(format!("Unknown resource URI: {}", uri)))
    }
}

fn parse_team_season(path: &str) -> Result<(String, i32)> {
    let parts: Vec<&str> = path.split('/').collect();
    let [team, year] = parts.as_slice() else {
        return Err(Error::validation(
            "team-season URI must be in format team-season://TEAM/YEAR",
        ));
    };
    if team.trim().is_empty() {
        return Err(Error::validation(
            "team-season URI must be in format team-season://TEAM/YEAR",
        ));
    }
    let year = year
        .trim()
        .parse::<i32>()
        .map_err(|_| Error::validation(format!("Invalid year in team-season URI: '{}'", year)))?;
    Ok((normalize_team(team), year))
}

async fn team_season_markdown(team: &str, year: i32, context: &dyn ToolContext) -> String {
    let mut out = format!("# {} {} Season\n\n", team, year);

    match load_team_season(team, year, context).await {
        Ok((stats, schedule)) => {
            out.push_str("## Team Statistics\n\n");
            out.push_str(&table_block(&stats, "No team statistics available."));
            out.push_str("\n## Schedule & Results\n\n");
            if !schedule.is_empty() {
                out.push_str(&format!("Games: {}\n\n", schedule.len()));
            }
            out.push_str(&table_block(&schedule, "No schedule data available."));
        }
        Err(e) => {
            warn!("team-season {}/{} failed: {}", team, year, e);
            out.push_str(&format!("Error generating team-season resource: {}\n", e));
        }
    }
    out
}

async fn load_team_season(
    team: &str,
    year: i32,
    context: &dyn ToolContext,
) -> Result<(Table, Table)> {
    let store = context.store();
    let provider = context.provider();

    let stats = fetch_team_stats(store, provider, team, year, None).await?;
    let schedule = fetch_schedule(
        store,
        provider,
        team,
        &format!("{}-01-01", year),
        &format!("{}-12-31", year),
    )
    .await?;
    Ok((stats, schedule))
}

fn table_block(table: &Table, empty: &str) -> String {
    if table.is_empty() {
        return format!("{}\n", empty);
    }
    match table.to_tsv() {
        Ok(tsv) => format!("```tsv\n{}```\n", tsv),
        Err(e) => format!("Could not render table: {}\n", e),
    }
}

fn cache_status(context: &dyn ToolContext) -> Result<String> {
    let stats = context.store().stats()?;
    let status = json!({
        "cache_location": stats.location,
        "cache_type": stats.backend.as_str(),
        "degraded": stats.degraded,
        "degraded_reason": stats.degraded_reason,
        "entries": stats.entries,
        "total_bytes": stats.total_bytes,
    });
    Ok(serde_json::to_string_pretty(&status)?)
}

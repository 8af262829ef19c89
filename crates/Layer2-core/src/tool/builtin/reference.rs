//! Reference tables that need no upstream call

use super::{parse_input, table_result, year_schema};
use crate::loader::{current_year, validate_year};
use async_trait::async_trait;
use baseball_foundation::{Cell, Result, Table, Tool, ToolContext, ToolMeta, ToolResult};
use serde::Deserialize;
use serde_json::{json, Value};

/// (park, team, HR factor, overall factor)
const PARK_FACTORS: &[(&str, &str, f64, f64)] = &[
    ("Fenway Park", "BOS", 0.96, 1.02),
    ("Yankee Stadium", "NYY", 1.31, 1.15),
    ("Coors Field", "COL", 1.50, 1.25),
    ("Marlins Park", "MIA", 0.80, 0.95),
];

/// The park factor table, optionally narrowed to parks whose name contains
/// `venue` (case-insensitive)
pub fn park_factors(venue: Option<&str>) -> Result<Table> {
    let rows = PARK_FACTORS
        .iter()
        .map(|(park, team, hr, overall)| {
            vec![
                Cell::from(*park),
                Cell::from(*team),
                Cell::from(*hr),
                Cell::from(*overall),
            ]
        })
        .collect();
    let table = Table::from_rows(["Park", "Team", "HR_Factor", "Overall_Factor"], rows)?;

    Ok(match venue.map(str::trim).filter(|v| !v.is_empty()) {
        Some(venue) => {
            let needle = venue.to_lowercase();
            table.filter_rows(|row| {
                row[0]
                    .as_str()
                    .map(|park| park.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
        }
        None => table,
    })
}

#[derive(Debug, Deserialize)]
pub struct ParkFactorsInput {
    #[serde(default)]
    pub year: Option<i32>,

    #[serde(default)]
    pub venue: Option<String>,
}

pub struct ParkFactorsTool;

impl ParkFactorsTool {
    pub const NAME: &'static str = "park_factors";

    pub fn new() -> Self {
        Self
    }
}

impl Default for ParkFactorsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ParkFactorsTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn meta(&self) -> ToolMeta {
        ToolMeta::new(Self::NAME)
            .display_name("Park Factors")
            .description("Get ballpark factors affecting statistics")
            .category("reference")
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "year": year_schema("Year for park factors"),
                "venue": {
                    "type": "string",
                    "description": "Specific venue name (optional)"
                }
            },
            "required": ["year"]
        })
    }

    async fn execute(&self, input: Value, _context: &dyn ToolContext) -> Result<ToolResult> {
        let input: ParkFactorsInput = parse_input(input)?;
        // the factors are not season-specific yet; the year is only checked
        let year = validate_year(input.year.unwrap_or_else(current_year))?;

        let table = park_factors(input.venue.as_deref())?;
        let message = match input.venue.as_deref() {
            Some(venue) => format!("No park factors found for venue '{}'", venue),
            None => "No park factors found".to_string(),
        };
        Ok(table_result(&table, message)?.with_metadata("year", json!(year)))
    }
}

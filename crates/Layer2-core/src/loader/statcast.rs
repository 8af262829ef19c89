//! Statcast pitch events
//!
//! Pitch data is best-effort: an upstream failure is cached as an empty
//! result rather than surfaced. The full pitch table is cached; the
//! `summary` format is computed from it on every read.

use super::{parse_range, read_through, UpstreamErrorPolicy};
use baseball_foundation::{
    BlobStore, CacheKey, Cell, Error, Result, StatcastType, StatsProvider, Table,
};
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Output shape of a Statcast request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatcastFormat {
    /// Per game and player aggregates
    #[default]
    Summary,
    /// Every pitch; `parquet` is accepted as an alias
    #[serde(alias = "parquet")]
    Raw,
}

impl FromStr for StatcastFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(StatcastFormat::Summary),
            "raw" | "parquet" => Ok(StatcastFormat::Raw),
            other => Err(Error::validation(format!(
                "format_type must be 'summary' or 'raw' (got '{}')",
                other
            ))),
        }
    }
}

impl fmt::Display for StatcastFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatcastFormat::Summary => "summary",
            StatcastFormat::Raw => "raw",
        })
    }
}

/// Parameters of one Statcast query
#[derive(Debug, Clone, Default)]
pub struct StatcastRequest<'a> {
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub player_id: Option<i64>,
    pub statcast_type: StatcastType,
    pub format: StatcastFormat,
}

pub async fn fetch_statcast(
    store: &BlobStore,
    provider: &dyn StatsProvider,
    request: &StatcastRequest<'_>,
) -> Result<Table> {
    if request.start_date.trim().is_empty() || request.end_date.trim().is_empty() {
        return Err(Error::validation("Both start_date and end_date are required"));
    }
    let (start, end) = parse_range(request.start_date, request.end_date)?;
    let statcast_type = request.statcast_type;
    let player_id = request.player_id;

    let key = CacheKey::statcast(statcast_type.as_str(), start, end, player_id);
    let pitches = read_through(store, &key, UpstreamErrorPolicy::EmptyFallback, || async {
        match (statcast_type, player_id) {
            (StatcastType::Batter, Some(id)) => provider.statcast_batter(start, end, id).await,
            (StatcastType::Pitcher, Some(id)) => provider.statcast_pitcher(start, end, id).await,
            _ => provider.statcast(start, end).await,
        }
    })
    .await?;

    Ok(match request.format {
        StatcastFormat::Summary => summarize(&pitches),
        StatcastFormat::Raw => pitches,
    })
}

// ============================================================================
// Summary
// ============================================================================

/// (output column, source column, aggregate)
const AGGREGATES: &[(&str, &str, Aggregate)] = &[
    ("avg_exit_velocity", "launch_speed", Aggregate::Mean),
    ("max_exit_velocity", "launch_speed", Aggregate::Max),
    ("avg_launch_angle", "launch_angle", Aggregate::Mean),
    ("avg_xba", "estimated_ba_using_speedangle", Aggregate::Mean),
    ("avg_xwoba", "estimated_woba_using_speedangle", Aggregate::Mean),
];

#[derive(Debug, Clone, Copy)]
enum Aggregate {
    Mean,
    Max,
}

/// Aggregate pitches per (`game_date`, `player_name`, `batter` or `pitcher`).
///
/// Groups are sorted by key; rows with a null key are dropped. Means and
/// maxima skip nulls and non-numeric values; `pitch_count` counts non-null
/// `pitch_type`. A table that cannot be grouped is returned unchanged.
pub fn summarize(pitches: &Table) -> Table {
    if pitches.is_empty() {
        return pitches.clone();
    }
    let Some(pitch_type) = pitches.column_index("pitch_type") else {
        return pitches.clone();
    };

    let player_col = if pitches.has_column("batter") {
        "batter"
    } else {
        "pitcher"
    };
    let group_cols: Vec<(&str, usize)> = ["game_date", "player_name", player_col]
        .into_iter()
        .filter_map(|c| pitches.column_index(c).map(|i| (c, i)))
        .collect();
    if group_cols.is_empty() {
        return pitches.clone();
    }

    let aggregates: Vec<(&str, usize, Aggregate)> = AGGREGATES
        .iter()
        .filter_map(|(out, src, agg)| pitches.column_index(src).map(|i| (*out, i, *agg)))
        .collect();

    let mut groups: Vec<(Vec<Cell>, Vec<&Vec<Cell>>)> = Vec::new();
    let mut slots: HashMap<Vec<KeyPart<'_>>, usize> = HashMap::new();
    for row in pitches.rows() {
        let Some(parts) = group_cols
            .iter()
            .map(|(_, i)| KeyPart::of(&row[*i]))
            .collect::<Option<Vec<_>>>()
        else {
            continue;
        };
        match slots.entry(parts) {
            Entry::Occupied(slot) => groups[*slot.get()].1.push(row),
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                let key = group_cols.iter().map(|(_, i)| row[*i].clone()).collect();
                groups.push((key, vec![row]));
            }
        }
    }
    groups.sort_by(|(a, _), (b, _)| compare_keys(a, b));

    let columns = group_cols
        .iter()
        .map(|(c, _)| *c)
        .chain(aggregates.iter().map(|(out, _, _)| *out))
        .chain(std::iter::once("pitch_count"));
    let mut summary = Table::new(columns);

    for (key, members) in groups {
        let mut row = key;
        for (_, idx, agg) in &aggregates {
            let values: Vec<f64> = members.iter().filter_map(|r| r[*idx].as_f64()).collect();
            row.push(match agg {
                Aggregate::Mean if !values.is_empty() => {
                    Cell::from(values.iter().sum::<f64>() / values.len() as f64)
                }
                Aggregate::Max => values
                    .iter()
                    .copied()
                    .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
                    .map(Cell::from)
                    .unwrap_or(Cell::Null),
                Aggregate::Mean => Cell::Null,
            });
        }
        let count = members.iter().filter(|r| !r[pitch_type].is_null()).count();
        row.push(Cell::Int(count as i64));

        if summary.push_row(row).is_err() {
            return pitches.clone();
        }
    }

    summary
}

/// Hashable view of a non-null group cell; floats by bit pattern
#[derive(PartialEq, Eq, Hash)]
enum KeyPart<'a> {
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(&'a str),
}

impl<'a> KeyPart<'a> {
    fn of(cell: &'a Cell) -> Option<Self> {
        match cell {
            Cell::Null => None,
            Cell::Bool(b) => Some(KeyPart::Bool(*b)),
            Cell::Int(i) => Some(KeyPart::Int(*i)),
            Cell::Float(f) => Some(KeyPart::Float(f.to_bits())),
            Cell::Text(s) => Some(KeyPart::Text(s)),
        }
    }
}

fn compare_keys(a: &[Cell], b: &[Cell]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

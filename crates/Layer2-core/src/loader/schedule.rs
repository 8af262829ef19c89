//! Team schedule and results over a date range

use super::dates::infer_date;
use super::{parse_range, read_through, UpstreamErrorPolicy, DATE_FORMAT};
use baseball_foundation::{
    normalize_team, BlobStore, CacheKey, Cell, Error, Result, StatsProvider, Table,
};
use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// Games for `team` between `start_date` and `end_date`, inclusive.
///
/// The whole season is fetched, its `Date` labels rewritten as `YYYY-MM-DD`
/// (or `Null` when no date can be inferred), then filtered to the range.
/// Both dates must fall in the same season.
pub async fn fetch_schedule(
    store: &BlobStore,
    provider: &dyn StatsProvider,
    team: &str,
    start_date: &str,
    end_date: &str,
) -> Result<Table> {
    let team = team.trim();
    if team.is_empty() {
        return Err(Error::validation("team abbreviation is required"));
    }
    let (start, end) = parse_range(start_date, end_date)?;
    let season = start.year();
    if end.year() != season {
        return Err(Error::validation(
            "start_date and end_date must be within the same season",
        ));
    }
    let code = normalize_team(team);

    let key = CacheKey::schedule(&code, start, end);
    read_through(store, &key, UpstreamErrorPolicy::Propagate, || async {
        let season_table = provider.schedule_and_record(season, &code).await?;
        games_in_range(season_table, season, start, end)
    })
    .await
}

/// Normalise `Date` against `season` and keep rows inside `[start, end]`
fn games_in_range(
    mut table: Table,
    season: i32,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Table> {
    if table.columns().is_empty() {
        return Ok(table);
    }

    let mut unknown = 0usize;
    let normalised = table.map_column("Date", |cell| match cell.as_str() {
        Some(label) => match infer_date(label, season) {
            Some(date) => Cell::from(date.format(DATE_FORMAT).to_string()),
            None => {
                unknown += 1;
                Cell::Null
            }
        },
        None => Cell::Null,
    });
    if !normalised {
        return Err(Error::Provider("schedule has no Date column".to_string()));
    }
    if unknown > 0 {
        debug!("{} schedule rows have no usable date", unknown);
    }

    let Some(idx) = table.column_index("Date") else {
        return Ok(table);
    };
    Ok(table.filter_rows(|row| {
        row[idx]
            .as_str()
            .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
            .map(|d| start <= d && d <= end)
            .unwrap_or(false)
    }))
}

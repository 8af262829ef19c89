//! Loaders - read-through/write-through access to each data kind
//!
//! Every loader follows the same shape:
//!
//! ```text
//! validate ──► CacheKey ──► BlobStore.get ── hit ──► decode ──► Table
//!                               │ miss / Malformed / read error
//!                               ▼
//!                      StatsProvider fetch ──► normalise
//!                               │ Err: UpstreamErrorPolicy
//!                               ▼
//!                      encode ──► BlobStore.set ──► Table
//! ```
//!
//! Validation happens before the store or the upstream is touched.
//! Empty results are cached like any other value.

mod dates;
mod players;
mod schedule;
mod standings;
mod statcast;
mod teams;

pub use dates::infer_date;
pub use players::fetch_player_stats;
pub use schedule::fetch_schedule;
pub use standings::fetch_standings;
pub use statcast::{fetch_statcast, summarize, StatcastFormat, StatcastRequest};
pub use teams::fetch_team_stats;

use baseball_foundation::table::codec::{self, DecodeResult};
use baseball_foundation::{BlobStore, CacheKey, Error, Result, Table};
use chrono::{Datelike, NaiveDate, Utc};
use std::future::Future;
use tracing::{debug, warn};

/// Earliest season with recorded statistics
pub const MIN_YEAR: i32 = 1871;

/// Date format accepted from callers and used in cache keys
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// What a loader does when the upstream fetch fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorPolicy {
    /// Return `Error::Upstream` to the caller; nothing is cached
    Propagate,

    /// Log, then cache and return an empty table
    EmptyFallback,
}

/// Serve `key` from the store, or run `fetch` and store its result.
///
/// Store failures never fail the call: a read error is a miss and a write
/// error is logged. A blob that no longer decodes is refetched.
pub async fn read_through<F, Fut>(
    store: &BlobStore,
    key: &CacheKey,
    policy: UpstreamErrorPolicy,
    fetch: F,
) -> Result<Table>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Table>>,
{
    let key_str = key.to_string();

    match store.get_async(&key_str).await {
        Ok(Some(blob)) => match codec::decode(&blob) {
            DecodeResult::Table(table) => {
                debug!("Cache hit: {} ({} rows)", key_str, table.len());
                return Ok(table);
            }
            DecodeResult::Malformed(reason) => {
                warn!("Discarding unreadable cache entry {}: {}", key_str, reason);
            }
        },
        Ok(None) => debug!("Cache miss: {}", key_str),
        Err(e) => warn!("Cache read failed for {}, fetching: {}", key_str, e),
    }

    let table = match fetch().await {
        Ok(table) => table,
        Err(e) => match policy {
            UpstreamErrorPolicy::Propagate => {
                return Err(Error::upstream(key.kind(), key_str, e));
            }
            UpstreamErrorPolicy::EmptyFallback => {
                warn!("Upstream failed for {}, caching empty result: {}", key_str, e);
                Table::empty()
            }
        },
    };

    match codec::encode(&table) {
        Ok(blob) => {
            if let Err(e) = store.set_async(&key_str, blob).await {
                warn!("Cache write failed for {}: {}", key_str, e);
            }
        }
        Err(e) => warn!("Could not encode {} for caching: {}", key_str, e),
    }

    Ok(table)
}

// ============================================================================
// Validation helpers
// ============================================================================

/// Season used when the caller leaves the year out
pub fn current_year() -> i32 {
    Utc::now().year()
}

pub fn validate_year(year: i32) -> Result<i32> {
    if year < MIN_YEAR {
        return Err(Error::validation(format!(
            "year must be {} or later",
            MIN_YEAR
        )));
    }
    Ok(year)
}

/// Parse a caller-supplied `YYYY-MM-DD` date; `field` names it in the error
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::validation(format!("{} is required", field)));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
        Error::validation(format!(
            "{} must be a date in YYYY-MM-DD format (got '{}')",
            field, raw
        ))
    })
}

/// Parse both ends of a range and reject `end < start`
pub fn parse_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate)> {
    let start = parse_date("start_date", start)?;
    let end = parse_date("end_date", end)?;
    if end < start {
        return Err(Error::validation("end_date must be on or after start_date"));
    }
    Ok((start, end))
}

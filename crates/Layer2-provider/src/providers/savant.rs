//! Baseball Savant client (pitch-level Statcast search export)
//!
//! The search endpoint answers with CSV. All-player searches are split into
//! one request per day because the export truncates large result sets.

use crate::error::ProviderError;
use crate::retry::{with_retry, RetryConfig};
use baseball_foundation::{Cell, Table};
use chrono::NaiveDate;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const SEARCH_PATH: &str = "/statcast_search/csv";

/// Day requests in flight at once for all-player searches
const DAY_CONCURRENCY: usize = 4;

/// Which players a search is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerFilter {
    All,
    Batter(i64),
    Pitcher(i64),
}

impl PlayerFilter {
    fn player_type(&self) -> &'static str {
        match self {
            PlayerFilter::Pitcher(_) => "pitcher",
            _ => "batter",
        }
    }

    fn lookup(&self) -> Option<(&'static str, String)> {
        match self {
            PlayerFilter::All => None,
            PlayerFilter::Batter(id) => Some(("batters_lookup[]", id.to_string())),
            PlayerFilter::Pitcher(id) => Some(("pitchers_lookup[]", id.to_string())),
        }
    }
}

/// Parse a search export into a table.
///
/// Values are typed with `Cell::parse_scalar`; short rows are padded with
/// `Null`, extra fields dropped. An empty body is an empty table.
pub fn parse_search_csv(body: &str) -> Result<Table, ProviderError> {
    let body = body.trim_start_matches('\u{feff}');
    if body.trim().is_empty() {
        return Ok(Table::empty());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ProviderError::ParseError(format!("CSV header: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let width = headers.len();
    let mut table = Table::new(headers);

    for record in reader.records() {
        let record = record.map_err(|e| ProviderError::ParseError(format!("CSV row: {}", e)))?;
        let mut row: Vec<Cell> = record.iter().take(width).map(Cell::parse_scalar).collect();
        row.resize(width, Cell::Null);
        table
            .push_row(row)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
    }

    Ok(table)
}

/// HTTP client for baseballsavant.mlb.com
pub struct SavantClient {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl SavantClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        retry: RetryConfig,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("baseball-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry,
        })
    }

    /// Pitch events between `start` and `end`, inclusive
    pub async fn search(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        filter: PlayerFilter,
    ) -> Result<Table, ProviderError> {
        if filter != PlayerFilter::All {
            return self.search_window(start, end, filter).await;
        }

        let days: Vec<NaiveDate> = start.iter_days().take_while(|day| *day <= end).collect();
        debug!("Statcast search split into {} day requests", days.len());

        let chunks: Vec<Table> = stream::iter(days)
            .map(|day| self.search_window(day, day, filter))
            .buffered(DAY_CONCURRENCY)
            .try_collect()
            .await?;
        Ok(Table::concat(chunks))
    }

    async fn search_window(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        filter: PlayerFilter,
    ) -> Result<Table, ProviderError> {
        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let mut query = vec![
            ("all", "true".to_string()),
            ("type", "details".to_string()),
            ("hfGT", "R|".to_string()),
            ("player_type", filter.player_type().to_string()),
            ("game_date_gt", start.format("%Y-%m-%d").to_string()),
            ("game_date_lt", end.format("%Y-%m-%d").to_string()),
        ];
        if let Some(lookup) = filter.lookup() {
            query.push(lookup);
        }
        debug!("GET {} {:?}", url, query);

        let body = with_retry(&self.retry, "statcast_search", || async {
            let response = self.client.get(&url).query(&query).send().await?;
            if !response.status().is_success() {
                return Err(ProviderError::from_response(response).await);
            }
            Ok(response.text().await?)
        })
        .await?;

        parse_search_csv(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_csv() {
        let body = "\u{feff}pitch_type,game_date,player_name,batter,launch_speed,description\n\
                    FF,2024-04-01,\"Judge, Aaron\",592450,101.3,hit_into_play\n\
                    SL,2024-04-01,\"Judge, Aaron\",592450,,swinging_strike\n";

        let table = parse_search_csv(body).unwrap();
        assert_eq!(table.columns()[0], "pitch_type");
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, "player_name"), Some(&Cell::from("Judge, Aaron")));
        assert_eq!(table.cell(0, "batter"), Some(&Cell::Int(592450)));
        assert_eq!(table.cell(0, "launch_speed"), Some(&Cell::Float(101.3)));
        assert_eq!(table.cell(1, "launch_speed"), Some(&Cell::Null));
        assert_eq!(table.cell(0, "game_date"), Some(&Cell::from("2024-04-01")));
    }

    #[test]
    fn test_parse_header_only_and_empty() {
        let table = parse_search_csv("pitch_type,game_date\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 2);

        assert_eq!(parse_search_csv("").unwrap(), Table::empty());
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let table = parse_search_csv("a,b,c\n1,2\n1,2,3,4\n").unwrap();
        assert_eq!(table.cell(0, "c"), Some(&Cell::Null));
        assert_eq!(table.cell(1, "c"), Some(&Cell::Int(3)));
    }

    #[test]
    fn test_player_filter_query() {
        assert_eq!(PlayerFilter::Pitcher(1).player_type(), "pitcher");
        assert_eq!(
            PlayerFilter::Batter(592450).lookup(),
            Some(("batters_lookup[]", "592450".to_string()))
        );
        assert_eq!(PlayerFilter::All.lookup(), None);
    }
}

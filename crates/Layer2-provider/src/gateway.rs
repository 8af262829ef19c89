//! Stats Gateway - the live `StatsProvider`
//!
//! Routes each fetch to the service that has the data: season stats,
//! schedules and standings go to the MLB Stats API; pitch events go to
//! Baseball Savant. Team directories are kept per season for the life of
//! the gateway since team ids and codes only change between seasons.

use crate::providers::mlb_stats::{MlbStatsClient, TeamDirectory};
use crate::providers::savant::{PlayerFilter, SavantClient};
use crate::retry::RetryConfig;
use async_trait::async_trait;
use baseball_foundation::{
    normalize_team, DivisionStandings, Error, Result, StatsProvider, Table, UpstreamConfig,
};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

pub const GATEWAY_NAME: &str = "mlb-stats+savant";

pub struct StatsGateway {
    mlb: MlbStatsClient,
    savant: SavantClient,
    directories: RwLock<HashMap<i32, TeamDirectory>>,
}

impl StatsGateway {
    /// Build both clients from the upstream settings
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let retry = RetryConfig::from_upstream(config);

        Ok(Self {
            mlb: MlbStatsClient::new(&config.mlb_stats_api_url, timeout, retry.clone())?,
            savant: SavantClient::new(&config.savant_url, timeout, retry)?,
            directories: RwLock::new(HashMap::new()),
        })
    }

    /// Team directory for `season`, fetched once
    async fn directory(&self, season: i32) -> Result<TeamDirectory> {
        if let Some(directory) = self.directories.read().await.get(&season) {
            return Ok(directory.clone());
        }

        let directory = self.mlb.team_directory(season).await?;
        debug!("Loaded {} teams for {}", directory.len(), season);
        self.directories
            .write()
            .await
            .insert(season, directory.clone());
        Ok(directory)
    }
}

/// Rows whose `Team` matches `team` (alias-aware)
pub fn filter_team(table: &Table, team: &str) -> Table {
    let code = normalize_team(team);
    let Some(idx) = table.column_index("Team") else {
        return table.clone();
    };
    table.filter_rows(|row| {
        row[idx]
            .as_str()
            .map(|t| normalize_team(t) == code)
            .unwrap_or(false)
    })
}

#[async_trait]
impl StatsProvider for StatsGateway {
    fn name(&self) -> &str {
        GATEWAY_NAME
    }

    async fn batting_stats(&self, year: i32) -> Result<Table> {
        let teams = self.directory(year).await?;
        Ok(self.mlb.season_hitting(year, &teams).await?)
    }

    async fn team_batting(&self, year: i32, team: Option<&str>) -> Result<Table> {
        let teams = self.directory(year).await?;
        let table = self.mlb.team_hitting(year, &teams).await?;
        Ok(match team {
            Some(team) => filter_team(&table, team),
            None => table,
        })
    }

    async fn schedule_and_record(&self, season: i32, team: &str) -> Result<Table> {
        let teams = self.directory(season).await?;
        let info = teams.by_code(team).cloned().ok_or_else(|| {
            Error::Provider(format!("No team with code '{}' in {}", team, season))
        })?;
        Ok(self.mlb.schedule(season, &info, &teams).await?)
    }

    async fn statcast(&self, start: NaiveDate, end: NaiveDate) -> Result<Table> {
        Ok(self.savant.search(start, end, PlayerFilter::All).await?)
    }

    async fn statcast_batter(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        player_id: i64,
    ) -> Result<Table> {
        Ok(self
            .savant
            .search(start, end, PlayerFilter::Batter(player_id))
            .await?)
    }

    async fn statcast_pitcher(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        player_id: i64,
    ) -> Result<Table> {
        Ok(self
            .savant
            .search(start, end, PlayerFilter::Pitcher(player_id))
            .await?)
    }

    async fn standings(
        &self,
        year: i32,
        date: Option<NaiveDate>,
    ) -> Result<Vec<DivisionStandings>> {
        Ok(self.mlb.standings(year, date).await?)
    }
}

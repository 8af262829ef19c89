//! Test doubles shared by the unit tests

use async_trait::async_trait;
use baseball_foundation::{
    Cell, DivisionStandings, Error, Result, StatsProvider, Table,
};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Build a table from literal columns and rows
pub fn table(columns: &[&str], rows: Vec<Vec<Cell>>) -> Table {
    Table::from_rows(columns.iter().copied(), rows).unwrap()
}

/// Upstream stand-in that serves fixed tables and counts calls per method.
///
/// Method names are the `StatsProvider` method names, except that
/// `team_batting` without a team is recorded as `team_batting_all`.
/// Methods without a configured table return an empty table.
#[derive(Default)]
pub struct StubProvider {
    tables: HashMap<&'static str, Table>,
    standings: Vec<DivisionStandings>,
    failing: HashSet<&'static str>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, method: &'static str, table: Table) -> Self {
        self.tables.insert(method, table);
        self
    }

    pub fn with_standings(mut self, divisions: Vec<DivisionStandings>) -> Self {
        self.standings = divisions;
        self
    }

    /// Make `method` return an HTTP error
    pub fn failing(mut self, method: &'static str) -> Self {
        self.failing.insert(method);
        self
    }

    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn serve(&self, method: &'static str) -> Result<Table> {
        *self.calls.lock().unwrap().entry(method).or_insert(0) += 1;
        if self.failing.contains(method) {
            return Err(Error::Http(format!("{} unavailable", method)));
        }
        Ok(self.tables.get(method).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl StatsProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn batting_stats(&self, _year: i32) -> Result<Table> {
        self.serve("batting_stats")
    }

    async fn team_batting(&self, _year: i32, team: Option<&str>) -> Result<Table> {
        match team {
            Some(_) => self.serve("team_batting"),
            None => self.serve("team_batting_all"),
        }
    }

    async fn schedule_and_record(&self, _season: i32, _team: &str) -> Result<Table> {
        self.serve("schedule_and_record")
    }

    async fn statcast(&self, _start: NaiveDate, _end: NaiveDate) -> Result<Table> {
        self.serve("statcast")
    }

    async fn statcast_batter(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
        _player_id: i64,
    ) -> Result<Table> {
        self.serve("statcast_batter")
    }

    async fn statcast_pitcher(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
        _player_id: i64,
    ) -> Result<Table> {
        self.serve("statcast_pitcher")
    }

    async fn standings(
        &self,
        _year: i32,
        _date: Option<NaiveDate>,
    ) -> Result<Vec<DivisionStandings>> {
        self.serve("standings")?;
        Ok(self.standings.clone())
    }
}

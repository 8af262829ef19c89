//! MLB Stats API client (statsapi.mlb.com)
//!
//! Fetches season hitting lines, team hitting, schedules and standings and
//! turns the JSON into tables. Conversion functions are pure so they can be
//! tested against captured payloads.

use crate::error::ProviderError;
use crate::retry::{with_retry, RetryConfig};
use baseball_foundation::{normalize_team, Cell, DivisionStandings, Table};
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// MLB's own sport id for the major leagues
const SPORT_ID_MLB: &str = "1";

/// American League, National League
const LEAGUE_IDS: &str = "103,104";

/// MLB abbreviations that differ from the canonical codes beyond the shared aliases
const MLB_ABBREVIATION_OVERRIDES: &[(&str, &str)] = &[("AZ", "ARI"), ("ATH", "OAK")];

pub const BATTING_COLUMNS: &[&str] = &[
    "Season", "Name", "Team", "MLBAMID", "G", "PA", "AB", "R", "H", "2B", "3B", "HR", "RBI", "SB",
    "BB", "SO", "AVG", "OBP", "SLG", "OPS",
];

pub const TEAM_BATTING_COLUMNS: &[&str] = &[
    "Season", "Team", "TeamName", "G", "PA", "AB", "R", "H", "2B", "3B", "HR", "RBI", "SB", "BB",
    "SO", "AVG", "OBP", "SLG", "OPS",
];

pub const SCHEDULE_COLUMNS: &[&str] = &[
    "Date", "Tm", "Home_Away", "Opp", "W/L", "R", "RA", "Status", "Venue", "GamePk",
];

pub const STANDINGS_COLUMNS: &[&str] = &["Tm", "W", "L", "W-L%", "GB", "Rank", "Strk", "RS", "RA"];

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct TeamRef {
    id: i64,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Named {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlayerRef {
    id: i64,
    #[serde(rename = "fullName")]
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct TeamsResponse {
    #[serde(default)]
    teams: Vec<TeamEntry>,
}

#[derive(Debug, Deserialize)]
struct TeamEntry {
    id: i64,
    name: String,
    #[serde(default)]
    abbreviation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(default)]
    stats: Vec<StatGroup>,
}

#[derive(Debug, Deserialize)]
struct StatGroup {
    #[serde(default)]
    splits: Vec<StatSplit>,
}

#[derive(Debug, Deserialize)]
struct StatSplit {
    #[serde(default)]
    season: Option<String>,
    #[serde(default)]
    stat: HittingLine,
    #[serde(default)]
    team: Option<TeamRef>,
    #[serde(default)]
    player: Option<PlayerRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct HittingLine {
    games_played: Option<i64>,
    plate_appearances: Option<i64>,
    at_bats: Option<i64>,
    runs: Option<i64>,
    hits: Option<i64>,
    doubles: Option<i64>,
    triples: Option<i64>,
    home_runs: Option<i64>,
    rbi: Option<i64>,
    stolen_bases: Option<i64>,
    base_on_balls: Option<i64>,
    strike_outs: Option<i64>,
    avg: Option<String>,
    obp: Option<String>,
    slg: Option<String>,
    ops: Option<String>,
}

impl HittingLine {
    /// Counting and rate cells in column order, from `G` through `OPS`
    fn cells(&self) -> Vec<Cell> {
        let rate = |v: &Option<String>| v.as_deref().map(Cell::parse_scalar).unwrap_or(Cell::Null);
        vec![
            self.games_played.into(),
            self.plate_appearances.into(),
            self.at_bats.into(),
            self.runs.into(),
            self.hits.into(),
            self.doubles.into(),
            self.triples.into(),
            self.home_runs.into(),
            self.rbi.into(),
            self.stolen_bases.into(),
            self.base_on_balls.into(),
            self.strike_outs.into(),
            rate(&self.avg),
            rate(&self.obp),
            rate(&self.slg),
            rate(&self.ops),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    #[serde(default)]
    dates: Vec<ScheduleDate>,
}

#[derive(Debug, Deserialize)]
struct ScheduleDate {
    date: String,
    #[serde(default)]
    games: Vec<ScheduledGame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduledGame {
    game_pk: i64,
    #[serde(default)]
    official_date: Option<String>,
    #[serde(default)]
    status: GameStatus,
    teams: GameTeams,
    #[serde(default)]
    venue: Option<Named>,
    #[serde(default)]
    game_number: Option<i64>,
    #[serde(default)]
    double_header: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GameStatus {
    abstract_game_state: Option<String>,
    detailed_state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GameTeams {
    away: GameSide,
    home: GameSide,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameSide {
    team: TeamRef,
    #[serde(default)]
    score: Option<i64>,
    #[serde(default)]
    is_winner: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct StandingsResponse {
    #[serde(default)]
    records: Vec<StandingsRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StandingsRecord {
    #[serde(default)]
    division: Option<Named>,
    #[serde(default)]
    team_records: Vec<TeamRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamRecord {
    team: TeamRef,
    wins: i64,
    losses: i64,
    #[serde(default)]
    winning_percentage: Option<String>,
    #[serde(default)]
    games_back: Option<String>,
    #[serde(default)]
    division_rank: Option<String>,
    #[serde(default)]
    streak: Option<Streak>,
    #[serde(default)]
    runs_scored: Option<i64>,
    #[serde(default)]
    runs_allowed: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Streak {
    #[serde(default)]
    streak_code: Option<String>,
}

// ============================================================================
// Team directory
// ============================================================================

/// One franchise as listed for a season
#[derive(Debug, Clone, PartialEq)]
pub struct TeamInfo {
    pub id: i64,
    /// Canonical code (see `normalize_team`)
    pub code: String,
    pub name: String,
}

/// Franchise lookups by id or code
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    teams: Vec<TeamInfo>,
}

impl TeamDirectory {
    pub fn new(teams: Vec<TeamInfo>) -> Self {
        Self { teams }
    }

    pub fn by_id(&self, id: i64) -> Option<&TeamInfo> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// `code` may be an alias
    pub fn by_code(&self, code: &str) -> Option<&TeamInfo> {
        let code = normalize_team(code);
        self.teams.iter().find(|t| t.code == code)
    }

    /// Code for a team reference, falling back to its name
    fn code_for(&self, team: &TeamRef) -> Cell {
        match self.by_id(team.id) {
            Some(info) => Cell::from(info.code.as_str()),
            None => Cell::from(team.name.clone()),
        }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// MLB abbreviation → canonical code
pub fn canonical_code(abbreviation: &str) -> String {
    let upper = abbreviation.trim().to_uppercase();
    let overridden = MLB_ABBREVIATION_OVERRIDES
        .iter()
        .find(|(mlb, _)| *mlb == upper)
        .map(|(_, code)| code.to_string())
        .unwrap_or(upper);
    normalize_team(&overridden)
}

pub fn parse_team_directory(body: &str) -> Result<TeamDirectory, ProviderError> {
    let response: TeamsResponse = parse_json(body)?;
    Ok(TeamDirectory::new(
        response
            .teams
            .into_iter()
            .filter_map(|t| {
                let abbreviation = t.abbreviation?;
                Some(TeamInfo {
                    id: t.id,
                    code: canonical_code(&abbreviation),
                    name: t.name,
                })
            })
            .collect(),
    ))
}

// ============================================================================
// Conversions
// ============================================================================

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::ParseError(e.to_string()))
}

fn season_cell(split: &StatSplit, fallback: i32) -> Cell {
    split
        .season
        .as_deref()
        .map(Cell::parse_scalar)
        .unwrap_or(Cell::Int(fallback as i64))
}

/// Player season hitting → one row per player
pub fn batting_table(body: &str, season: i32, teams: &TeamDirectory) -> Result<Table, ProviderError> {
    let response: StatsResponse = parse_json(body)?;
    let mut table = Table::new(BATTING_COLUMNS.iter().copied());

    for split in response.stats.iter().flat_map(|g| g.splits.iter()) {
        let Some(player) = &split.player else {
            continue;
        };

        let mut row = vec![
            season_cell(split, season),
            Cell::from(player.full_name.as_str()),
            split.team.as_ref().map(|t| teams.code_for(t)).unwrap_or(Cell::Null),
            Cell::Int(player.id),
        ];
        row.extend(split.stat.cells());
        table
            .push_row(row)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
    }

    Ok(table)
}

/// Team season hitting → one row per team
pub fn team_batting_table(
    body: &str,
    season: i32,
    teams: &TeamDirectory,
) -> Result<Table, ProviderError> {
    let response: StatsResponse = parse_json(body)?;
    let mut table = Table::new(TEAM_BATTING_COLUMNS.iter().copied());

    for split in response.stats.iter().flat_map(|g| g.splits.iter()) {
        let Some(team) = &split.team else {
            continue;
        };

        let mut row = vec![
            season_cell(split, season),
            teams.code_for(team),
            Cell::from(team.name.clone()),
        ];
        row.extend(split.stat.cells());
        table
            .push_row(row)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
    }

    Ok(table)
}

/// Label in the style of box-score listings: `Thursday, Mar 28`, with
/// ` (n)` appended for games of a double-header
fn schedule_label(date: NaiveDate, game: &ScheduledGame) -> String {
    let label = date.format("%A, %b %-d").to_string();
    let double_header = game
        .double_header
        .as_deref()
        .map(|d| d != "N")
        .unwrap_or(false);
    match (double_header, game.game_number) {
        (true, Some(n)) => format!("{} ({})", label, n),
        _ => label,
    }
}

/// A season schedule seen from `team_id`'s side
pub fn schedule_table(
    body: &str,
    team_id: i64,
    teams: &TeamDirectory,
) -> Result<Table, ProviderError> {
    let response: ScheduleResponse = parse_json(body)?;
    let mut table = Table::new(SCHEDULE_COLUMNS.iter().copied());

    for day in &response.dates {
        for game in &day.games {
            let (us, them, home_away) = if game.teams.home.team.id == team_id {
                (&game.teams.home, &game.teams.away, "")
            } else if game.teams.away.team.id == team_id {
                (&game.teams.away, &game.teams.home, "@")
            } else {
                continue;
            };

            let raw_date = game.official_date.as_deref().unwrap_or(&day.date);
            let date = match NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") {
                Ok(date) => Cell::from(schedule_label(date, game)),
                Err(_) => Cell::from(raw_date),
            };

            let final_state = game.status.abstract_game_state.as_deref() == Some("Final");
            let result = match (final_state, us.is_winner) {
                (true, Some(true)) => Cell::from("W"),
                (true, Some(false)) => Cell::from("L"),
                _ => Cell::Null,
            };

            table
                .push_row(vec![
                    date,
                    teams.code_for(&us.team),
                    Cell::from(home_away),
                    teams.code_for(&them.team),
                    result,
                    us.score.into(),
                    them.score.into(),
                    Cell::from(game.status.detailed_state.clone()),
                    Cell::from(game.venue.as_ref().and_then(|v| v.name.clone())),
                    Cell::Int(game.game_pk),
                ])
                .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        }
    }

    Ok(table)
}

/// One table per division record
pub fn standings_tables(body: &str) -> Result<Vec<DivisionStandings>, ProviderError> {
    let response: StandingsResponse = parse_json(body)?;
    let mut divisions = Vec::with_capacity(response.records.len());

    for record in response.records {
        let mut table = Table::new(STANDINGS_COLUMNS.iter().copied());
        for tr in &record.team_records {
            let text = |v: &Option<String>| v.as_deref().map(Cell::parse_scalar).unwrap_or(Cell::Null);
            table
                .push_row(vec![
                    Cell::from(tr.team.name.clone()),
                    Cell::Int(tr.wins),
                    Cell::Int(tr.losses),
                    text(&tr.winning_percentage),
                    text(&tr.games_back),
                    text(&tr.division_rank),
                    Cell::from(tr.streak.as_ref().and_then(|s| s.streak_code.clone())),
                    tr.runs_scored.into(),
                    tr.runs_allowed.into(),
                ])
                .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        }

        let division = record
            .division
            .and_then(|d| d.name)
            .unwrap_or_default();
        divisions.push(DivisionStandings::new(division, table));
    }

    Ok(divisions)
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client for statsapi.mlb.com
pub struct MlbStatsClient {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl MlbStatsClient {
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

    /// GET `path` with retry; returns the body of a successful response
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        with_retry(&self.retry, path, || async {
            let response = self.client.get(&url).query(query).send().await?;
            if !response.status().is_success() {
                return Err(ProviderError::from_response(response).await);
            }
            Ok(response.text().await?)
        })
        .await
    }

    pub async fn team_directory(&self, season: i32) -> Result<TeamDirectory, ProviderError> {
        let body = self
            .get(
                "/api/v1/teams",
                &[("sportId", SPORT_ID_MLB.to_string()), ("season", season.to_string())],
            )
            .await?;
        parse_team_directory(&body)
    }

    pub async fn season_hitting(
        &self,
        season: i32,
        teams: &TeamDirectory,
    ) -> Result<Table, ProviderError> {
        let body = self
            .get(
                "/api/v1/stats",
                &[
                    ("stats", "season".to_string()),
                    ("group", "hitting".to_string()),
                    ("season", season.to_string()),
                    ("sportIds", SPORT_ID_MLB.to_string()),
                    ("playerPool", "ALL".to_string()),
                    ("limit", "5000".to_string()),
                ],
            )
            .await?;
        batting_table(&body, season, teams)
    }

    pub async fn team_hitting(
        &self,
        season: i32,
        teams: &TeamDirectory,
    ) -> Result<Table, ProviderError> {
        let body = self
            .get(
                "/api/v1/teams/stats",
                &[
                    ("stats", "season".to_string()),
                    ("group", "hitting".to_string()),
                    ("season", season.to_string()),
                    ("sportIds", SPORT_ID_MLB.to_string()),
                ],
            )
            .await?;
        team_batting_table(&body, season, teams)
    }

    pub async fn schedule(
        &self,
        season: i32,
        team: &TeamInfo,
        teams: &TeamDirectory,
    ) -> Result<Table, ProviderError> {
        let body = self
            .get(
                "/api/v1/schedule",
                &[
                    ("sportId", SPORT_ID_MLB.to_string()),
                    ("season", season.to_string()),
                    ("teamId", team.id.to_string()),
                    ("gameType", "R".to_string()),
                ],
            )
            .await?;
        schedule_table(&body, team.id, teams)
    }

    pub async fn standings(
        &self,
        season: i32,
        date: Option<NaiveDate>,
    ) -> Result<Vec<DivisionStandings>, ProviderError> {
        let mut query = vec![
            ("leagueId", LEAGUE_IDS.to_string()),
            ("season", season.to_string()),
            ("standingsTypes", "regularSeason".to_string()),
            ("hydrate", "division".to_string()),
        ];
        if let Some(date) = date {
            query.push(("date", date.format("%m/%d/%Y").to_string()));
        }

        let body = self.get("/api/v1/standings", &query).await?;
        standings_tables(&body)
    }
}

//! Cache key policy
//!
//! Keys are colon-delimited: kind first, then the identifying parameters.
//! Identifiers that callers may type in any case are folded before the key
//! is built so equivalent requests share an entry.

use super::teams::normalize_team;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Segment used when no split was requested
const DEFAULT_SPLIT: &str = "default";

/// The data kinds that are cached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    PlayerStats,
    TeamStats,
    Schedule,
    Statcast,
    Standings,
}

impl DataKind {
    /// Key prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            DataKind::PlayerStats => "player_stats",
            DataKind::TeamStats => "team_stats",
            DataKind::Schedule => "schedule",
            DataKind::Statcast => "statcast",
            DataKind::Standings => "standings",
        }
    }

    /// Human-readable label for messages
    pub fn label(&self) -> &'static str {
        match self {
            DataKind::PlayerStats => "player stats",
            DataKind::TeamStats => "team stats",
            DataKind::Schedule => "schedule",
            DataKind::Statcast => "statcast data",
            DataKind::Standings => "standings",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fully-specified cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    PlayerStats {
        name: String,
        year: i32,
        split: Option<String>,
    },
    TeamStats {
        team: String,
        year: i32,
        split: Option<String>,
    },
    Schedule {
        team: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    Statcast {
        statcast_type: String,
        start: NaiveDate,
        end: NaiveDate,
        player_id: Option<i64>,
    },
    Standings {
        year: i32,
        date: Option<NaiveDate>,
    },
}

impl CacheKey {
    pub fn player_stats(name: &str, year: i32, split: Option<&str>) -> Self {
        CacheKey::PlayerStats {
            name: name.trim().to_string(),
            year,
            split: split.map(str::to_string),
        }
    }

    /// `team` may be an alias; the key always carries the canonical code
    pub fn team_stats(team: &str, year: i32, split: Option<&str>) -> Self {
        CacheKey::TeamStats {
            team: normalize_team(team),
            year,
            split: split.map(str::to_string),
        }
    }

    pub fn schedule(team: &str, start: NaiveDate, end: NaiveDate) -> Self {
        CacheKey::Schedule {
            team: normalize_team(team),
            start,
            end,
        }
    }

    pub fn statcast(
        statcast_type: &str,
        start: NaiveDate,
        end: NaiveDate,
        player_id: Option<i64>,
    ) -> Self {
        CacheKey::Statcast {
            statcast_type: statcast_type.trim().to_lowercase(),
            start,
            end,
            player_id,
        }
    }

    pub fn standings(year: i32, date: Option<NaiveDate>) -> Self {
        CacheKey::Standings { year, date }
    }

    pub fn kind(&self) -> DataKind {
        match self {
            CacheKey::PlayerStats { .. } => DataKind::PlayerStats,
            CacheKey::TeamStats { .. } => DataKind::TeamStats,
            CacheKey::Schedule { .. } => DataKind::Schedule,
            CacheKey::Statcast { .. } => DataKind::Statcast,
            CacheKey::Standings { .. } => DataKind::Standings,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.kind().prefix();
        match self {
            CacheKey::PlayerStats { name, year, split } => write!(
                f,
                "{}:{}:{}:{}",
                prefix,
                name.to_lowercase(),
                year,
                split.as_deref().unwrap_or(DEFAULT_SPLIT)
            ),
            CacheKey::TeamStats { team, year, split } => write!(
                f,
                "{}:{}:{}:{}",
                prefix,
                team.to_uppercase(),
                year,
                split.as_deref().unwrap_or(DEFAULT_SPLIT)
            ),
            CacheKey::Schedule { team, start, end } => write!(
                f,
                "{}:{}:{}:{}",
                prefix,
                team.to_uppercase(),
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ),
            CacheKey::Statcast {
                statcast_type,
                start,
                end,
                player_id,
            } => {
                write!(
                    f,
                    "{}:{}:{}:{}",
                    prefix,
                    statcast_type,
                    start.format("%Y-%m-%d"),
                    end.format("%Y-%m-%d")
                )?;
                if let Some(id) = player_id {
                    write!(f, ":{}", id)?;
                }
                Ok(())
            }
            CacheKey::Standings { year, date } => match date {
                Some(date) => write!(f, "{}:{}:{}", prefix, year, date.format("%Y-%m-%d")),
                None => write!(f, "{}:{}:season", prefix, year),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_player_key_folds_case() {
        let a = CacheKey::player_stats("Aaron Judge", 2024, None).to_string();
        let b = CacheKey::player_stats("aaron judge", 2024, None).to_string();
        assert_eq!(a, b);
        assert_eq!(a, "player_stats:aaron judge:2024:default");
    }

    #[test]
    fn test_team_key_folds_case_and_aliases() {
        assert_eq!(
            CacheKey::team_stats("nyy", 2024, None).to_string(),
            CacheKey::team_stats("NYY", 2024, None).to_string()
        );
        assert_eq!(
            CacheKey::team_stats("sd", 2024, Some("home")).to_string(),
            "team_stats:SDP:2024:home"
        );
    }

    #[test]
    fn test_schedule_key_uses_canonical_code() {
        let a = CacheKey::schedule("SD", date("2024-04-01"), date("2024-04-30"));
        let b = CacheKey::schedule("sdp", date("2024-04-01"), date("2024-04-30"));
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.to_string(), "schedule:SDP:2024-04-01:2024-04-30");
    }

    #[test]
    fn test_statcast_key_player_segment_only_when_filtered() {
        let all = CacheKey::statcast("all", date("2024-04-01"), date("2024-04-02"), None);
        assert_eq!(all.to_string(), "statcast:all:2024-04-01:2024-04-02");

        let batter = CacheKey::statcast("Batter", date("2024-04-01"), date("2024-04-02"), Some(592450));
        assert_eq!(batter.to_string(), "statcast:batter:2024-04-01:2024-04-02:592450");
    }

    #[test]
    fn test_standings_key() {
        assert_eq!(CacheKey::standings(2024, None).to_string(), "standings:2024:season");
        assert_eq!(
            CacheKey::standings(2024, Some(date("2024-06-01"))).to_string(),
            "standings:2024:2024-06-01"
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(DataKind::Schedule.to_string(), "schedule");
        assert_eq!(CacheKey::standings(2024, None).kind(), DataKind::Standings);
    }
}

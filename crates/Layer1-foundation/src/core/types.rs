//! Core Types - values passed across the provider seam

use crate::table::Table;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One division's standings table
#[derive(Debug, Clone, PartialEq)]
pub struct DivisionStandings {
    /// Division name; may be empty when the upstream does not name it
    pub division: String,
    pub table: Table,
}

impl DivisionStandings {
    pub fn new(division: impl Into<String>, table: Table) -> Self {
        Self {
            division: division.into(),
            table,
        }
    }
}

/// Which player filter a pitch-event request applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatcastType {
    #[default]
    All,
    Batter,
    Pitcher,
}

impl StatcastType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatcastType::All => "all",
            StatcastType::Batter => "batter",
            StatcastType::Pitcher => "pitcher",
        }
    }
}

impl fmt::Display for StatcastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatcastType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatcastType::All),
            "batter" => Ok(StatcastType::Batter),
            "pitcher" => Ok(StatcastType::Pitcher),
            other => Err(Error::validation(format!(
                "statcast_type must be 'all', 'batter' or 'pitcher' (got '{}')",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statcast_type_parse() {
        assert_eq!("Batter".parse::<StatcastType>().unwrap(), StatcastType::Batter);
        assert_eq!(" all ".parse::<StatcastType>().unwrap(), StatcastType::All);
        assert!(matches!("fielder".parse::<StatcastType>(), Err(Error::Validation(_))));
    }
}

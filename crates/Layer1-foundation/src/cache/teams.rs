//! Team abbreviations
//!
//! Callers use the short codes they see on broadcasts (`SD`, `SF`, `WSH`);
//! the canonical three-letter codes are what cache keys and upstream
//! lookups use.

/// Alias → canonical code. Canonical codes map to themselves.
const TEAM_ALIASES: &[(&str, &str)] = &[
    ("SD", "SDP"),
    ("SF", "SFG"),
    ("TB", "TBR"),
    ("KC", "KCR"),
    ("CWS", "CHW"),
    ("WSH", "WSN"),
    ("ARI", "ARI"),
    ("ATL", "ATL"),
    ("BAL", "BAL"),
    ("BOS", "BOS"),
    ("CHC", "CHC"),
    ("CIN", "CIN"),
    ("CLE", "CLE"),
    ("COL", "COL"),
    ("DET", "DET"),
    ("HOU", "HOU"),
    ("LAA", "LAA"),
    ("LAD", "LAD"),
    ("MIA", "MIA"),
    ("MIL", "MIL"),
    ("MIN", "MIN"),
    ("NYM", "NYM"),
    ("NYY", "NYY"),
    ("OAK", "OAK"),
    ("PHI", "PHI"),
    ("PIT", "PIT"),
    ("SEA", "SEA"),
    ("STL", "STL"),
    ("TEX", "TEX"),
    ("TOR", "TOR"),
    ("SDP", "SDP"),
    ("SFG", "SFG"),
    ("TBR", "TBR"),
    ("KCR", "KCR"),
    ("CHW", "CHW"),
    ("WSN", "WSN"),
];

/// Abbreviations shown to users, with franchise names
pub const TEAM_DIRECTORY: &[(&str, &str)] = &[
    ("ARI", "Arizona Diamondbacks"),
    ("ATL", "Atlanta Braves"),
    ("BAL", "Baltimore Orioles"),
    ("BOS", "Boston Red Sox"),
    ("CHC", "Chicago Cubs"),
    ("CHW", "Chicago White Sox"),
    ("CIN", "Cincinnati Reds"),
    ("CLE", "Cleveland Guardians"),
    ("COL", "Colorado Rockies"),
    ("DET", "Detroit Tigers"),
    ("HOU", "Houston Astros"),
    ("KC", "Kansas City Royals (also KCR)"),
    ("LAA", "Los Angeles Angels"),
    ("LAD", "Los Angeles Dodgers"),
    ("MIA", "Miami Marlins"),
    ("MIL", "Milwaukee Brewers"),
    ("MIN", "Minnesota Twins"),
    ("NYM", "New York Mets"),
    ("NYY", "New York Yankees"),
    ("OAK", "Oakland Athletics"),
    ("PHI", "Philadelphia Phillies"),
    ("PIT", "Pittsburgh Pirates"),
    ("SD", "San Diego Padres (also SDP)"),
    ("SEA", "Seattle Mariners"),
    ("SF", "San Francisco Giants (also SFG)"),
    ("STL", "St. Louis Cardinals"),
    ("TB", "Tampa Bay Rays (also TBR)"),
    ("TEX", "Texas Rangers"),
    ("TOR", "Toronto Blue Jays"),
    ("WSH", "Washington Nationals (also WSN)"),
];

/// Upper-case `team` and resolve aliases; unknown codes pass through
pub fn normalize_team(team: &str) -> String {
    let upper = team.trim().to_uppercase();
    TEAM_ALIASES
        .iter()
        .find(|(alias, _)| *alias == upper)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(upper)
}

/// Whether `team` is a known code or alias
pub fn is_known_team(team: &str) -> bool {
    let upper = team.trim().to_uppercase();
    TEAM_ALIASES.iter().any(|(alias, _)| *alias == upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(normalize_team("sd"), "SDP");
        assert_eq!(normalize_team("SF"), "SFG");
        assert_eq!(normalize_team("cws"), "CHW");
        assert_eq!(normalize_team("WSH"), "WSN");
    }

    #[test]
    fn test_canonical_codes_are_identity() {
        for (_, canonical) in TEAM_ALIASES {
            assert_eq!(normalize_team(canonical), *canonical);
        }
    }

    #[test]
    fn test_unknown_code_passes_through_upper_cased() {
        assert_eq!(normalize_team("xyz"), "XYZ");
        assert!(!is_known_team("XYZ"));
        assert!(is_known_team("tb"));
    }

    #[test]
    fn test_directory_entries_are_known() {
        assert_eq!(TEAM_DIRECTORY.len(), 30);
        for (abbr, _) in TEAM_DIRECTORY {
            assert!(is_known_team(abbr), "{} missing from aliases", abbr);
        }
    }
}

//! Schedule date inference
//!
//! Box-score schedules label games like `Thursday, Mar 27` or
//! `Sunday, Jun 2 (2)` for the second game of a double-header, with the
//! season implied. The year is taken from the query's season.

use chrono::NaiveDate;

/// Formats for labels that already carry a year
const COMPLETE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%A, %b %d, %Y",
    "%b %d, %Y",
    "%d %b %Y",
];

/// Formats for `<label>, <season>`
const WITH_SEASON_FORMATS: &[&str] = &["%b %d, %Y", "%A, %b %d, %Y", "%d %b, %Y"];

/// Best-effort date for a schedule label, `None` when nothing parses.
///
/// In order: a label whose last token has a digit is tried as a complete
/// date; a label with a comma has its `month day` part joined to the
/// season; the season is appended to the whole label; finally the complete
/// formats are tried once more on the cleaned label.
pub fn infer_date(raw: &str, season: i32) -> Option<NaiveDate> {
    let label = strip_game_number(raw.trim());
    if label.is_empty() {
        return None;
    }

    let last_has_digit = label
        .split_whitespace()
        .last()
        .map(|token| token.chars().any(|c| c.is_ascii_digit()))
        .unwrap_or(false);
    if last_has_digit {
        if let Some(date) = parse_any(label, COMPLETE_FORMATS) {
            return Some(date);
        }
    }

    if let Some((_, rest)) = label.split_once(',') {
        let month_day = rest.split(',').next().unwrap_or_default().trim();
        if !month_day.is_empty() {
            if let Some(date) = parse_any(&format!("{}, {}", month_day, season), WITH_SEASON_FORMATS)
            {
                return Some(date);
            }
        }
    }

    if let Some(date) = parse_any(&format!("{}, {}", label, season), WITH_SEASON_FORMATS) {
        return Some(date);
    }

    parse_any(label, COMPLETE_FORMATS)
}

/// `Sunday, Jun 2 (2)` → `Sunday, Jun 2`
fn strip_game_number(label: &str) -> &str {
    if let Some(open) = label.rfind(" (") {
        let tail = &label[open + 2..];
        if let Some(number) = tail.strip_suffix(')') {
            if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
                return label[..open].trim_end();
            }
        }
    }
    label
}

fn parse_any(value: &str, formats: &[&str]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

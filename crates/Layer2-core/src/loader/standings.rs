//! Division standings, flattened into one table

use super::{parse_date, read_through, validate_year, UpstreamErrorPolicy};
use baseball_foundation::{
    BlobStore, CacheKey, Cell, DivisionStandings, Error, Result, StatsProvider, Table,
};
use chrono::Datelike;

/// Standings for `year`, as of `date` when given.
///
/// Each division's rows carry a `Division` column: the division name, or
/// `Division_<n>` (1-based position) when the upstream gave none. Empty
/// divisions are skipped.
pub async fn fetch_standings(
    store: &BlobStore,
    provider: &dyn StatsProvider,
    year: i32,
    date: Option<&str>,
) -> Result<Table> {
    let year = validate_year(year)?;
    let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => {
            let date = parse_date("date", raw)?;
            if date.year() != year {
                return Err(Error::validation(format!(
                    "date {} is outside the {} season",
                    raw, year
                )));
            }
            Some(date)
        }
        None => None,
    };

    let key = CacheKey::standings(year, date);
    read_through(store, &key, UpstreamErrorPolicy::Propagate, || async {
        let divisions = provider.standings(year, date).await?;
        Ok(flatten(divisions))
    })
    .await
}

fn flatten(divisions: Vec<DivisionStandings>) -> Table {
    let tables = divisions
        .into_iter()
        .enumerate()
        .filter(|(_, d)| !d.table.is_empty())
        .map(|(i, d)| {
            let name = if d.division.trim().is_empty() {
                format!("Division_{}", i + 1)
            } else {
                d.division
            };
            d.table.with_column("Division", Cell::from(name))
        });
    Table::concat(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{table, StubProvider};

    fn division(name: &str, teams: &[(&str, i64)]) -> DivisionStandings {
        DivisionStandings::new(
            name,
            table(
                &["Tm", "W"],
                teams
                    .iter()
                    .map(|(t, w)| vec![Cell::from(*t), Cell::Int(*w)])
                    .collect(),
            ),
        )
    }

    #[tokio::test]
    async fn test_divisions_are_flattened_and_cached() {
        let store = BlobStore::in_memory();
        let provider = StubProvider::new().with_standings(vec![
            division("AL East", &[("NYY", 94), ("BAL", 91)]),
            division("", &[("LAD", 98)]),
            division("NL Central", &[]),
        ]);

        let table = fetch_standings(&store, &provider, 2024, None).await.unwrap();
        assert_eq!(table.columns(), &["Tm", "W", "Division"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.cell(0, "Division"), Some(&Cell::from("AL East")));
        assert_eq!(table.cell(2, "Division"), Some(&Cell::from("Division_2")));

        let again = fetch_standings(&store, &provider, 2024, Some("")).await.unwrap();
        assert_eq!(again, table);
        assert_eq!(provider.calls("standings"), 1);
        assert!(store.get("standings:2024:season").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_date_must_fall_in_year() {
        let store = BlobStore::in_memory();
        let provider = StubProvider::new();

        let err = fetch_standings(&store, &provider, 2024, Some("2023-09-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(fetch_standings(&store, &provider, 2024, Some("Sept 1")).await.is_err());
        assert_eq!(provider.total_calls(), 0);

        fetch_standings(&store, &provider, 2024, Some("2024-09-01"))
            .await
            .unwrap();
        assert!(store.get("standings:2024:2024-09-01").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_no_divisions_is_empty() {
        let store = BlobStore::in_memory();
        let provider = StubProvider::new();
        assert!(fetch_standings(&store, &provider, 2024, None)
            .await
            .unwrap()
            .is_empty());
    }
}

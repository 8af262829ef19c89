//! Player season stats

use super::{current_year, read_through, validate_year, UpstreamErrorPolicy};
use baseball_foundation::{BlobStore, CacheKey, Error, Result, StatsProvider, Table};

/// Season batting lines whose `Name` contains `player_name` (case-insensitive).
///
/// `year` defaults to the current season. `split` only namespaces the cache
/// entry.
pub async fn fetch_player_stats(
    store: &BlobStore,
    provider: &dyn StatsProvider,
    player_name: &str,
    year: Option<i32>,
    split: Option<&str>,
) -> Result<Table> {
    let player_name = player_name.trim();
    if player_name.is_empty() {
        return Err(Error::validation("player_name must be provided"));
    }
    let year = validate_year(year.unwrap_or_else(current_year))?;

    let key = CacheKey::player_stats(player_name, year, split);
    read_through(store, &key, UpstreamErrorPolicy::Propagate, || async {
        let all = provider.batting_stats(year).await?;
        matching_players(&all, player_name)
    })
    .await
}

fn matching_players(table: &Table, player_name: &str) -> Result<Table> {
    let idx = table
        .column_index("Name")
        .ok_or_else(|| Error::Provider("batting stats have no Name column".to_string()))?;
    let needle = player_name.to_lowercase();

    Ok(table.filter_rows(|row| {
        row[idx]
            .as_str()
            .map(|name| name.to_lowercase().contains(&needle))
            .unwrap_or(false)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{table, StubProvider};
    use baseball_foundation::Cell;

    fn league() -> Table {
        table(
            &["Name", "Team", "HR"],
            vec![
                vec![Cell::from("Test Player"), Cell::from("SDP"), Cell::from(1)],
                vec![Cell::from("Other Guy"), Cell::from("NYY"), Cell::from(30)],
            ],
        )
    }

    #[tokio::test]
    async fn test_fetch_and_cache() {
        let store = BlobStore::in_memory();
        let provider = StubProvider::new().with_table("batting_stats", league());

        let first = fetch_player_stats(&store, &provider, "Test Player", Some(2024), None)
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first.cell(0, "Name"), Some(&Cell::from("Test Player")));
        assert_eq!(first.cell(0, "HR"), Some(&Cell::Int(1)));
        assert_eq!(provider.calls("batting_stats"), 1);

        let second = fetch_player_stats(&store, &provider, "Test Player", Some(2024), None)
            .await
            .unwrap();
        assert_eq!(second, first);
        assert_eq!(provider.calls("batting_stats"), 1);
    }

    #[tokio::test]
    async fn test_name_match_is_case_insensitive_and_shares_cache() {
        let store = BlobStore::in_memory();
        let provider = StubProvider::new().with_table("batting_stats", league());

        let lower = fetch_player_stats(&store, &provider, "test player", Some(2024), None)
            .await
            .unwrap();
        let upper = fetch_player_stats(&store, &provider, "TEST PLAYER", Some(2024), None)
            .await
            .unwrap();

        assert_eq!(lower.len(), 1);
        assert_eq!(lower, upper);
        assert_eq!(provider.calls("batting_stats"), 1);
    }

    #[tokio::test]
    async fn test_empty_result_is_memoized() {
        let store = BlobStore::in_memory();
        let provider = StubProvider::new().with_table("batting_stats", league());

        for _ in 0..3 {
            let table = fetch_player_stats(&store, &provider, "Nobody", Some(2024), None)
                .await
                .unwrap();
            assert!(table.is_empty());
            assert_eq!(table.columns(), &["Name", "Team", "HR"]);
        }
        assert_eq!(provider.calls("batting_stats"), 1);
    }

    #[tokio::test]
    async fn test_validation_precedes_any_io() {
        let store = BlobStore::in_memory();
        let provider = StubProvider::new();

        let err = fetch_player_stats(&store, &provider, "  ", Some(2024), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = fetch_player_stats(&store, &provider, "Test Player", Some(1850), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "year must be 1871 or later");

        assert_eq!(provider.total_calls(), 0);
        assert_eq!(store.stats().unwrap().entries, 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let store = BlobStore::in_memory();
        let provider = StubProvider::new().failing("batting_stats");

        let err = fetch_player_stats(&store, &provider, "Test Player", Some(2024), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream { .. }));
        assert!(err.to_string().starts_with("Failed to fetch player stats"));
        assert_eq!(store.stats().unwrap().entries, 0);
    }

    #[tokio::test]
    async fn test_split_namespaces_the_entry() {
        let store = BlobStore::in_memory();
        let provider = StubProvider::new().with_table("batting_stats", league());

        fetch_player_stats(&store, &provider, "Test Player", Some(2024), None)
            .await
            .unwrap();
        fetch_player_stats(&store, &provider, "Test Player", Some(2024), Some("vsL"))
            .await
            .unwrap();

        assert_eq!(provider.calls("batting_stats"), 2);
        assert_eq!(store.stats().unwrap().entries, 2);
    }
}

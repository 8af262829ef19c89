//! Team season stats

use super::{read_through, validate_year, UpstreamErrorPolicy};
use baseball_foundation::{
    normalize_team, BlobStore, CacheKey, Error, Result, StatsProvider, Table,
};
use tracing::warn;

/// Season batting totals for one team.
///
/// The upstream is asked for the team first; if that fails, all teams are
/// fetched and filtered on either the caller's code or its canonical form.
pub async fn fetch_team_stats(
    store: &BlobStore,
    provider: &dyn StatsProvider,
    team: &str,
    year: i32,
    split: Option<&str>,
) -> Result<Table> {
    let team = team.trim();
    if team.is_empty() {
        return Err(Error::validation("team must be provided (e.g. 'ATL', 'NYY')"));
    }
    let year = validate_year(year)?;
    let code = normalize_team(team);

    let key = CacheKey::team_stats(&code, year, split);
    read_through(store, &key, UpstreamErrorPolicy::Propagate, || async {
        match provider.team_batting(year, Some(&code)).await {
            Ok(table) => Ok(rows_for_team(&table, &[code.as_str()]).unwrap_or(table)),
            Err(e) => {
                warn!("Team batting for {} failed, retrying for all teams: {}", code, e);
                let all = provider.team_batting(year, None).await?;
                Ok(rows_for_team(&all, &[team, code.as_str()]).unwrap_or_default())
            }
        }
    })
    .await
}

/// Rows whose `Team` equals one of `codes` ignoring case; `None` without a `Team` column
fn rows_for_team(table: &Table, codes: &[&str]) -> Option<Table> {
    let idx = table.column_index("Team")?;
    let codes: Vec<String> = codes.iter().map(|c| c.to_uppercase()).collect();
    Some(table.filter_rows(|row| {
        row[idx]
            .as_str()
            .map(|t| codes.contains(&t.trim().to_uppercase()))
            .unwrap_or(false)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{table, StubProvider};
    use baseball_foundation::Cell;

    fn teams() -> Table {
        table(
            &["Team", "HR"],
            vec![
                vec![Cell::from("SDP"), Cell::from(190)],
                vec![Cell::from("NYY"), Cell::from(237)],
            ],
        )
    }

    #[tokio::test]
    async fn test_alias_and_canonical_share_entry() {
        let store = BlobStore::in_memory();
        let provider = StubProvider::new().with_table("team_batting", teams());

        let sd = fetch_team_stats(&store, &provider, "sd", 2024, None)
            .await
            .unwrap();
        let sdp = fetch_team_stats(&store, &provider, "SDP", 2024, None)
            .await
            .unwrap();

        assert_eq!(sd.len(), 1);
        assert_eq!(sd.cell(0, "HR"), Some(&Cell::Int(190)));
        assert_eq!(sd, sdp);
        assert_eq!(provider.calls("team_batting"), 1);
        assert!(store.get("team_stats:SDP:2024:default").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_falls_back_to_all_teams() {
        let store = BlobStore::in_memory();
        let provider = StubProvider::new()
            .failing("team_batting")
            .with_table("team_batting_all", teams());

        let nyy = fetch_team_stats(&store, &provider, "nyy", 2024, None)
            .await
            .unwrap();
        assert_eq!(nyy.len(), 1);
        assert_eq!(nyy.cell(0, "Team"), Some(&Cell::from("NYY")));
        assert_eq!(provider.calls("team_batting"), 1);
        assert_eq!(provider.calls("team_batting_all"), 1);
    }

    #[tokio::test]
    async fn test_fallback_without_team_column_is_empty() {
        let store = BlobStore::in_memory();
        let no_team = table(&["HR"], vec![vec![Cell::from(1)]]);
        let provider = StubProvider::new()
            .failing("team_batting")
            .with_table("team_batting_all", no_team.clone());

        let result = fetch_team_stats(&store, &provider, "NYY", 2024, None)
            .await
            .unwrap();
        assert!(result.is_empty());

        // the direct answer without a Team column is kept whole
        let store = BlobStore::in_memory();
        let provider = StubProvider::new().with_table("team_batting", no_team);
        let result = fetch_team_stats(&store, &provider, "NYY", 2024, None)
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_both_attempts_failing_propagates() {
        let store = BlobStore::in_memory();
        let provider = StubProvider::new()
            .failing("team_batting")
            .failing("team_batting_all");

        let err = fetch_team_stats(&store, &provider, "NYY", 2024, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream { .. }));
        assert_eq!(store.stats().unwrap().entries, 0);
    }

    #[tokio::test]
    async fn test_validation() {
        let store = BlobStore::in_memory();
        let provider = StubProvider::new();

        assert!(fetch_team_stats(&store, &provider, "", 2024, None).await.is_err());
        assert!(fetch_team_stats(&store, &provider, "NYY", 1870, None).await.is_err());
        assert_eq!(provider.total_calls(), 0);
    }
}

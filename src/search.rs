use serde_json::Value;
use tracing::{debug, warn};

use crate::{error::AppResult, store::FilmStore, tmdb::TmdbClient};

pub const STORE_FALLBACK_LIMIT: u64 = 5;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    External,
    Store,
}

#[derive(Debug)]
pub struct SearchResult {
    /// Which stage produced `movies`; `None` when both came up empty-handed.
    pub stage: Option<Stage>,
    pub movies: Vec<Value>,
}

/// Runs the external search, then falls back to the first few store records.
/// Failures at either stage are logged and never returned.
pub async fn run(tmdb: &TmdbClient, store: &FilmStore, text: Option<&str>) -> SearchResult {
    if let Some(movies) = external_stage(tmdb, text).await {
        debug!(count = movies.len(), "search served from TMDB");
        return SearchResult { stage: Some(Stage::External), movies };
    }

    match store_stage(store).await {
        Ok(movies) => {
            debug!(count = movies.len(), "search served from film store");
            SearchResult { stage: Some(Stage::Store), movies }
        },
        Err(err) => {
            warn!(error = %err, "store fallback failed; returning no movies");
            SearchResult { stage: None, movies: Vec::new() }
        },
    }
}

async fn external_stage(tmdb: &TmdbClient, text: Option<&str>) -> Option<Vec<Value>> {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        debug!("no search text; skipping TMDB");
        return None;
    };
    if !tmdb.is_configured() {
        debug!("TMDB not configured; skipping external search");
        return None;
    }

    match tmdb.search(text).await {
        Ok(results) if !results.is_empty() => Some(results),
        Ok(_) => {
            debug!(query = %text, "TMDB returned no results");
            None
        },
        Err(err) => {
            warn!(query = %text, error = %err, "TMDB search failed");
            None
        },
    }
}

async fn store_stage(store: &FilmStore) -> AppResult<Vec<Value>> {
    let films = store.list_first(STORE_FALLBACK_LIMIT).await?;
    Ok(films.into_iter().map(serde_json::to_value).collect::<Result<Vec<_>, _>>()?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        db::ConnectionCache,
        models::NewFilm,
        test_support::{SearchBehaviour, TEST_KEY, search_hit, spawn_fake_tmdb, test_client},
    };

    async fn store_with(count: usize) -> FilmStore {
        let store =
            FilmStore::new(Arc::new(ConnectionCache::new(Some("sqlite::memory:".to_string()), None)));
        for i in 0..count {
            store
                .insert(NewFilm {
                    title: format!("Stored {i}"),
                    year: 2000 + i as i32,
                    director: "Someone".to_string(),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn external_hits_win() {
        let fake = spawn_fake_tmdb(SearchBehaviour::Results(vec![search_hit("Heat", "1995")])).await;
        let tmdb = test_client(&fake.base_url, Some(TEST_KEY));
        let store = store_with(2).await;

        let result = run(&tmdb, &store, Some("heat")).await;
        assert_eq!(result.stage, Some(Stage::External));
        assert_eq!(result.movies[0]["title"], "Heat");
    }

    #[tokio::test]
    async fn empty_upstream_falls_back_to_five_store_records() {
        let fake = spawn_fake_tmdb(SearchBehaviour::Results(Vec::new())).await;
        let tmdb = test_client(&fake.base_url, Some(TEST_KEY));
        let store = store_with(7).await;

        let result = run(&tmdb, &store, Some("nothing matches")).await;
        assert_eq!(result.stage, Some(Stage::Store));
        assert_eq!(result.movies.len(), 5);
        assert!(result.movies[0].get("likes").is_some());
        assert_eq!(fake.hits(), 1);
    }

    #[tokio::test]
    async fn upstream_error_falls_back_to_store() {
        let fake = spawn_fake_tmdb(SearchBehaviour::Fail).await;
        let tmdb = test_client(&fake.base_url, Some(TEST_KEY));
        let store = store_with(3).await;

        let result = run(&tmdb, &store, Some("heat")).await;
        assert_eq!(result.stage, Some(Stage::Store));
        assert_eq!(result.movies.len(), 3);
    }

    #[tokio::test]
    async fn blank_text_or_missing_key_skip_upstream() {
        let fake = spawn_fake_tmdb(SearchBehaviour::Results(vec![search_hit("Heat", "")])).await;
        let store = store_with(1).await;

        let keyed = test_client(&fake.base_url, Some(TEST_KEY));
        assert_eq!(run(&keyed, &store, None).await.stage, Some(Stage::Store));
        assert_eq!(run(&keyed, &store, Some("   ")).await.stage, Some(Stage::Store));

        let keyless = test_client(&fake.base_url, None);
        assert_eq!(run(&keyless, &store, Some("heat")).await.stage, Some(Stage::Store));

        assert_eq!(fake.hits(), 0);
    }

    #[tokio::test]
    async fn both_stages_failing_yields_nothing() {
        let fake = spawn_fake_tmdb(SearchBehaviour::Fail).await;
        let tmdb = test_client(&fake.base_url, Some(TEST_KEY));
        let store = FilmStore::new(Arc::new(ConnectionCache::new(None, None)));

        let result = run(&tmdb, &store, Some("heat")).await;
        assert_eq!(result.stage, None);
        assert!(result.movies.is_empty());
    }
}

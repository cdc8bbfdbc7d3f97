//! Helpers shared by the in-crate tests: a local stand-in for the TMDB API and
//! an in-memory application state.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, config::Config, db::ConnectionCache, store::FilmStore, tmdb::TmdbClient,
};

pub const TEST_KEY: &str = "test-key";

#[derive(Clone)]
pub enum SearchBehaviour {
    Results(Vec<Value>),
    Fail,
}

#[derive(Clone)]
struct FakeState {
    search: SearchBehaviour,
    hits: Arc<AtomicUsize>,
}

pub struct FakeTmdb {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl FakeTmdb {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

#[derive(Deserialize)]
struct KeyQuery {
    api_key: Option<String>,
}

pub async fn spawn_fake_tmdb(search: SearchBehaviour) -> FakeTmdb {
    let hits = Arc::new(AtomicUsize::new(0));
    let state = FakeState { search, hits: hits.clone() };

    let app = Router::new()
        .route("/search/movie", get(fake_search))
        .route("/movie/{id}", get(fake_detail))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeTmdb { base_url: format!("http://{addr}"), hits }
}

async fn fake_search(State(state): State<FakeState>, Query(q): Query<KeyQuery>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if q.api_key.as_deref() != Some(TEST_KEY) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match state.search {
        SearchBehaviour::Results(results) => {
            let total = results.len();
            Json(json!({ "page": 1, "results": results, "total_results": total })).into_response()
        },
        SearchBehaviour::Fail => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn fake_detail(
    State(state): State<FakeState>,
    Path(id): Path<u64>,
    Query(q): Query<KeyQuery>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if q.api_key.as_deref() != Some(TEST_KEY) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id != 550 {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({
        "id": 550,
        "title": "Fight Club",
        "release_date": "1999-10-15",
        "overview": "An insomniac office worker crosses paths with a soap maker.",
        "tagline": "Mischief. Mayhem. Soap.",
        "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
        "original_language": "en",
        "genres": [{ "id": 18, "name": "Drama" }],
        "runtime": 139
    }))
    .into_response()
}

pub fn search_hit(title: &str, release_date: &str) -> Value {
    json!({ "id": 1, "title": title, "release_date": release_date, "popularity": 1.5 })
}

pub fn test_client(base_url: &str, api_key: Option<&str>) -> TmdbClient {
    TmdbClient::new(reqwest::Client::new(), api_key.map(str::to_string), base_url.to_string())
}

pub fn test_state(
    database_url: Option<&str>,
    tmdb_base_url: &str,
    api_key: Option<&str>,
) -> Arc<AppState> {
    let config = Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        tmdb_api_key: api_key.map(str::to_string),
        tmdb_base_url: tmdb_base_url.to_string(),
        tmdb_image_base_url: "https://image.test/w500".to_string(),
        database_url: database_url.map(str::to_string),
        seed_path: None,
        http_timeout_secs: 5,
    };
    let conn = ConnectionCache::new(config.database_url.clone(), None);
    Arc::new(AppState {
        store: FilmStore::new(Arc::new(conn)),
        tmdb: Arc::new(test_client(tmdb_base_url, api_key)),
        config: Arc::new(config),
    })
}

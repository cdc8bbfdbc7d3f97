use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, warn};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{
        FilmId, LikeRequest, LikeResponse, MovieSummary, MoviesResponse, SearchRequest,
        SuggestQuery,
    },
    search,
    store::LikeOutcome,
    templates::{self, DetailView},
};

const SUGGEST_LIMIT: usize = 5;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/movieDetail/{id}", get(movie_detail))
        .route("/movieDetails/{id}", get(external_movie_detail))
        .route("/suggest", get(suggest))
        .route("/search", post(search_movies))
        .route("/like/{id}", post(like))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let films = state.store.list_all().await?;
    Ok(Html(templates::catalog_page(&films)))
}

pub async fn movie_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id: FilmId = id.parse()?;
    let film = state
        .store
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("film {id} was not found")))?;
    Ok(Html(templates::detail_page(&DetailView::from_film(&film))))
}

pub async fn external_movie_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let external_id: u64 = id
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("'{id}' is not a valid TMDB id")))?;
    let detail = state.tmdb.get_detail(external_id).await?;
    let view = DetailView::from_external(detail, &state.config.tmdb_image_base_url);
    Ok(Html(templates::detail_page(&view)))
}

pub async fn suggest(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SuggestQuery>,
) -> Json<MoviesResponse<MovieSummary>> {
    let query = q.query.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Json(MoviesResponse { movies: Vec::new() });
    }

    let movies = match state.tmdb.suggest(query, SUGGEST_LIMIT).await {
        Ok(movies) => movies,
        Err(err) => {
            warn!(query = %query, error = %err, "suggest failed");
            Vec::new()
        },
    };
    Json(MoviesResponse { movies })
}

pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<MoviesResponse<Value>> {
    let req: SearchRequest = parse_body(&body).unwrap_or_else(|err| {
        warn!(error = %err, "unreadable search body; treating as empty");
        SearchRequest::default()
    });

    let result = search::run(&state.tmdb, &state.store, req.text.as_deref()).await;
    debug!(stage = ?result.stage, count = result.movies.len(), "search complete");
    Json(MoviesResponse { movies: result.movies })
}

pub async fn like(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> (StatusCode, Json<LikeResponse>) {
    let result: AppResult<()> = async {
        let film_id: FilmId = id.parse()?;
        let req: LikeRequest = parse_body(&body)
            .map_err(|err| AppError::BadRequest(format!("invalid like body: {err}")))?;

        match state.store.increment_likes(film_id, req.count).await? {
            LikeOutcome::Applied => Ok(()),
            LikeOutcome::Missing => Err(AppError::NotFound(format!("film {film_id} was not found"))),
            LikeOutcome::OutOfRange => Err(AppError::BadRequest(format!(
                "adding {} likes to film {film_id} is out of range",
                req.count
            ))),
        }
    }
    .await;

    match result {
        Ok(()) => (StatusCode::OK, Json(LikeResponse { success: true })),
        Err(err) => {
            warn!(film_id = %id, error = %err, "like failed");
            (err.status(), Json(LikeResponse { success: false }))
        },
    }
}

/// An empty body means "all defaults"; anything else must be valid JSON.
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
}

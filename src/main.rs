mod config;
mod db;
mod entities;
mod error;
mod models;
mod routes;
mod search;
mod seed;
mod store;
mod templates;
mod tmdb;

#[cfg(test)]
mod test_support;

use std::{sync::Arc, time::Duration};

use crate::{config::Config, db::ConnectionCache, store::FilmStore, tmdb::TmdbClient};

pub struct AppState {
    pub config: Arc<Config>,
    pub store: FilmStore,
    pub tmdb: Arc<TmdbClient>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,filmshelf=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let http = reqwest::Client::builder()
        .user_agent("filmshelf/0.1")
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    // The store connects on first use, so a missing or unreachable database
    // doesn't keep the server from starting.
    let conn = ConnectionCache::new(config.database_url.clone(), config.seed_path.clone());
    let store = FilmStore::new(Arc::new(conn));

    let tmdb = TmdbClient::new(http, config.tmdb_api_key.clone(), config.tmdb_base_url.clone());

    let state = Arc::new(AppState { config: config.clone(), store, tmdb: Arc::new(tmdb) });

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

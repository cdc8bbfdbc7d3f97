use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub tmdb_image_base_url: String,
    pub database_url: Option<String>,
    pub seed_path: Option<PathBuf>,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        // Blank values count as unset so an empty `.env` entry doesn't enable a feature.
        let non_blank = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = non_blank("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 =
            non_blank("PORT").unwrap_or_else(|| "3000".to_string()).parse().context("PORT")?;

        let tmdb_api_key = non_blank("TMDB_API_KEY");
        let tmdb_base_url =
            non_blank("TMDB_BASE_URL").unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());
        let tmdb_image_base_url = non_blank("TMDB_IMAGE_BASE_URL")
            .unwrap_or_else(|| "https://image.tmdb.org/t/p/w500".to_string());

        let database_url = non_blank("DATABASE_URL");
        let seed_path = non_blank("FILMS_SEED_PATH").map(PathBuf::from);

        let http_timeout_secs: u64 =
            non_blank("HTTP_TIMEOUT_SECS").and_then(|s| s.parse().ok()).unwrap_or(30);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            tmdb_api_key,
            tmdb_base_url,
            tmdb_image_base_url,
            database_url,
            seed_path,
            http_timeout_secs,
        })
    }
}

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::AppResult,
    models::{MovieDetail, MovieSummary},
};

pub struct TmdbClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl TmdbClient {
    pub fn new(client: reqwest::Client, api_key: Option<String>, base_url: String) -> Self {
        if api_key.is_none() {
            tracing::warn!("no TMDB_API_KEY provided; suggestions and external lookups are disabled");
        }
        Self { client, api_key, base_url }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn get_detail(&self, external_id: u64) -> AppResult<MovieDetail> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(anyhow::anyhow!("TMDB_API_KEY is not configured").into());
        };
        debug!(external_id, "fetching TMDB detail");
        self.get(&format!("/movie/{external_id}"), key, &[]).await
    }

    /// Raw search hits, as many as TMDB returns on its first page.
    pub async fn search(&self, query: &str) -> AppResult<Vec<Value>> {
        let Some(key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };
        debug!(query = %query, "searching TMDB");
        let resp: SearchResponse<Value> =
            self.get("/search/movie", key, &[("query", query)]).await?;
        Ok(resp.results)
    }

    pub async fn suggest(&self, query: &str, limit: usize) -> AppResult<Vec<MovieSummary>> {
        let Some(key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };
        let resp: SearchResponse<MovieSummary> =
            self.get("/search/movie", key, &[("query", query)]).await?;
        Ok(resp.results.into_iter().take(limit).collect())
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let resp = self
            .client
            .get(url)
            .query(&[("api_key", key)])
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

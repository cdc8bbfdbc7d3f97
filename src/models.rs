use std::{fmt, str::FromStr};

use sea_orm::Set;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    entities::film,
    error::{AppError, AppResult},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilmId(pub i32);

impl FromStr for FilmId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(FilmId)
            .map_err(|_| AppError::BadRequest(format!("'{s}' is not a valid film id")))
    }
}

impl fmt::Display for FilmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Film {
    pub id: FilmId,
    pub title: String,
    pub year: i32,
    pub starring: Vec<String>,
    pub director: String,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub image: Option<String>,
    pub likes: i64,
}

impl From<film::Model> for Film {
    fn from(m: film::Model) -> Self {
        let starring = serde_json::from_str(&m.starring).unwrap_or_else(|err| {
            tracing::warn!(film_id = m.id, error = %err, "unreadable starring column");
            Vec::new()
        });
        Self {
            id: FilmId(m.id),
            title: m.title,
            year: m.year,
            starring,
            director: m.director,
            genre: m.genre,
            language: m.language,
            image: m.image,
            likes: m.likes,
        }
    }
}

/// A film record as supplied by an out-of-band producer (seed file, tests).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewFilm {
    pub title: String,
    pub year: i32,
    #[serde(default)]
    pub starring: Vec<String>,
    pub director: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub likes: i64,
}

impl NewFilm {
    pub fn into_active_model(self) -> AppResult<film::ActiveModel> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("film title is required".to_string()));
        }
        let director = self.director.trim().to_string();
        if director.is_empty() {
            return Err(AppError::BadRequest("film director is required".to_string()));
        }

        Ok(film::ActiveModel {
            id: Default::default(),
            title: Set(title),
            year: Set(self.year),
            starring: Set(serde_json::to_string(&self.starring)?),
            director: Set(director),
            genre: Set(trimmed(self.genre)),
            language: Set(trimmed(self.language)),
            image: Set(self.image.filter(|s| !s.trim().is_empty())),
            likes: Set(self.likes),
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    })
}

/// Autocomplete projection of an external search hit. TMDB sends `null` for
/// unknown values, which decode as empty strings.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct MovieSummary {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub release_date: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Genre {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
}

/// External detail payload. TMDB sends far more than this; unknown fields are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieDetail {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub poster_path: Option<String>,
    pub original_language: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestQuery {
    pub query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    #[serde(default = "default_like_count")]
    pub count: i64,
}

impl Default for LikeRequest {
    fn default() -> Self {
        Self { count: default_like_count() }
    }
}

fn default_like_count() -> i64 {
    1
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LikeResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MoviesResponse<T> {
    pub movies: Vec<T>,
}

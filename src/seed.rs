use std::path::Path;

use anyhow::Context;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use tracing::{debug, info};

use crate::{entities::film, error::AppResult, models::NewFilm};

/// Imports a JSON array of films from `path`, but only into an empty table.
pub async fn seed_if_empty(db: &DatabaseConnection, path: &Path) -> AppResult<usize> {
    let existing = film::Entity::find().count(db).await?;
    if existing > 0 {
        debug!(existing, "film store already populated; skipping seed");
        return Ok(0);
    }

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading seed file {}", path.display()))?;
    let films: Vec<NewFilm> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing seed file {}", path.display()))?;

    let models = films.into_iter().map(NewFilm::into_active_model).collect::<AppResult<Vec<_>>>()?;
    let count = models.len();
    if count > 0 {
        film::Entity::insert_many(models).exec(db).await?;
    }

    info!(count, path = %path.display(), "seeded film store");
    Ok(count)
}

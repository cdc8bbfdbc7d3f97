use std::sync::Arc;

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::Expr,
};
use tracing::{info, warn};

use crate::{
    db::ConnectionCache,
    entities::film,
    error::AppResult,
    models::{Film, FilmId, NewFilm},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LikeOutcome {
    Applied,
    Missing,
    OutOfRange,
}

#[derive(Clone)]
pub struct FilmStore {
    conn: Arc<ConnectionCache>,
}

impl FilmStore {
    pub fn new(conn: Arc<ConnectionCache>) -> Self {
        Self { conn }
    }

    async fn db(&self) -> AppResult<&DatabaseConnection> {
        self.conn.ensure_connected().await
    }

    pub async fn list_all(&self) -> AppResult<Vec<Film>> {
        let rows = film::Entity::find().all(self.db().await?).await?;
        Ok(rows.into_iter().map(Film::from).collect())
    }

    pub async fn list_first(&self, limit: u64) -> AppResult<Vec<Film>> {
        let rows = film::Entity::find()
            .order_by_asc(film::Column::Id)
            .limit(limit)
            .all(self.db().await?)
            .await?;
        Ok(rows.into_iter().map(Film::from).collect())
    }

    pub async fn get_by_id(&self, id: FilmId) -> AppResult<Option<Film>> {
        let row = film::Entity::find_by_id(id.0).one(self.db().await?).await?;
        Ok(row.map(Film::from))
    }

    /// Adds `amount` to the like count in a single statement. The update only
    /// applies while the result still fits in an `i64`; SQLite would otherwise
    /// store the sum as REAL and the row could no longer be read.
    pub async fn increment_likes(&self, id: FilmId, amount: i64) -> AppResult<LikeOutcome> {
        let db = self.db().await?;

        let mut update = film::Entity::update_many()
            .col_expr(film::Column::Likes, Expr::col(film::Column::Likes).add(amount))
            .filter(film::Column::Id.eq(id.0));
        if amount > 0 {
            update = update.filter(film::Column::Likes.lte(i64::MAX - amount));
        } else if amount < 0 {
            update = update.filter(film::Column::Likes.gte(i64::MIN - amount));
        }
        let res = update.exec(db).await?;

        if res.rows_affected > 0 {
            info!(film_id = %id, amount, "likes incremented");
            return Ok(LikeOutcome::Applied);
        }

        let exists = film::Entity::find_by_id(id.0).one(db).await?.is_some();
        if exists {
            warn!(film_id = %id, amount, "like count would leave the i64 range; not applied");
            Ok(LikeOutcome::OutOfRange)
        } else {
            Ok(LikeOutcome::Missing)
        }
    }

    pub async fn insert(&self, new: NewFilm) -> AppResult<Film> {
        let model = new.into_active_model()?;
        let res = film::Entity::insert(model).exec(self.db().await?).await?;
        let id = FilmId(res.last_insert_id);
        info!(film_id = %id, "film inserted");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("film {id} vanished after insert").into())
    }
}

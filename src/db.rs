use std::{
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::{error::AppResult, seed};

const PRAGMAS: &str = "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL";
const MIGRATION_001: &str = include_str!("../migrations/001_films.sql");

/// Process-shared, lazily opened handle to the film store.
///
/// The first caller opens the connection; callers arriving while that attempt
/// is in flight wait on it instead of opening their own. A successful handle
/// is kept for the life of the process. A failed attempt is not remembered, so
/// the next caller starts a new one.
pub struct ConnectionCache {
    database_url: Option<String>,
    seed_path: Option<PathBuf>,
    conn: OnceCell<DatabaseConnection>,
    attempts: AtomicUsize,
}

impl ConnectionCache {
    pub fn new(database_url: Option<String>, seed_path: Option<PathBuf>) -> Self {
        if database_url.is_none() {
            warn!("no DATABASE_URL provided; catalog routes will fail until one is configured");
        }
        Self { database_url, seed_path, conn: OnceCell::new(), attempts: AtomicUsize::new(0) }
    }

    pub async fn ensure_connected(&self) -> AppResult<&DatabaseConnection> {
        self.conn.get_or_try_init(|| self.connect()).await
    }

    /// Number of connection attempts actually started.
    #[cfg(test)]
    pub fn connect_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> AppResult<DatabaseConnection> {
        let Some(url) = self.database_url.as_deref() else {
            return Err(anyhow::anyhow!("DATABASE_URL is not configured").into());
        };

        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        info!(attempt, "connecting to film store");

        let result: AppResult<DatabaseConnection> = async {
            let db = connect_and_migrate(url).await?;
            if let Some(path) = &self.seed_path {
                seed::seed_if_empty(&db, path).await?;
            }
            Ok(db)
        }
        .await;

        match result {
            Ok(db) => {
                info!(attempt, "film store ready");
                Ok(db)
            },
            Err(err) => {
                warn!(attempt, error = %err, "film store connection failed");
                Err(err)
            },
        }
    }
}

pub async fn connect_and_migrate(database_url: &str) -> AppResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url.to_string());
    if is_in_memory(database_url) {
        // Every pooled connection to `:memory:` would see its own empty database.
        opts.max_connections(1).min_connections(1);
    }
    let db = Database::connect(opts).await?;

    execute_batch(&db, PRAGMAS).await?;
    execute_batch(&db, MIGRATION_001).await?;
    Ok(db)
}

/// Runs each `;`-separated statement of `sql` in order.
async fn execute_batch(db: &DatabaseConnection, sql: &str) -> AppResult<()> {
    let backend = db.get_database_backend();
    for stmt in sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        db.execute(Statement::from_string(backend, stmt.to_string())).await?;
    }
    Ok(())
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

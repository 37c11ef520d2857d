//! `SQLite` backend: one `kv_records` table of text keys and text values.
//!
//! Keys follow the in-memory store: `progress:<username>` holds a JSON
//! progress record and `current_user` holds the remembered username. The
//! table is created by the v1 migration.

use std::sync::Arc;
use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{CurrentUserRepository, ProgressRepository, Storage};

mod kv_repo;
mod migrate;

/// Applied to every new connection.
const CONNECTION_PRAGMAS: [&str; 2] = ["PRAGMA journal_mode = WAL;", "PRAGMA busy_timeout = 5000;"];

/// Text key-value store behind both repository traits.
#[derive(Clone)]
pub struct SqliteKvStore {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteKvStore {
    /// Open the store at `database_url`.
    ///
    /// Writes go through one long-lived connection. Saves are therefore
    /// applied in order, and `sqlite::memory:` keeps its data while the
    /// store lives.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the database cannot be opened or a
    /// connection pragma fails.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    for pragma in CONNECTION_PRAGMAS {
                        sqlx::query(pragma).execute(&mut *conn).await?;
                    }
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create `kv_records` and the migration ledger if missing.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if a migration statement fails.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Progress and current-user repositories sharing one `SQLite` store.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the store cannot be opened or migrated.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let store = SqliteKvStore::connect(database_url).await?;
        store.migrate().await?;
        let progress: Arc<dyn ProgressRepository> = Arc::new(store.clone());
        let current_user: Arc<dyn CurrentUserRepository> = Arc::new(store);
        Ok(Self {
            progress,
            current_user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wonder_core::model::{Level, UserProgress, Username};

    #[test]
    fn store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteKvStore>();
    }

    #[tokio::test]
    async fn both_repositories_share_one_table() {
        let storage = Storage::sqlite("sqlite::memory:").await.unwrap();
        let alex = Username::parse("Alex").unwrap();
        let progress = UserProgress::default().merge(Level::ColorChallenge, 80, 3);

        storage.progress.save_progress(&alex, &progress).await.unwrap();
        storage.current_user.set_current_user(Some(&alex)).await.unwrap();

        assert_eq!(storage.progress.get_progress(&alex).await.unwrap(), Some(progress));
        assert_eq!(storage.current_user.get_current_user().await.unwrap(), Some(alex));
    }

    #[tokio::test]
    async fn older_letter_points_load_from_sqlite() {
        let store = SqliteKvStore::connect("sqlite::memory:").await.unwrap();
        store.migrate().await.unwrap();
        store
            .put_raw(
                "progress:Alex",
                r#"{"level1Score":75,"level2Score":50,"level3Score":1000,"totalStars":9,"gamesPlayed":4}"#,
            )
            .await
            .unwrap();

        let alex = Username::parse("Alex").unwrap();
        let progress = store.get_progress(&alex).await.unwrap().unwrap();

        assert_eq!(progress.level3_score(), 100);
        assert_eq!(progress.total_stars(), 9);
    }
}

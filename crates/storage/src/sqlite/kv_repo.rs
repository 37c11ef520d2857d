use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use wonder_core::model::{UserProgress, Username};

use super::SqliteKvStore;
use crate::repository::{
    CURRENT_USER_KEY, CurrentUserRepository, ProgressRecord, ProgressRepository, StorageError,
    decode_username, progress_key,
};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

impl SqliteKvStore {
    async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_records WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };

        row.try_get::<String, _>("value")
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn put_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO kv_records (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn delete_value(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_records WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }

    /// Write a raw record, bypassing encoding.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the write fails.
    pub async fn put_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.put_value(key, value).await
    }
}

#[async_trait]
impl ProgressRepository for SqliteKvStore {
    async fn get_progress(&self, username: &Username) -> Result<Option<UserProgress>, StorageError> {
        self.get_value(&progress_key(username))
            .await?
            .map(|raw| ProgressRecord::decode(&raw))
            .transpose()
    }

    async fn save_progress(
        &self,
        username: &Username,
        progress: &UserProgress,
    ) -> Result<(), StorageError> {
        let encoded = ProgressRecord::from_progress(progress).encode()?;
        self.put_value(&progress_key(username), &encoded).await
    }
}

#[async_trait]
impl CurrentUserRepository for SqliteKvStore {
    async fn get_current_user(&self) -> Result<Option<Username>, StorageError> {
        self.get_value(CURRENT_USER_KEY)
            .await?
            .map(|raw| decode_username(&raw))
            .transpose()
    }

    async fn set_current_user(&self, username: Option<&Username>) -> Result<(), StorageError> {
        match username {
            Some(name) => self.put_value(CURRENT_USER_KEY, name.as_str()).await,
            None => self.delete_value(CURRENT_USER_KEY).await,
        }
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use wonder_core::model::{MAX_LEVEL_SCORE, ProgressError, UserProgress, Username};
use wonder_core::scoring;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Key of the record holding the last logged-in username.
pub const CURRENT_USER_KEY: &str = "current_user";

/// Key of the progress record for `username`.
#[must_use]
pub fn progress_key(username: &Username) -> String {
    format!("progress:{username}")
}

/// Persisted shape for a user's progress.
///
/// Field names follow the text format the game has always written. Records
/// from older builds hold the raw letter-writing point total (up to 1000) in
/// `level3Score`; those are rescaled to a percentage on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub level1_score: u32,
    pub level2_score: u32,
    pub level3_score: u32,
    pub total_stars: u32,
    pub games_played: u32,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_progress(progress: &UserProgress) -> Self {
        Self {
            level1_score: progress.level1_score(),
            level2_score: progress.level2_score(),
            level3_score: progress.level3_score(),
            total_stars: progress.total_stars(),
            games_played: progress.games_played(),
        }
    }

    /// Convert the record back into domain progress.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if a level score is out of range.
    pub fn into_progress(self) -> Result<UserProgress, ProgressError> {
        let level3_score = if self.level3_score > MAX_LEVEL_SCORE {
            scoring::letter_points_as_percentage(self.level3_score)
        } else {
            self.level3_score
        };
        UserProgress::from_persisted(
            self.level1_score,
            self.level2_score,
            level3_score,
            self.total_stars,
            self.games_played,
        )
    }

    /// Serialize to the persisted text form.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if encoding fails.
    pub fn encode(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Parse and validate the persisted text form.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the text is malformed or holds
    /// out-of-range values.
    pub fn decode(raw: &str) -> Result<UserProgress, StorageError> {
        let record: Self =
            serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
        record
            .into_progress()
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

pub(crate) fn decode_username(raw: &str) -> Result<Username, StorageError> {
    Username::parse(raw).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Repository contract for per-user progress.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch a user's progress.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored record cannot be
    /// decoded, or other storage errors.
    async fn get_progress(&self, username: &Username) -> Result<Option<UserProgress>, StorageError>;

    /// Persist or replace a user's progress.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_progress(
        &self,
        username: &Username,
        progress: &UserProgress,
    ) -> Result<(), StorageError>;
}

/// Repository contract for the single last-logged-in username record.
#[async_trait]
pub trait CurrentUserRepository: Send + Sync {
    /// Fetch the remembered username, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored value is not a valid
    /// username, or other storage errors.
    async fn get_current_user(&self) -> Result<Option<Username>, StorageError>;

    /// Remember `username`, or forget the current one when `None`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be written.
    async fn set_current_user(&self, username: Option<&Username>) -> Result<(), StorageError>;
}

/// Simple in-memory key-value repository for testing and prototyping.
///
/// Records are held as text exactly as a persistent backend would hold them.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Write a raw record, bypassing encoding.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.into(), value.into());
        Ok(())
    }

    /// Read a raw record as stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(&self, username: &Username) -> Result<Option<UserProgress>, StorageError> {
        self.raw(&progress_key(username))?
            .map(|raw| ProgressRecord::decode(&raw))
            .transpose()
    }

    async fn save_progress(
        &self,
        username: &Username,
        progress: &UserProgress,
    ) -> Result<(), StorageError> {
        let encoded = ProgressRecord::from_progress(progress).encode()?;
        self.insert_raw(progress_key(username), encoded)
    }
}

#[async_trait]
impl CurrentUserRepository for InMemoryRepository {
    async fn get_current_user(&self) -> Result<Option<Username>, StorageError> {
        self.raw(CURRENT_USER_KEY)?
            .map(|raw| decode_username(&raw))
            .transpose()
    }

    async fn set_current_user(&self, username: Option<&Username>) -> Result<(), StorageError> {
        match username {
            Some(name) => self.insert_raw(CURRENT_USER_KEY, name.as_str()),
            None => self.remove(CURRENT_USER_KEY),
        }
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub current_user: Arc<dyn CurrentUserRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(&InMemoryRepository::new())
    }

    /// Wrap an existing in-memory repository, keeping a handle for inspection.
    #[must_use]
    pub fn from_in_memory(repo: &InMemoryRepository) -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let current_user: Arc<dyn CurrentUserRepository> = Arc::new(repo.clone());
        Self {
            progress,
            current_user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wonder_core::model::Level;

    fn alex() -> Username {
        Username::parse("Alex").unwrap()
    }

    #[tokio::test]
    async fn round_trips_progress() {
        let repo = InMemoryRepository::new();
        let progress = UserProgress::default().merge(Level::WordListen, 75, 2);

        repo.save_progress(&alex(), &progress).await.unwrap();

        let fetched = repo.get_progress(&alex()).await.unwrap();
        assert_eq!(fetched, Some(progress));
    }

    #[tokio::test]
    async fn progress_is_stored_as_camel_case_text() {
        let repo = InMemoryRepository::new();
        let progress = UserProgress::default().merge(Level::ColorChallenge, 50, 1);
        repo.save_progress(&alex(), &progress).await.unwrap();

        let raw = repo.raw("progress:Alex").unwrap().unwrap();
        assert!(raw.contains("\"level2Score\":50"));
        assert!(raw.contains("\"totalStars\":1"));
        assert!(raw.contains("\"gamesPlayed\":1"));
    }

    #[tokio::test]
    async fn missing_progress_is_none() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get_progress(&alex()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn letter_points_from_older_records_load_as_percentage() {
        let repo = InMemoryRepository::new();
        repo.insert_raw(
            "progress:Alex",
            r#"{"level1Score":75,"level2Score":50,"level3Score":1000,"totalStars":9,"gamesPlayed":4}"#,
        )
        .unwrap();

        let progress = repo.get_progress(&alex()).await.unwrap().unwrap();

        assert_eq!(progress.level1_score(), 75);
        assert_eq!(progress.level3_score(), 100);
        assert_eq!(progress.total_stars(), 9);
        assert_eq!(progress.games_played(), 4);
    }

    #[tokio::test]
    async fn corrupt_progress_is_a_serialization_error() {
        let repo = InMemoryRepository::new();
        repo.insert_raw("progress:Alex", "{not json").unwrap();
        let err = repo.get_progress(&alex()).await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));

        repo.insert_raw(
            "progress:Alex",
            r#"{"level1Score":250,"level2Score":0,"level3Score":0,"totalStars":0,"gamesPlayed":0}"#,
        )
        .unwrap();
        let err = repo.get_progress(&alex()).await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[tokio::test]
    async fn current_user_set_and_clear() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get_current_user().await.unwrap(), None);

        repo.set_current_user(Some(&alex())).await.unwrap();
        assert_eq!(repo.get_current_user().await.unwrap(), Some(alex()));

        repo.set_current_user(None).await.unwrap();
        assert_eq!(repo.get_current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn blank_current_user_is_a_serialization_error() {
        let repo = InMemoryRepository::new();
        repo.insert_raw(CURRENT_USER_KEY, "   ").unwrap();
        let err = repo.get_current_user().await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}

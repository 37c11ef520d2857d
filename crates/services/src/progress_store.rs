use std::sync::Arc;

use storage::repository::{CurrentUserRepository, ProgressRepository, Storage, StorageError};
use tracing::warn;
use wonder_core::model::{Level, UserProgress, Username};

use crate::error::ProgressStoreError;

/// What a progress read found for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressLookup {
    Found(UserProgress),
    Missing,
    /// A record exists but cannot be decoded. It is left in place.
    Unreadable,
}

impl ProgressLookup {
    /// The stored progress, or the zero default.
    #[must_use]
    pub fn into_progress(self) -> UserProgress {
        match self {
            ProgressLookup::Found(progress) => progress,
            ProgressLookup::Missing | ProgressLookup::Unreadable => UserProgress::default(),
        }
    }
}

/// Holds and persists per-user cumulative progress.
///
/// Unreadable records are treated as absent: progress falls back to the zero
/// default and an unreadable current-user pointer means nobody is logged in.
#[derive(Clone)]
pub struct ProgressStore {
    progress: Arc<dyn ProgressRepository>,
    current_user: Arc<dyn CurrentUserRepository>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(
        progress: Arc<dyn ProgressRepository>,
        current_user: Arc<dyn CurrentUserRepository>,
    ) -> Self {
        Self {
            progress,
            current_user,
        }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(
            Arc::clone(&storage.progress),
            Arc::clone(&storage.current_user),
        )
    }

    /// Read the persisted progress for `username`, telling a missing record
    /// apart from one that cannot be decoded.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if the backend cannot be reached.
    pub async fn lookup(&self, username: &Username) -> Result<ProgressLookup, ProgressStoreError> {
        match self.progress.get_progress(username).await {
            Ok(Some(progress)) => Ok(ProgressLookup::Found(progress)),
            Ok(None) => Ok(ProgressLookup::Missing),
            Err(StorageError::Serialization(reason)) => {
                warn!(user = %username, %reason, "unreadable progress record");
                Ok(ProgressLookup::Unreadable)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Load persisted progress for `username`, or the zero default.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if the backend cannot be reached. A corrupt
    /// record is not an error.
    pub async fn load(&self, username: &Username) -> Result<UserProgress, ProgressStoreError> {
        Ok(self.lookup(username).await?.into_progress())
    }

    /// Persist progress for `username`; completes once the write is durable.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if the write fails.
    pub async fn save(
        &self,
        username: &Username,
        progress: &UserProgress,
    ) -> Result<(), ProgressStoreError> {
        self.progress.save_progress(username, progress).await?;
        Ok(())
    }

    /// Fold a completed session into `current`. Does not persist.
    #[must_use]
    pub fn merge(current: &UserProgress, level: Level, score: u32, stars: u8) -> UserProgress {
        current.merge(level, score, stars)
    }

    /// The remembered username from a previous run, if readable.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if the backend cannot be reached.
    pub async fn current_user(&self) -> Result<Option<Username>, ProgressStoreError> {
        match self.current_user.get_current_user().await {
            Ok(found) => Ok(found),
            Err(StorageError::Serialization(reason)) => {
                warn!(%reason, "discarding unreadable current-user record");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Remember `username` so the next run resumes the session.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if the write fails.
    pub async fn set_current_user(&self, username: &Username) -> Result<(), ProgressStoreError> {
        self.current_user.set_current_user(Some(username)).await?;
        Ok(())
    }

    /// Forget the remembered username.
    ///
    /// # Errors
    ///
    /// Returns `ProgressStoreError` if the write fails.
    pub async fn clear_current_user(&self) -> Result<(), ProgressStoreError> {
        self.current_user.set_current_user(None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::{CURRENT_USER_KEY, InMemoryRepository};

    fn store_with(repo: &InMemoryRepository) -> ProgressStore {
        ProgressStore::from_storage(&Storage::from_in_memory(repo))
    }

    fn alex() -> Username {
        Username::parse("Alex").unwrap()
    }

    #[tokio::test]
    async fn load_defaults_when_missing() {
        let store = store_with(&InMemoryRepository::new());
        assert_eq!(store.load(&alex()).await.unwrap(), UserProgress::default());
    }

    #[tokio::test]
    async fn load_returns_saved_progress() {
        let store = store_with(&InMemoryRepository::new());
        let progress = ProgressStore::merge(&UserProgress::default(), Level::WordListen, 75, 2);
        store.save(&alex(), &progress).await.unwrap();
        assert_eq!(store.load(&alex()).await.unwrap(), progress);
    }

    #[tokio::test]
    async fn corrupt_record_falls_back_to_default() {
        let repo = InMemoryRepository::new();
        repo.insert_raw("progress:Alex", "]]]").unwrap();
        let store = store_with(&repo);
        assert_eq!(store.load(&alex()).await.unwrap(), UserProgress::default());
    }

    #[tokio::test]
    async fn lookup_separates_missing_from_unreadable() {
        let repo = InMemoryRepository::new();
        let store = store_with(&repo);
        assert_eq!(store.lookup(&alex()).await.unwrap(), ProgressLookup::Missing);

        repo.insert_raw("progress:Alex", "{\"level1Score\":").unwrap();
        assert_eq!(store.lookup(&alex()).await.unwrap(), ProgressLookup::Unreadable);
        assert_eq!(
            repo.raw("progress:Alex").unwrap().as_deref(),
            Some("{\"level1Score\":")
        );
    }

    #[tokio::test]
    async fn corrupt_pointer_means_nobody_logged_in() {
        let repo = InMemoryRepository::new();
        repo.insert_raw(CURRENT_USER_KEY, "").unwrap();
        let store = store_with(&repo);
        assert_eq!(store.current_user().await.unwrap(), None);
    }

    #[test]
    fn merge_replay_of_lower_score_keeps_best() {
        let after_70 = ProgressStore::merge(&UserProgress::default(), Level::ColorChallenge, 70, 2);
        let after_50 = ProgressStore::merge(&after_70, Level::ColorChallenge, 50, 1);
        assert_eq!(after_50.level2_score(), 70);
        assert_eq!(after_50.total_stars(), 3);
        assert_eq!(after_50.games_played(), 2);
    }
}

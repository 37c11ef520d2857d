use tracing::info;
use wonder_core::model::{GameOutcome, SessionState, UserProgress, Username};

use crate::error::SessionError;
use crate::progress_store::{ProgressLookup, ProgressStore};

/// Owns the current-user identity and the live view of that user's progress.
///
/// In-memory state only changes after the matching write has succeeded, so a
/// storage failure leaves the session as it was.
pub struct SessionManager {
    store: ProgressStore,
    state: SessionState,
    progress: UserProgress,
}

impl SessionManager {
    /// An anonymous session with no progress visible.
    #[must_use]
    pub fn new(store: ProgressStore) -> Self {
        Self {
            store,
            state: SessionState::Anonymous,
            progress: UserProgress::default(),
        }
    }

    /// Resume the session remembered from a previous run, if any.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Store` if the backend cannot be reached.
    pub async fn restore(store: ProgressStore) -> Result<Self, SessionError> {
        let mut manager = Self::new(store);
        if let Some(username) = manager.store.current_user().await? {
            let progress = manager.store.load(&username).await?;
            info!(user = %username, "resumed previous session");
            manager.state = SessionState::Authenticated(username);
            manager.progress = progress;
        }
        Ok(manager)
    }

    /// Log in as `raw` (trimmed) and load that user's progress.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidInput` if the name is blank, or
    /// `SessionError::Store` if persistence fails. The session is unchanged
    /// on error.
    ///
    /// An unreadable progress record is not overwritten here; the user starts
    /// from zero and the record is replaced by their next saved result.
    pub async fn login(&mut self, raw: &str) -> Result<&UserProgress, SessionError> {
        let username = Username::parse(raw)?;
        let lookup = self.store.lookup(&username).await?;
        let progress = match lookup {
            ProgressLookup::Unreadable => UserProgress::default(),
            found => {
                let progress = found.into_progress();
                self.store.save(&username, &progress).await?;
                progress
            }
        };
        // The pointer is written only once progress is stored.
        self.store.set_current_user(&username).await?;

        info!(user = %username, games_played = progress.games_played(), "logged in");
        self.state = SessionState::Authenticated(username);
        self.progress = progress;
        Ok(&self.progress)
    }

    /// Log out and reset the live progress view.
    ///
    /// Progress already saved for the user is kept.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Store` if the current-user record cannot be cleared.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        let Some(username) = self.state.username() else {
            return Ok(());
        };
        self.store.clear_current_user().await?;

        info!(user = %username, "logged out");
        self.state = SessionState::Anonymous;
        self.progress = UserProgress::default();
        Ok(())
    }

    /// Merge a completed level into the user's progress and persist it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAuthenticated` while anonymous, or
    /// `SessionError::Store` if the save fails.
    pub async fn record_outcome(
        &mut self,
        outcome: &GameOutcome,
    ) -> Result<&UserProgress, SessionError> {
        let SessionState::Authenticated(username) = &self.state else {
            return Err(SessionError::NotAuthenticated);
        };

        let merged = ProgressStore::merge(
            &self.progress,
            outcome.level(),
            outcome.progress_score(),
            outcome.stars(),
        );
        self.store.save(username, &merged).await?;

        info!(
            user = %username,
            level = outcome.level().number(),
            score = outcome.final_score(),
            stars = outcome.stars(),
            total_stars = merged.total_stars(),
            "recorded level result"
        );
        self.progress = merged;
        Ok(&self.progress)
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&Username> {
        self.state.username()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    #[must_use]
    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    #[must_use]
    pub fn store(&self) -> &ProgressStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use storage::repository::{
        CurrentUserRepository, InMemoryRepository, ProgressRepository, Storage, StorageError,
    };
    use wonder_core::model::Level;
    use wonder_core::time::fixed_now;

    struct BrokenPointer;

    #[async_trait]
    impl CurrentUserRepository for BrokenPointer {
        async fn get_current_user(&self) -> Result<Option<Username>, StorageError> {
            Ok(None)
        }

        async fn set_current_user(&self, _username: Option<&Username>) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk full".into()))
        }
    }

    struct ReadOnlyProgress;

    #[async_trait]
    impl ProgressRepository for ReadOnlyProgress {
        async fn get_progress(
            &self,
            _username: &Username,
        ) -> Result<Option<UserProgress>, StorageError> {
            Ok(None)
        }

        async fn save_progress(
            &self,
            _username: &Username,
            _progress: &UserProgress,
        ) -> Result<(), StorageError> {
            Err(StorageError::Connection("read-only".into()))
        }
    }

    fn manager(repo: &InMemoryRepository) -> SessionManager {
        SessionManager::new(ProgressStore::from_storage(&Storage::from_in_memory(repo)))
    }

    fn outcome(level: Level, correct: u32, total: u32, score: u32, stars: u8) -> GameOutcome {
        GameOutcome::new(level, correct, total, score, stars, fixed_now(), fixed_now())
    }

    #[tokio::test]
    async fn blank_login_is_rejected() {
        let repo = InMemoryRepository::new();
        let mut session = manager(&repo);

        let err = session.login("  ").await.unwrap_err();

        assert!(matches!(err, SessionError::InvalidInput(_)));
        assert_eq!(session.state(), &SessionState::Anonymous);
        assert_eq!(repo.raw("current_user").unwrap(), None);
    }

    #[tokio::test]
    async fn login_persists_pointer_and_progress() {
        let repo = InMemoryRepository::new();
        let mut session = manager(&repo);

        session.login(" Alex ").await.unwrap();

        assert_eq!(session.current_user().map(Username::as_str), Some("Alex"));
        assert_eq!(repo.raw("current_user").unwrap().as_deref(), Some("Alex"));
        assert!(repo.raw("progress:Alex").unwrap().is_some());
    }

    #[tokio::test]
    async fn login_keeps_letter_points_from_older_records() {
        let repo = InMemoryRepository::new();
        repo.insert_raw(
            "progress:Alex",
            r#"{"level1Score":75,"level2Score":50,"level3Score":1000,"totalStars":9,"gamesPlayed":4}"#,
        )
        .unwrap();
        let mut session = manager(&repo);

        let progress = session.login("Alex").await.unwrap();

        assert_eq!(progress.total_stars(), 9);
        assert_eq!(progress.games_played(), 4);
        assert_eq!(progress.level3_score(), 100);
        let stored = repo.raw("progress:Alex").unwrap().unwrap();
        assert!(stored.contains("\"totalStars\":9"));
        assert!(stored.contains("\"level3Score\":100"));
    }

    #[tokio::test]
    async fn login_leaves_unreadable_record_in_place() {
        let repo = InMemoryRepository::new();
        repo.insert_raw("progress:Alex", "{\"totalStars\":9,").unwrap();
        let mut session = manager(&repo);

        session.login("Alex").await.unwrap();

        assert_eq!(session.progress(), &UserProgress::default());
        assert_eq!(
            repo.raw("progress:Alex").unwrap().as_deref(),
            Some("{\"totalStars\":9,")
        );
        assert_eq!(repo.raw("current_user").unwrap().as_deref(), Some("Alex"));
    }

    #[tokio::test]
    async fn failed_pointer_write_leaves_session_anonymous() {
        let repo = InMemoryRepository::new();
        let storage = Storage::from_in_memory(&repo);
        let store = ProgressStore::new(Arc::clone(&storage.progress), Arc::new(BrokenPointer));
        let mut session = SessionManager::new(store);

        let err = session.login("Alex").await.unwrap_err();

        assert!(matches!(err, SessionError::Store(_)));
        assert_eq!(session.state(), &SessionState::Anonymous);
        assert_eq!(repo.raw("current_user").unwrap(), None);
    }

    #[tokio::test]
    async fn failed_progress_write_does_not_remember_user() {
        let repo = InMemoryRepository::new();
        let storage = Storage::from_in_memory(&repo);
        let store = ProgressStore::new(
            Arc::new(ReadOnlyProgress),
            Arc::clone(&storage.current_user),
        );
        let mut session = SessionManager::new(store);

        assert!(session.login("Alex").await.is_err());

        assert!(!session.is_authenticated());
        assert_eq!(repo.raw("current_user").unwrap(), None);
    }

    #[tokio::test]
    async fn logout_keeps_saved_progress() {
        let repo = InMemoryRepository::new();
        let mut session = manager(&repo);
        session.login("Alex").await.unwrap();
        session
            .record_outcome(&outcome(Level::WordListen, 6, 8, 75, 2))
            .await
            .unwrap();

        session.logout().await.unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(session.progress(), &UserProgress::default());
        assert_eq!(repo.raw("current_user").unwrap(), None);

        session.login("Alex").await.unwrap();
        assert_eq!(session.progress().level1_score(), 75);
    }

    #[tokio::test]
    async fn record_outcome_requires_login() {
        let mut session = manager(&InMemoryRepository::new());
        let err = session
            .record_outcome(&outcome(Level::WordListen, 8, 8, 100, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NotAuthenticated));
    }

    #[tokio::test]
    async fn restore_resumes_remembered_user() {
        let repo = InMemoryRepository::new();
        {
            let mut first_run = manager(&repo);
            first_run.login("Alex").await.unwrap();
            first_run
                .record_outcome(&outcome(Level::ColorChallenge, 8, 8, 100, 3))
                .await
                .unwrap();
        }

        let store = ProgressStore::from_storage(&Storage::from_in_memory(&repo));
        let second_run = SessionManager::restore(store).await.unwrap();

        assert_eq!(second_run.current_user().map(Username::as_str), Some("Alex"));
        assert_eq!(second_run.progress().level2_score(), 100);
        assert_eq!(second_run.progress().total_stars(), 3);
    }

    #[tokio::test]
    async fn restore_without_pointer_is_anonymous() {
        let store = ProgressStore::from_storage(&Storage::in_memory());
        let session = SessionManager::restore(store).await.unwrap();
        assert!(!session.is_authenticated());
    }
}

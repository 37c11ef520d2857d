use storage::repository::Storage;
use wonder_core::model::VoiceSettings;

use crate::Clock;
use crate::error::AppServicesError;
use crate::games::GameLauncher;
use crate::navigation::NavigationController;
use crate::progress_store::ProgressStore;
use crate::session_manager::SessionManager;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    progress_store: ProgressStore,
    voice: VoiceSettings,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Services over a throwaway in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        Self {
            clock,
            progress_store: ProgressStore::from_storage(storage),
            voice: VoiceSettings::default(),
        }
    }

    #[must_use]
    pub fn with_voice_settings(mut self, voice: VoiceSettings) -> Self {
        self.voice = voice;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn progress_store(&self) -> ProgressStore {
        self.progress_store.clone()
    }

    #[must_use]
    pub fn voice_settings(&self) -> &VoiceSettings {
        &self.voice
    }

    /// Launcher using this app's clock and an OS-seeded generator.
    #[must_use]
    pub fn launcher(&self) -> GameLauncher {
        GameLauncher::new(self.clock)
    }

    /// Resume the remembered session, or start anonymous.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Session` if the store cannot be read.
    pub async fn session(&self) -> Result<SessionManager, AppServicesError> {
        Ok(SessionManager::restore(self.progress_store()).await?)
    }

    /// Navigation over the restored session.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Session` if the store cannot be read.
    pub async fn navigation(
        &self,
        launcher: GameLauncher,
    ) -> Result<NavigationController, AppServicesError> {
        let session = self.session().await?;
        Ok(NavigationController::new(session, launcher))
    }
}

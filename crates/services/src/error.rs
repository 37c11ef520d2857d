//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use wonder_core::model::UsernameError;

use crate::collaborators::CollaboratorError;
use crate::navigation::Screen;

/// Errors emitted by `ProgressStore`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressStoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SessionManager`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] UsernameError),
    #[error("no user is logged in")]
    NotAuthenticated,
    #[error(transparent)]
    Store(#[from] ProgressStoreError),
}

/// Errors emitted by game controllers and remote answer helpers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error("no questions available for level")]
    Empty,
    #[error("nothing was drawn")]
    EmptyDrawing,
    #[error(transparent)]
    ExternalService(#[from] CollaboratorError),
}

/// Errors emitted by `NavigationController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NavigationError {
    #[error("cannot {action} from the {screen} screen")]
    InvalidTransition { screen: Screen, action: &'static str },
    #[error("no level is running")]
    NoActiveGame,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Errors emitted by `ReadingAidService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReadingAidError {
    #[error("unsupported file type: {media_type}")]
    UnsupportedFile { media_type: String },
    #[error("no text has been extracted yet")]
    NothingToRead,
    #[error(transparent)]
    ExternalService(#[from] CollaboratorError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

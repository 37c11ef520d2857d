#![forbid(unsafe_code)]

pub mod app_services;
pub mod collaborators;
pub mod error;
pub mod games;
pub mod navigation;
pub mod progress_store;
pub mod reading_aid;
pub mod session_manager;

pub use wonder_core::Clock;

pub use app_services::AppServices;
pub use error::{
    AppServicesError, GameError, NavigationError, ProgressStoreError, ReadingAidError,
    SessionError,
};
pub use games::{
    ActiveGame, Advance, AnswerTicket, GameLauncher, GamePhase, GameSessionController,
    PendingAnswer, Submission,
};
pub use navigation::{GameStep, NavigationController, Screen};
pub use progress_store::{ProgressLookup, ProgressStore};
pub use reading_aid::{PlaybackState, ReadingAidService};
pub use session_manager::SessionManager;

use thiserror::Error;

use crate::model::{LevelError, ProgressError, UsernameError, VoiceSettingsError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Username(#[from] UsernameError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    VoiceSettings(#[from] VoiceSettingsError),
}

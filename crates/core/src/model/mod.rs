mod ids;
mod level;
mod progress;
pub mod question;
mod reading;
mod session;
mod voice_settings;

pub use ids::{GameId, Username, UsernameError};
pub use level::{Level, LevelError};
pub use progress::{MAX_LEVEL_SCORE, ProgressError, UserProgress};
pub use question::{Color, ColorQuestion, LetterQuestion, Question, WordQuestion};
pub use reading::{ExtractedContent, SourceKind, UploadedFile};
pub use session::{GameOutcome, SessionState};
pub use voice_settings::{VoiceSettings, VoiceSettingsDraft, VoiceSettingsError};

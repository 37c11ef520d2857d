mod active;
mod catalog;
mod controller;
mod launcher;
mod matcher;
mod progress;
mod remote;
mod rules;

// Public API of the game subsystem.
pub use crate::error::GameError;
pub use active::{ActiveGame, ColorChallengeGame, WordListenGame, WriteLettersGame};
pub use catalog::{ColorChallengeGenerator, LetterCatalog, QuestionSource, WordListenCatalog};
pub use controller::{Advance, AnswerTicket, GamePhase, GameSessionController, IgnoreReason, Submission};
pub use launcher::GameLauncher;
pub use matcher::{AnswerMatcher, CaseInsensitiveMatch, FirstLetterMatch};
pub use progress::GameProgress;
pub use remote::{PendingAnswer, listen_for_answer, read_handwriting};
pub use rules::{FinalScoreRule, LevelRules, MissPolicy};

use chrono::{DateTime, Utc};

use crate::model::{Level, Username};
use crate::scoring;

/// Who is currently using the app.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(Username),
}

impl SessionState {
    #[must_use]
    pub fn username(&self) -> Option<&Username> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(name) => Some(name),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

/// Result of one completed level session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    level: Level,
    correct: u32,
    total: u32,
    final_score: u32,
    stars: u8,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl GameOutcome {
    #[must_use]
    pub fn new(
        level: Level,
        correct: u32,
        total: u32,
        final_score: u32,
        stars: u8,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            level,
            correct,
            total,
            final_score,
            stars,
            started_at,
            completed_at,
        }
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Number of questions answered correctly.
    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Score reported for the session: a percentage for levels 1-2, raw points for level 3.
    #[must_use]
    pub fn final_score(&self) -> u32 {
        self.final_score
    }

    #[must_use]
    pub fn stars(&self) -> u8 {
        self.stars
    }

    /// Percentage stored as the level's best score in `UserProgress`.
    #[must_use]
    pub fn progress_score(&self) -> u32 {
        match self.level {
            Level::WordListen | Level::ColorChallenge => self.final_score,
            Level::WriteLetters => scoring::percentage(self.correct, self.total),
        }
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

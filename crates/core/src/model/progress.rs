use thiserror::Error;

use crate::model::Level;

/// Errors raised when rehydrating progress from persisted values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("level {level} score out of range: {score}")]
    ScoreOutOfRange { level: u8, score: u32 },
}

/// Highest value a per-level score can take.
pub const MAX_LEVEL_SCORE: u32 = 100;

/// Cumulative per-user record of best scores, total stars, and session count.
///
/// Level scores are best-of-all-time percentages; stars and games played are
/// additive and never decrease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserProgress {
    level1_score: u32,
    level2_score: u32,
    level3_score: u32,
    total_stars: u32,
    games_played: u32,
}

impl UserProgress {
    /// Rehydrate progress from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::ScoreOutOfRange` if any level score exceeds 100.
    pub fn from_persisted(
        level1_score: u32,
        level2_score: u32,
        level3_score: u32,
        total_stars: u32,
        games_played: u32,
    ) -> Result<Self, ProgressError> {
        for (level, score) in [(1, level1_score), (2, level2_score), (3, level3_score)] {
            if score > MAX_LEVEL_SCORE {
                return Err(ProgressError::ScoreOutOfRange { level, score });
            }
        }

        Ok(Self {
            level1_score,
            level2_score,
            level3_score,
            total_stars,
            games_played,
        })
    }

    /// Fold one completed session into this progress.
    ///
    /// The level score is max-merged (clamped to 100), stars are added and the
    /// games-played counter is bumped by one. Returns a new value; `self` is
    /// left untouched.
    #[must_use]
    pub fn merge(&self, level: Level, score: u32, stars: u8) -> Self {
        let mut next = *self;
        let score = score.min(MAX_LEVEL_SCORE);
        let slot = match level {
            Level::WordListen => &mut next.level1_score,
            Level::ColorChallenge => &mut next.level2_score,
            Level::WriteLetters => &mut next.level3_score,
        };
        *slot = (*slot).max(score);
        next.total_stars = next.total_stars.saturating_add(u32::from(stars));
        next.games_played = next.games_played.saturating_add(1);
        next
    }

    #[must_use]
    pub fn level_score(&self, level: Level) -> u32 {
        match level {
            Level::WordListen => self.level1_score,
            Level::ColorChallenge => self.level2_score,
            Level::WriteLetters => self.level3_score,
        }
    }

    /// Rounded mean of the three level scores, as shown on the dashboard.
    #[must_use]
    pub fn average_score(&self) -> u32 {
        let sum = self.level1_score + self.level2_score + self.level3_score;
        (sum + 1) / 3
    }

    #[must_use]
    pub fn level1_score(&self) -> u32 {
        self.level1_score
    }

    #[must_use]
    pub fn level2_score(&self) -> u32 {
        self.level2_score
    }

    #[must_use]
    pub fn level3_score(&self) -> u32 {
        self.level3_score
    }

    #[must_use]
    pub fn total_stars(&self) -> u32 {
        self.total_stars
    }

    #[must_use]
    pub fn games_played(&self) -> u32 {
        self.games_played
    }
}

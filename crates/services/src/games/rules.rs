use std::time::Duration;

use wonder_core::model::Level;
use wonder_core::scoring::{self, LETTER_POINTS_PER_ANSWER, LETTER_POINTS_PER_STAR, StarRule};

/// How the reported final score is derived at completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalScoreRule {
    /// `round(correct / total * 100)`.
    Percentage,
    /// The raw point accumulator.
    RawPoints,
}

/// What happens after a wrong answer once feedback has been shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissPolicy {
    /// Move on to the next question.
    #[default]
    Advance,
    /// Stay on the same question until it is answered correctly.
    Retry,
}

/// Per-level configuration for a `GameSessionController`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRules {
    level: Level,
    unit_points: u32,
    final_score: FinalScoreRule,
    star_rule: StarRule,
    feedback_delay: Duration,
    miss_policy: MissPolicy,
}

impl LevelRules {
    #[must_use]
    pub fn for_level(level: Level) -> Self {
        match level {
            Level::WordListen => Self::word_listen(),
            Level::ColorChallenge => Self::color_challenge(),
            Level::WriteLetters => Self::write_letters(),
        }
    }

    #[must_use]
    pub fn word_listen() -> Self {
        Self {
            level: Level::WordListen,
            unit_points: 1,
            final_score: FinalScoreRule::Percentage,
            star_rule: StarRule::PercentageBands,
            feedback_delay: Duration::from_secs(2),
            miss_policy: MissPolicy::Advance,
        }
    }

    #[must_use]
    pub fn color_challenge() -> Self {
        Self {
            level: Level::ColorChallenge,
            unit_points: 1,
            final_score: FinalScoreRule::Percentage,
            star_rule: StarRule::PercentageBands,
            feedback_delay: Duration::from_secs(3),
            miss_policy: MissPolicy::Advance,
        }
    }

    #[must_use]
    pub fn write_letters() -> Self {
        Self {
            level: Level::WriteLetters,
            unit_points: LETTER_POINTS_PER_ANSWER,
            final_score: FinalScoreRule::RawPoints,
            star_rule: StarRule::PointBands {
                points_per_star: LETTER_POINTS_PER_STAR,
            },
            feedback_delay: Duration::from_millis(1500),
            miss_policy: MissPolicy::Advance,
        }
    }

    #[must_use]
    pub fn with_feedback_delay(mut self, delay: Duration) -> Self {
        self.feedback_delay = delay;
        self
    }

    #[must_use]
    pub fn with_miss_policy(mut self, policy: MissPolicy) -> Self {
        self.miss_policy = policy;
        self
    }

    /// Final score for a finished session.
    #[must_use]
    pub fn final_score(&self, points: u32, correct: u32, total: u32) -> u32 {
        match self.final_score {
            FinalScoreRule::Percentage => scoring::percentage(correct, total),
            FinalScoreRule::RawPoints => points,
        }
    }

    #[must_use]
    pub fn stars(&self, final_score: u32) -> u8 {
        self.star_rule.stars(final_score)
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn unit_points(&self) -> u32 {
        self.unit_points
    }

    #[must_use]
    pub fn feedback_delay(&self) -> Duration {
        self.feedback_delay
    }

    #[must_use]
    pub fn miss_policy(&self) -> MissPolicy {
        self.miss_policy
    }
}

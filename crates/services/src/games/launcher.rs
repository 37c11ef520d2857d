use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wonder_core::model::Level;

use crate::Clock;
use crate::error::GameError;

use super::active::ActiveGame;
use super::catalog::{ColorChallengeGenerator, LetterCatalog, WordListenCatalog};
use super::controller::GameSessionController;
use super::matcher::{CaseInsensitiveMatch, FirstLetterMatch};
use super::rules::{LevelRules, MissPolicy};

/// Builds a fresh controller for a level with its default rules.
pub struct GameLauncher {
    clock: Clock,
    rng: StdRng,
    feedback_delay: Option<Duration>,
    miss_policy: Option<MissPolicy>,
}

impl GameLauncher {
    /// Launcher seeded from the operating system.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self::with_rng(clock, StdRng::from_os_rng())
    }

    /// Launcher with a caller-provided generator, for reproducible level 2 prompts.
    #[must_use]
    pub fn with_rng(clock: Clock, rng: StdRng) -> Self {
        Self {
            clock,
            rng,
            feedback_delay: None,
            miss_policy: None,
        }
    }

    /// Override every level's feedback delay.
    #[must_use]
    pub fn with_feedback_delay(mut self, delay: Duration) -> Self {
        self.feedback_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn without_delays(self) -> Self {
        self.with_feedback_delay(Duration::ZERO)
    }

    /// Override every level's behavior after a wrong answer.
    #[must_use]
    pub fn with_miss_policy(mut self, policy: MissPolicy) -> Self {
        self.miss_policy = Some(policy);
        self
    }

    #[must_use]
    pub fn rules_for(&self, level: Level) -> LevelRules {
        let mut rules = LevelRules::for_level(level);
        if let Some(delay) = self.feedback_delay {
            rules = rules.with_feedback_delay(delay);
        }
        if let Some(policy) = self.miss_policy {
            rules = rules.with_miss_policy(policy);
        }
        rules
    }

    /// Start `level` from its first question.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Empty` if the level has no questions.
    pub fn launch(&mut self, level: Level) -> Result<ActiveGame, GameError> {
        let rules = self.rules_for(level);
        let game = match level {
            Level::WordListen => GameSessionController::start(
                rules,
                &mut WordListenCatalog,
                CaseInsensitiveMatch,
                self.clock,
            )?
            .into(),
            Level::ColorChallenge => {
                let mut generator = ColorChallengeGenerator::new(&mut self.rng);
                GameSessionController::start(rules, &mut generator, CaseInsensitiveMatch, self.clock)?
                    .into()
            }
            Level::WriteLetters => GameSessionController::start(
                rules,
                &mut LetterCatalog,
                FirstLetterMatch,
                self.clock,
            )?
            .into(),
        };
        Ok(game)
    }
}

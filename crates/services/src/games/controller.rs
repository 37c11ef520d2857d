use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use wonder_core::model::{GameId, GameOutcome, Level, Question};

use crate::Clock;
use crate::error::GameError;

use super::catalog::QuestionSource;
use super::matcher::AnswerMatcher;
use super::progress::GameProgress;
use super::remote::PendingAnswer;
use super::rules::{LevelRules, MissPolicy};

//
// ─── TICKETS & RESULTS ─────────────────────────────────────────────────────────
//

/// Identifies the question an asynchronous answer was captured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnswerTicket {
    game_id: GameId,
    index: usize,
}

impl AnswerTicket {
    #[must_use]
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Observable state of a running level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    InProgress { index: usize, score: u32 },
    Feedback { index: usize, score: u32, correct: bool },
    Complete { final_score: u32, stars: u8 },
}

/// Why a submission was dropped without touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    AwaitingFeedback,
    Completed,
    StaleTicket,
}

/// Result of submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Evaluated { correct: bool, expected: String },
    Ignored(IgnoreReason),
}

impl Submission {
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Submission::Ignored(_))
    }
}

/// Result of moving past the feedback display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Next { index: usize },
    Retry { index: usize },
    /// Returned once, on the transition into `Complete`.
    Completed(GameOutcome),
    /// No answer has been evaluated for the current question yet.
    NotReady,
    /// The level already completed.
    Finished,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Runs one level: a fixed question list, a score and the feedback cycle.
///
/// `InProgress -> Feedback -> InProgress ... -> Complete`. Answers are only
/// evaluated in `InProgress`; `advance` is only meaningful from `Feedback`.
#[derive(Debug)]
pub struct GameSessionController<Q, M> {
    id: GameId,
    rules: LevelRules,
    questions: Vec<Q>,
    matcher: M,
    clock: Clock,
    started_at: DateTime<Utc>,
    index: usize,
    points: u32,
    correct: u32,
    feedback: Option<bool>,
    result: Option<(u32, u8)>,
}

impl<Q, M> GameSessionController<Q, M>
where
    Q: Question,
    M: AnswerMatcher<Q>,
{
    /// Start a level with questions drawn from `source`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Empty` if the source yields no questions.
    pub fn start<S>(
        rules: LevelRules,
        source: &mut S,
        matcher: M,
        clock: Clock,
    ) -> Result<Self, GameError>
    where
        S: QuestionSource<Q> + ?Sized,
    {
        let questions = source.questions();
        if questions.is_empty() {
            return Err(GameError::Empty);
        }

        let id = GameId::new();
        debug!(game = ?id, level = rules.level().number(), questions = questions.len(), "level started");
        Ok(Self {
            id,
            rules,
            questions,
            matcher,
            clock,
            started_at: clock.now(),
            index: 0,
            points: 0,
            correct: 0,
            feedback: None,
            result: None,
        })
    }

    #[must_use]
    pub fn id(&self) -> GameId {
        self.id
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.rules.level()
    }

    #[must_use]
    pub fn rules(&self) -> &LevelRules {
        &self.rules
    }

    #[must_use]
    pub fn feedback_delay(&self) -> Duration {
        self.rules.feedback_delay()
    }

    #[must_use]
    pub fn questions(&self) -> &[Q] {
        &self.questions
    }

    /// The question on screen, or `None` once complete.
    #[must_use]
    pub fn current_question(&self) -> Option<&Q> {
        if self.result.is_some() {
            return None;
        }
        self.questions.get(self.index)
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        if let Some((final_score, stars)) = self.result {
            return GamePhase::Complete { final_score, stars };
        }
        match self.feedback {
            Some(correct) => GamePhase::Feedback {
                index: self.index,
                score: self.points,
                correct,
            },
            None => GamePhase::InProgress {
                index: self.index,
                score: self.points,
            },
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub fn progress(&self) -> GameProgress {
        GameProgress {
            total: self.questions.len(),
            current: (self.index + 1).min(self.questions.len()),
            correct: self.correct,
            points: self.points,
            is_complete: self.is_complete(),
        }
    }

    /// Ticket for the question currently awaiting an answer.
    #[must_use]
    pub fn ticket(&self) -> AnswerTicket {
        AnswerTicket {
            game_id: self.id,
            index: self.index,
        }
    }

    /// Evaluate `candidate` against the current question.
    pub fn submit_answer(&mut self, candidate: &str) -> Submission {
        if self.result.is_some() {
            return Submission::Ignored(IgnoreReason::Completed);
        }
        if self.feedback.is_some() {
            return Submission::Ignored(IgnoreReason::AwaitingFeedback);
        }
        let Some(question) = self.questions.get(self.index) else {
            return Submission::Ignored(IgnoreReason::Completed);
        };

        let expected = question.expected_answer();
        let correct = self.matcher.is_match(question, candidate);
        if correct {
            self.points = self.points.saturating_add(self.rules.unit_points());
            self.correct = self.correct.saturating_add(1);
        }
        self.feedback = Some(correct);

        debug!(
            game = ?self.id,
            index = self.index,
            correct,
            score = self.points,
            "answer evaluated"
        );
        Submission::Evaluated { correct, expected }
    }

    /// Like `submit_answer`, but only if `ticket` still names the current question.
    pub fn submit_answer_for(&mut self, ticket: AnswerTicket, candidate: &str) -> Submission {
        if ticket != self.ticket() {
            debug!(game = ?self.id, ticket_index = ticket.index, index = self.index, "stale answer dropped");
            return Submission::Ignored(IgnoreReason::StaleTicket);
        }
        self.submit_answer(candidate)
    }

    /// Deliver an answer resolved by a speech or handwriting collaborator.
    pub fn submit_pending(&mut self, pending: &PendingAnswer) -> Submission {
        self.submit_answer_for(pending.ticket(), pending.text())
    }

    /// Leave the feedback display: next question, retry or completion.
    pub fn advance(&mut self) -> Advance {
        if self.result.is_some() {
            return Advance::Finished;
        }
        let Some(correct) = self.feedback.take() else {
            return Advance::NotReady;
        };

        if !correct && self.rules.miss_policy() == MissPolicy::Retry {
            return Advance::Retry { index: self.index };
        }

        self.index += 1;
        if self.index < self.questions.len() {
            return Advance::Next { index: self.index };
        }

        Advance::Completed(self.complete())
    }

    fn complete(&mut self) -> GameOutcome {
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        let final_score = self.rules.final_score(self.points, self.correct, total);
        let stars = self.rules.stars(final_score);
        self.result = Some((final_score, stars));

        info!(
            game = ?self.id,
            level = self.level().number(),
            correct = self.correct,
            total,
            final_score,
            stars,
            "level complete"
        );
        GameOutcome::new(
            self.level(),
            self.correct,
            total,
            final_score,
            stars,
            self.started_at,
            self.clock.now(),
        )
    }
}

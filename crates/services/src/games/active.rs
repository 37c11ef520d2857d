use std::time::Duration;

use wonder_core::model::{ColorQuestion, GameId, Level, LetterQuestion, Question, WordQuestion};

use super::controller::{Advance, AnswerTicket, GamePhase, GameSessionController, Submission};
use super::matcher::{CaseInsensitiveMatch, FirstLetterMatch};
use super::progress::GameProgress;
use super::remote::PendingAnswer;

pub type WordListenGame = GameSessionController<WordQuestion, CaseInsensitiveMatch>;
pub type ColorChallengeGame = GameSessionController<ColorQuestion, CaseInsensitiveMatch>;
pub type WriteLettersGame = GameSessionController<LetterQuestion, FirstLetterMatch>;

/// The running level, whichever one it is.
#[derive(Debug)]
pub enum ActiveGame {
    WordListen(WordListenGame),
    ColorChallenge(ColorChallengeGame),
    WriteLetters(WriteLettersGame),
}

macro_rules! dispatch {
    ($self:expr, $game:ident => $body:expr) => {
        match $self {
            ActiveGame::WordListen($game) => $body,
            ActiveGame::ColorChallenge($game) => $body,
            ActiveGame::WriteLetters($game) => $body,
        }
    };
}

impl ActiveGame {
    #[must_use]
    pub fn id(&self) -> GameId {
        dispatch!(self, game => game.id())
    }

    #[must_use]
    pub fn level(&self) -> Level {
        dispatch!(self, game => game.level())
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        dispatch!(self, game => game.phase())
    }

    #[must_use]
    pub fn progress(&self) -> GameProgress {
        dispatch!(self, game => game.progress())
    }

    #[must_use]
    pub fn feedback_delay(&self) -> Duration {
        dispatch!(self, game => game.feedback_delay())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        dispatch!(self, game => game.is_complete())
    }

    #[must_use]
    pub fn ticket(&self) -> AnswerTicket {
        dispatch!(self, game => game.ticket())
    }

    /// Prompt for the question on screen, or `None` once complete.
    #[must_use]
    pub fn prompt(&self) -> Option<String> {
        dispatch!(self, game => game.current_question().map(Question::prompt))
    }

    pub fn submit_answer(&mut self, candidate: &str) -> Submission {
        dispatch!(self, game => game.submit_answer(candidate))
    }

    pub fn submit_answer_for(&mut self, ticket: AnswerTicket, candidate: &str) -> Submission {
        dispatch!(self, game => game.submit_answer_for(ticket, candidate))
    }

    pub fn submit_pending(&mut self, pending: &PendingAnswer) -> Submission {
        dispatch!(self, game => game.submit_pending(pending))
    }

    pub fn advance(&mut self) -> Advance {
        dispatch!(self, game => game.advance())
    }
}

impl From<WordListenGame> for ActiveGame {
    fn from(game: WordListenGame) -> Self {
        ActiveGame::WordListen(game)
    }
}

impl From<ColorChallengeGame> for ActiveGame {
    fn from(game: ColorChallengeGame) -> Self {
        ActiveGame::ColorChallenge(game)
    }
}

impl From<WriteLettersGame> for ActiveGame {
    fn from(game: WriteLettersGame) -> Self {
        ActiveGame::WriteLetters(game)
    }
}

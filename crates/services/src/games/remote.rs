use tracing::warn;

use crate::collaborators::{HandwritingRecognizer, SpeechInput, normalize_utterance};
use crate::error::GameError;

use super::controller::AnswerTicket;

/// An answer captured asynchronously, tagged with the question it was meant for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAnswer {
    ticket: AnswerTicket,
    text: String,
}

impl PendingAnswer {
    #[must_use]
    pub fn new(ticket: AnswerTicket, text: impl Into<String>) -> Self {
        Self {
            ticket,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn ticket(&self) -> AnswerTicket {
        self.ticket
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Capture one spoken answer for the question named by `ticket`.
///
/// # Errors
///
/// Returns `GameError::ExternalService` if recognition fails. No game state
/// is touched, so the learner can try again.
pub async fn listen_for_answer(
    speech: &dyn SpeechInput,
    ticket: AnswerTicket,
) -> Result<PendingAnswer, GameError> {
    let heard = speech.listen().await.map_err(|err| {
        warn!(error = %err, "speech recognition failed");
        err
    })?;
    Ok(PendingAnswer::new(ticket, normalize_utterance(&heard)))
}

/// Recognize a hand-drawn letter for the question named by `ticket`.
///
/// # Errors
///
/// Returns `GameError::EmptyDrawing` for an empty canvas (the recognizer is
/// not called) and `GameError::ExternalService` if recognition fails.
pub async fn read_handwriting(
    recognizer: &dyn HandwritingRecognizer,
    image: &[u8],
    ticket: AnswerTicket,
) -> Result<PendingAnswer, GameError> {
    if image.is_empty() {
        return Err(GameError::EmptyDrawing);
    }
    let guess = recognizer.recognize_character(image).await.map_err(|err| {
        warn!(error = %err, "handwriting recognition failed");
        err
    })?;
    Ok(PendingAnswer::new(ticket, guess))
}

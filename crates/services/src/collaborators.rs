//! Contracts for the external services the game relies on.
//!
//! Recognition, extraction and speech are never implemented here; hosts plug
//! in adapters for whatever platform they run on.

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by an external collaborator.
///
/// Always recoverable: the caller reports it and the action can be retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CollaboratorError {
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("service request failed: {0}")]
    Request(String),
    #[error("service returned no result")]
    NoResult,
}

/// Text recognized in an image, with the recognizer's confidence (0-100).
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedText {
    pub text: String,
    pub confidence: f32,
}

/// Playable audio produced by a voice synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Optical character recognition over image bytes.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize_text(&self, image: &[u8]) -> Result<RecognizedText, CollaboratorError>;
}

/// Extracts the text of each page of a paginated document.
#[async_trait]
pub trait DocumentTextExtractor: Send + Sync {
    async fn page_texts(&self, document: &[u8]) -> Result<Vec<String>, CollaboratorError>;
}

/// Audible playback of text or synthesized audio.
///
/// Completion is signalled back to the reading aid by the host.
pub trait SpeechOutput: Send + Sync {
    /// Start speaking `text`, replacing anything already queued.
    ///
    /// # Errors
    ///
    /// Returns `CollaboratorError` if playback cannot start.
    fn speak(&self, text: &str) -> Result<(), CollaboratorError>;

    /// Start playing pre-rendered audio.
    ///
    /// # Errors
    ///
    /// Returns `CollaboratorError` if playback cannot start.
    fn play_audio(&self, audio: &SynthesizedAudio) -> Result<(), CollaboratorError>;

    /// # Errors
    ///
    /// Returns `CollaboratorError` if the device rejects the request.
    fn pause(&self) -> Result<(), CollaboratorError>;

    /// # Errors
    ///
    /// Returns `CollaboratorError` if the device rejects the request.
    fn resume(&self) -> Result<(), CollaboratorError>;

    /// # Errors
    ///
    /// Returns `CollaboratorError` if the device rejects the request.
    fn stop(&self) -> Result<(), CollaboratorError>;
}

/// Captures one spoken utterance per call.
#[async_trait]
pub trait SpeechInput: Send + Sync {
    async fn listen(&self) -> Result<String, CollaboratorError>;

    /// Abort an in-flight `listen`. Default is a no-op.
    fn stop_listening(&self) {}
}

/// Best-guess character recognition for a hand-drawn image.
///
/// An empty string means nothing was recognized.
#[async_trait]
pub trait HandwritingRecognizer: Send + Sync {
    async fn recognize_character(&self, image: &[u8]) -> Result<String, CollaboratorError>;
}

/// Key-gated high-quality voice synthesis.
#[async_trait]
pub trait VoiceSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, CollaboratorError>;
}

/// Normalize a recognized utterance the way the speech collaborator promises:
/// lowercase and trimmed.
#[must_use]
pub fn normalize_utterance(raw: &str) -> String {
    raw.trim().to_lowercase()
}

use std::sync::Arc;

use tracing::{debug, info, warn};
use wonder_core::model::{ExtractedContent, SourceKind, UploadedFile};

use crate::collaborators::{DocumentTextExtractor, SpeechOutput, TextRecognizer, VoiceSynthesizer};
use crate::error::ReadingAidError;

/// Confidence reported for text pulled straight out of a document.
const DOCUMENT_CONFIDENCE: f32 = 100.0;

/// Read-aloud playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Extracts text from an uploaded file and reads it aloud.
pub struct ReadingAidService {
    ocr: Arc<dyn TextRecognizer>,
    documents: Arc<dyn DocumentTextExtractor>,
    speech: Arc<dyn SpeechOutput>,
    premium_voice: Option<Arc<dyn VoiceSynthesizer>>,
    content: Option<ExtractedContent>,
    playback: PlaybackState,
}

impl ReadingAidService {
    #[must_use]
    pub fn new(
        ocr: Arc<dyn TextRecognizer>,
        documents: Arc<dyn DocumentTextExtractor>,
        speech: Arc<dyn SpeechOutput>,
    ) -> Self {
        Self {
            ocr,
            documents,
            speech,
            premium_voice: None,
            content: None,
            playback: PlaybackState::Idle,
        }
    }

    /// Read aloud with synthesized audio instead of the built-in voice.
    #[must_use]
    pub fn with_premium_voice(mut self, voice: Arc<dyn VoiceSynthesizer>) -> Self {
        self.premium_voice = Some(voice);
        self
    }

    #[must_use]
    pub fn content(&self) -> Option<&ExtractedContent> {
        self.content.as_ref()
    }

    #[must_use]
    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    #[must_use]
    pub fn has_premium_voice(&self) -> bool {
        self.premium_voice.is_some()
    }

    /// Replace the current text with the text of `file`.
    ///
    /// Any previous text is discarded and playback stopped before extraction
    /// starts, so a failure leaves nothing to read.
    ///
    /// # Errors
    ///
    /// `UnsupportedFile` for anything but images and PDFs; `ExternalService`
    /// if the recognizer or extractor fails.
    pub async fn extract(
        &mut self,
        file: &UploadedFile,
    ) -> Result<&ExtractedContent, ReadingAidError> {
        self.halt();
        self.content = None;

        let content = match file.kind() {
            SourceKind::Image => {
                let recognized = self.ocr.recognize_text(&file.bytes).await.map_err(|err| {
                    warn!(file = %file.name, error = %err, "text recognition failed");
                    err
                })?;
                ExtractedContent::new(recognized.text, recognized.confidence, file.name.clone())
            }
            SourceKind::Pdf => {
                let pages = self.documents.page_texts(&file.bytes).await.map_err(|err| {
                    warn!(file = %file.name, error = %err, "document extraction failed");
                    err
                })?;
                ExtractedContent::new(pages.join("\n"), DOCUMENT_CONFIDENCE, file.name.clone())
            }
            SourceKind::Unsupported => {
                return Err(ReadingAidError::UnsupportedFile {
                    media_type: file.media_type.clone(),
                });
            }
        };

        info!(
            file = %file.name,
            chars = content.text().len(),
            confidence = content.confidence(),
            "text extracted"
        );
        Ok(self.content.insert(content))
    }

    /// Play, pause or resume reading the extracted text.
    ///
    /// # Errors
    ///
    /// `NothingToRead` without extracted text; `ExternalService` if the voice
    /// or the speech device fails. The state is unchanged on error.
    pub async fn toggle_playback(&mut self) -> Result<PlaybackState, ReadingAidError> {
        let next = match self.playback {
            PlaybackState::Playing => {
                self.speech.pause()?;
                PlaybackState::Paused
            }
            PlaybackState::Paused => {
                self.speech.resume()?;
                PlaybackState::Playing
            }
            PlaybackState::Idle => {
                self.start_reading().await?;
                PlaybackState::Playing
            }
        };
        debug!(from = ?self.playback, to = ?next, "playback toggled");
        self.playback = next;
        Ok(next)
    }

    async fn start_reading(&self) -> Result<(), ReadingAidError> {
        let text = match &self.content {
            Some(content) if !content.is_blank() => content.text(),
            _ => return Err(ReadingAidError::NothingToRead),
        };

        if let Some(voice) = &self.premium_voice {
            let audio = voice.synthesize(text).await.map_err(|err| {
                warn!(error = %err, "premium voice failed");
                err
            })?;
            self.speech.play_audio(&audio)?;
        } else {
            self.speech.speak(text)?;
        }
        Ok(())
    }

    /// Stop reading and return to idle.
    ///
    /// # Errors
    ///
    /// `ExternalService` if the speech device rejects the request.
    pub fn stop(&mut self) -> Result<(), ReadingAidError> {
        if self.playback != PlaybackState::Idle {
            self.speech.stop()?;
            self.playback = PlaybackState::Idle;
        }
        Ok(())
    }

    /// The host reports that the speech reached the end of the text.
    pub fn playback_finished(&mut self) {
        self.playback = PlaybackState::Idle;
    }

    fn halt(&mut self) {
        if self.playback == PlaybackState::Idle {
            return;
        }
        if let Err(err) = self.speech.stop() {
            warn!(error = %err, "could not stop playback");
        }
        self.playback = PlaybackState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::collaborators::{CollaboratorError, RecognizedText, SynthesizedAudio};

    struct FakeOcr(Result<RecognizedText, CollaboratorError>);

    #[async_trait]
    impl TextRecognizer for FakeOcr {
        async fn recognize_text(&self, _image: &[u8]) -> Result<RecognizedText, CollaboratorError> {
            self.0.clone()
        }
    }

    struct FakePdf(Vec<String>);

    #[async_trait]
    impl DocumentTextExtractor for FakePdf {
        async fn page_texts(&self, _document: &[u8]) -> Result<Vec<String>, CollaboratorError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct RecordingSpeech {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingSpeech {
        fn record(&self, call: impl Into<String>) -> Result<(), CollaboratorError> {
            self.calls.lock().unwrap().push(call.into());
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SpeechOutput for RecordingSpeech {
        fn speak(&self, text: &str) -> Result<(), CollaboratorError> {
            self.record(format!("speak:{text}"))
        }

        fn play_audio(&self, audio: &SynthesizedAudio) -> Result<(), CollaboratorError> {
            self.record(format!("audio:{}", audio.bytes.len()))
        }

        fn pause(&self) -> Result<(), CollaboratorError> {
            self.record("pause")
        }

        fn resume(&self) -> Result<(), CollaboratorError> {
            self.record("resume")
        }

        fn stop(&self) -> Result<(), CollaboratorError> {
            self.record("stop")
        }
    }

    struct FailingVoice;

    #[async_trait]
    impl VoiceSynthesizer for FailingVoice {
        async fn synthesize(&self, _text: &str) -> Result<SynthesizedAudio, CollaboratorError> {
            Err(CollaboratorError::Request("status 401".into()))
        }
    }

    struct FixedVoice;

    #[async_trait]
    impl VoiceSynthesizer for FixedVoice {
        async fn synthesize(&self, _text: &str) -> Result<SynthesizedAudio, CollaboratorError> {
            Ok(SynthesizedAudio {
                media_type: "audio/mpeg".into(),
                bytes: vec![0; 4],
            })
        }
    }

    fn service(speech: &Arc<RecordingSpeech>) -> ReadingAidService {
        let ocr = FakeOcr(Ok(RecognizedText {
            text: "The cat sat.".into(),
            confidence: 87.5,
        }));
        let pdf = FakePdf(vec!["Page one".into(), "Page two".into()]);
        ReadingAidService::new(Arc::new(ocr), Arc::new(pdf), Arc::clone(speech) as Arc<dyn SpeechOutput>)
    }

    fn image() -> UploadedFile {
        UploadedFile::new("page.png", "image/png", vec![1, 2, 3])
    }

    #[tokio::test]
    async fn image_text_keeps_recognizer_confidence() {
        let speech = Arc::new(RecordingSpeech::default());
        let mut aid = service(&speech);

        let content = aid.extract(&image()).await.unwrap();

        assert_eq!(content.text(), "The cat sat.");
        assert!((content.confidence() - 87.5).abs() < f32::EPSILON);
        assert_eq!(content.source(), "page.png");
    }

    #[tokio::test]
    async fn pdf_pages_are_joined_with_full_confidence() {
        let speech = Arc::new(RecordingSpeech::default());
        let mut aid = service(&speech);
        let pdf = UploadedFile::new("story.pdf", "application/pdf", vec![9]);

        let content = aid.extract(&pdf).await.unwrap();

        assert_eq!(content.text(), "Page one\nPage two");
        assert!((content.confidence() - 100.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn unsupported_file_clears_previous_text() {
        let speech = Arc::new(RecordingSpeech::default());
        let mut aid = service(&speech);
        aid.extract(&image()).await.unwrap();

        let doc = UploadedFile::new("notes.docx", "application/msword", vec![1]);
        let err = aid.extract(&doc).await.unwrap_err();

        assert!(matches!(err, ReadingAidError::UnsupportedFile { .. }));
        assert!(aid.content().is_none());
    }

    #[tokio::test]
    async fn recognizer_failure_is_reported() {
        let speech = Arc::new(RecordingSpeech::default());
        let ocr = FakeOcr(Err(CollaboratorError::Unavailable("offline".into())));
        let mut aid = ReadingAidService::new(
            Arc::new(ocr),
            Arc::new(FakePdf(Vec::new())),
            Arc::clone(&speech) as Arc<dyn SpeechOutput>,
        );

        let err = aid.extract(&image()).await.unwrap_err();

        assert!(matches!(err, ReadingAidError::ExternalService(_)));
        assert!(aid.content().is_none());
    }

    #[tokio::test]
    async fn toggle_cycles_play_pause_resume() {
        let speech = Arc::new(RecordingSpeech::default());
        let mut aid = service(&speech);
        aid.extract(&image()).await.unwrap();

        assert_eq!(aid.toggle_playback().await.unwrap(), PlaybackState::Playing);
        assert_eq!(aid.toggle_playback().await.unwrap(), PlaybackState::Paused);
        assert_eq!(aid.toggle_playback().await.unwrap(), PlaybackState::Playing);
        aid.stop().unwrap();

        assert_eq!(aid.playback(), PlaybackState::Idle);
        assert_eq!(
            speech.calls(),
            vec!["speak:The cat sat.", "pause", "resume", "stop"]
        );
    }

    #[tokio::test]
    async fn nothing_to_read_without_text() {
        let speech = Arc::new(RecordingSpeech::default());
        let mut aid = service(&speech);

        let err = aid.toggle_playback().await.unwrap_err();

        assert!(matches!(err, ReadingAidError::NothingToRead));
        assert_eq!(aid.playback(), PlaybackState::Idle);
    }

    #[tokio::test]
    async fn finished_playback_returns_to_idle() {
        let speech = Arc::new(RecordingSpeech::default());
        let mut aid = service(&speech);
        aid.extract(&image()).await.unwrap();
        aid.toggle_playback().await.unwrap();

        aid.playback_finished();

        assert_eq!(aid.playback(), PlaybackState::Idle);
    }

    #[tokio::test]
    async fn premium_voice_plays_synthesized_audio() {
        let speech = Arc::new(RecordingSpeech::default());
        let mut aid = service(&speech).with_premium_voice(Arc::new(FixedVoice));
        aid.extract(&image()).await.unwrap();

        aid.toggle_playback().await.unwrap();

        assert_eq!(speech.calls(), vec!["audio:4"]);
    }

    #[tokio::test]
    async fn premium_voice_failure_stays_idle() {
        let speech = Arc::new(RecordingSpeech::default());
        let mut aid = service(&speech).with_premium_voice(Arc::new(FailingVoice));
        aid.extract(&image()).await.unwrap();

        let err = aid.toggle_playback().await.unwrap_err();

        assert!(matches!(err, ReadingAidError::ExternalService(_)));
        assert_eq!(aid.playback(), PlaybackState::Idle);
        assert!(speech.calls().is_empty());
    }
}

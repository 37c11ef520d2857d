//! Terminal stand-ins for the speech and recognition collaborators.

use std::path::Path;

use async_trait::async_trait;
use services::collaborators::{
    CollaboratorError, DocumentTextExtractor, RecognizedText, SpeechOutput, SynthesizedAudio,
    TextRecognizer,
};

/// Prints what would be spoken.
#[derive(Debug, Default)]
pub struct ConsoleSpeech;

impl SpeechOutput for ConsoleSpeech {
    fn speak(&self, text: &str) -> Result<(), CollaboratorError> {
        println!("(reading aloud)\n{text}");
        Ok(())
    }

    fn play_audio(&self, audio: &SynthesizedAudio) -> Result<(), CollaboratorError> {
        println!("(playing {} bytes of {})", audio.bytes.len(), audio.media_type);
        Ok(())
    }

    fn pause(&self) -> Result<(), CollaboratorError> {
        println!("(paused)");
        Ok(())
    }

    fn resume(&self) -> Result<(), CollaboratorError> {
        println!("(resumed)");
        Ok(())
    }

    fn stop(&self) -> Result<(), CollaboratorError> {
        println!("(stopped)");
        Ok(())
    }
}

/// No OCR engine ships with the console build.
#[derive(Debug, Default)]
pub struct UnavailableOcr;

#[async_trait]
impl TextRecognizer for UnavailableOcr {
    async fn recognize_text(&self, _image: &[u8]) -> Result<RecognizedText, CollaboratorError> {
        Err(CollaboratorError::Unavailable(
            "text recognition is not available in the console build".into(),
        ))
    }
}

/// Reads documents that carry a plain UTF-8 text layer, one page per
/// form-feed separated chunk.
#[derive(Debug, Default)]
pub struct PlainTextPages;

#[async_trait]
impl DocumentTextExtractor for PlainTextPages {
    async fn page_texts(&self, document: &[u8]) -> Result<Vec<String>, CollaboratorError> {
        let text = std::str::from_utf8(document)
            .map_err(|_| CollaboratorError::Request("document has no readable text layer".into()))?;
        Ok(text.split('\u{c}').map(|page| page.trim().to_string()).collect())
    }
}

/// Media type guessed from a file extension.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_types_follow_extension() {
        assert_eq!(media_type_for(Path::new("story.PDF")), "application/pdf");
        assert_eq!(media_type_for(Path::new("page.jpeg")), "image/jpeg");
        assert_eq!(media_type_for(Path::new("notes")), "application/octet-stream");
    }

    #[tokio::test]
    async fn pages_split_on_form_feed() {
        let pages = PlainTextPages
            .page_texts(b"Once upon a time\x0cThe end\n")
            .await
            .unwrap();
        assert_eq!(pages, vec!["Once upon a time", "The end"]);
    }

    #[tokio::test]
    async fn binary_documents_are_rejected() {
        let err = PlainTextPages.page_texts(&[0xff, 0xfe]).await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Request(_)));
    }
}

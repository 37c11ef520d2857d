/// Kind of file handed to the reading aid, derived from its media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Image,
    Pdf,
    Unsupported,
}

impl SourceKind {
    #[must_use]
    pub fn from_media_type(media_type: &str) -> Self {
        let media_type = media_type.trim().to_ascii_lowercase();
        if media_type.starts_with("image/") {
            SourceKind::Image
        } else if media_type == "application/pdf" {
            SourceKind::Pdf
        } else {
            SourceKind::Unsupported
        }
    }
}

/// A file the learner wants read aloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    #[must_use]
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    #[must_use]
    pub fn kind(&self) -> SourceKind {
        SourceKind::from_media_type(&self.media_type)
    }
}

/// Text pulled out of an uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContent {
    text: String,
    confidence: f32,
    source: String,
}

impl ExtractedContent {
    /// Confidence is clamped to 0..=100.
    #[must_use]
    pub fn new(text: impl Into<String>, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: confidence.clamp(0.0, 100.0),
            source: source.into(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_types_map_to_kinds() {
        assert_eq!(SourceKind::from_media_type("image/png"), SourceKind::Image);
        assert_eq!(SourceKind::from_media_type("IMAGE/JPEG"), SourceKind::Image);
        assert_eq!(SourceKind::from_media_type("application/pdf"), SourceKind::Pdf);
        assert_eq!(SourceKind::from_media_type("text/plain"), SourceKind::Unsupported);
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(ExtractedContent::new("hi", 140.0, "a.png").confidence(), 100.0);
        assert_eq!(ExtractedContent::new("hi", -3.0, "a.png").confidence(), 0.0);
    }
}

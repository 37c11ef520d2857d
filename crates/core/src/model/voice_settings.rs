use thiserror::Error;
use url::Url;

/// Configuration for the optional premium voice used by the reading aid.
///
/// The premium voice is only enabled when an API key is present.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct VoiceSettings {
    api_key: Option<String>,
    voice_id: Option<String>,
    api_base_url: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct VoiceSettingsDraft {
    pub api_key: Option<String>,
    pub voice_id: Option<String>,
    pub api_base_url: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VoiceSettingsError {
    #[error("invalid base URL")]
    InvalidBaseUrl,
}

impl VoiceSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `VoiceSettingsError` if the base URL is present but invalid.
    pub fn validate(self) -> Result<VoiceSettings, VoiceSettingsError> {
        let api_key = normalize_optional(self.api_key);
        let voice_id = normalize_optional(self.voice_id);
        let api_base_url = normalize_optional(self.api_base_url);

        if let Some(url) = api_base_url.as_ref() {
            if Url::parse(url).is_err() {
                return Err(VoiceSettingsError::InvalidBaseUrl);
            }
        }

        Ok(VoiceSettings {
            api_key,
            voice_id,
            api_base_url,
        })
    }
}

impl VoiceSettings {
    /// True when a premium voice key has been configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[must_use]
    pub fn voice_id(&self) -> Option<&str> {
        self.voice_id.as_deref()
    }

    #[must_use]
    pub fn api_base_url(&self) -> Option<&str> {
        self.api_base_url.as_deref()
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

use std::fmt;

use super::{ConfigError, optional, required};

pub const DEFAULT_ELEVEN_BASE_URL: &str = "https://api.elevenlabs.io";

/// Settings for the speech playback utility.
#[derive(Clone)]
pub struct SpeechConfig {
    pub eleven_api_key: Box<str>,
    pub eleven_base_url: Box<str>,
}

impl SpeechConfig {
    pub fn new(eleven_api_key: impl Into<Box<str>>, eleven_base_url: impl Into<Box<str>>) -> Self {
        Self {
            eleven_api_key: eleven_api_key.into(),
            eleven_base_url: eleven_base_url.into(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            eleven_api_key: required(&lookup, "ELEVEN_API_KEY")?,
            eleven_base_url: optional(&lookup, "ELEVEN_BASE_URL", DEFAULT_ELEVEN_BASE_URL),
        })
    }
}

impl fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechConfig")
            .field("eleven_api_key", &"<redacted>")
            .field("eleven_base_url", &self.eleven_base_url)
            .finish()
    }
}

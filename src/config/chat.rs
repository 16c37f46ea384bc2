use std::fmt;

use super::{ConfigError, optional, parse_flag, required};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://ai-helper-mvp.vercel.app";
pub const DEFAULT_PORT: u16 = 8000;

/// Settings for the chat relay service.
#[derive(Clone)]
pub struct ChatConfig {
    pub openai_api_key: Box<str>,
    pub openai_base_url: Box<str>,
    pub model: Box<str>,
    pub allowed_origin: Box<str>,
    pub enforce_disclaimer: bool,
    pub port: u16,
}

impl ChatConfig {
    pub fn new(openai_api_key: impl Into<Box<str>>, openai_base_url: impl Into<Box<str>>) -> Self {
        Self {
            openai_api_key: openai_api_key.into(),
            openai_base_url: openai_base_url.into(),
            model: DEFAULT_MODEL.into(),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.into(),
            enforce_disclaimer: false,
            port: DEFAULT_PORT,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(port) if !port.trim().is_empty() => {
                port.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                    name: "PORT",
                    value: port.into(),
                })?
            }
            _ => DEFAULT_PORT,
        };

        Ok(Self {
            openai_api_key: required(&lookup, "OPENAI_API_KEY")?,
            openai_base_url: optional(&lookup, "OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            model: optional(&lookup, "OPENAI_MODEL", DEFAULT_MODEL),
            allowed_origin: optional(&lookup, "CORS_ALLOWED_ORIGIN", DEFAULT_ALLOWED_ORIGIN),
            enforce_disclaimer: parse_flag(&lookup, "ENFORCE_DISCLAIMER")?,
            port,
        })
    }
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("model", &self.model)
            .field("allowed_origin", &self.allowed_origin)
            .field("enforce_disclaimer", &self.enforce_disclaimer)
            .field("port", &self.port)
            .finish()
    }
}

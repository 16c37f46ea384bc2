//! Process configuration.
//!
//! Everything is read once from the environment at startup (after `.env` has
//! been loaded by the binary) into plain structs that get handed to whatever
//! makes outbound calls.

#[cfg(feature = "chat-in")]
mod chat;
#[cfg(feature = "speech")]
mod speech;

#[cfg(feature = "chat-in")]
pub use chat::ChatConfig;
#[cfg(feature = "speech")]
pub use speech::SpeechConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),
    #[error("{name} environment variable is invalid: {value:?}")]
    Invalid { name: &'static str, value: Box<str> },
}

#[cfg(any(feature = "chat-in", feature = "speech"))]
fn required(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<Box<str>, ConfigError> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().into()),
        _ => Err(ConfigError::Missing(name)),
    }
}

#[cfg(any(feature = "chat-in", feature = "speech"))]
fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> Box<str> {
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
        .into_boxed_str()
}

#[cfg(feature = "chat-in")]
fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<bool, ConfigError> {
    match lookup(name).as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { name, value: value.into() }),
        },
    }
}

#[cfg(test)]
pub(crate) fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |name: &str| {
        pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| (*value).to_owned())
    }
}

//! Chat-completion client for an OpenAI-compatible provider.

mod error;
pub use error::InferError;
mod openai;
use openai::{OpenAIMessage, OpenAIRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
}

impl MessageRole {
    pub fn into_role_str(self) -> &'static str {
        match self {
            Self::System => openai::ROLE_SYSTEM,
            Self::User => openai::ROLE_USER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: Box<str>,
}

impl Message {
    pub fn new_text_system(content: impl Into<Box<str>>) -> Self {
        Self { role: MessageRole::System, content: content.into() }
    }

    pub fn new_text_user(content: impl Into<Box<str>>) -> Self {
        Self { role: MessageRole::User, content: content.into() }
    }
}

/// Sampling knobs sent with every completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f64,
    pub top_p: f64,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 1.0,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
        }
    }
}

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: Box<str>,
    infer_url: Box<str>,
    model: Box<str>,
    sampling: Sampling,
}

impl Client {
    pub fn new(
        api_key: impl Into<Box<str>>,
        infer_url: impl Into<Box<str>>,
        model: impl Into<Box<str>>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            infer_url: infer_url.into(),
            model: model.into(),
            sampling: Sampling::default(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one completion request and returns the first choice's content
    /// as the provider wrote it.
    pub async fn complete(&self, messages: &[Message]) -> Result<Box<str>, InferError> {
        let messages = as_openai_messages(messages);
        let request = OpenAIRequest {
            model: &self.model,
            messages: &messages,
            temperature: self.sampling.temperature,
            top_p: self.sampling.top_p,
            presence_penalty: self.sampling.presence_penalty,
            frequency_penalty: self.sampling.frequency_penalty,
        };

        let reply = openai::openai_request(&self.http, &self.infer_url, &self.api_key, &request).await?;
        tracing::info!(model = %self.model, reply_chars = reply.chars().count(), "Completion received");
        Ok(reply)
    }
}

fn as_openai_messages(messages: &[Message]) -> Vec<OpenAIMessage<'_>> {
    messages
        .iter()
        .map(|message| OpenAIMessage {
            role: message.role.into_role_str(),
            content: &message.content,
        })
        .collect()
}

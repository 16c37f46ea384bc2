use serde::{Deserialize, Serialize};

use super::InferError;

pub const ROLE_SYSTEM: &str = "system";
pub const ROLE_USER: &str = "user";

#[derive(Debug, Serialize)]
pub struct OpenAIRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [OpenAIMessage<'a>],
    pub temperature: f64,
    pub top_p: f64,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
}

#[derive(Debug, Serialize)]
pub struct OpenAIMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<Box<str>>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    error: OpenAIErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorBody {
    message: Box<str>,
}

/// Pulls `error.message` out of an OpenAI error payload, falling back to the
/// raw body for providers that answer with something else.
fn error_message(body: &str) -> Box<str> {
    match serde_json::from_str::<OpenAIError>(body) {
        Ok(error) => error.error.message,
        Err(_) => body.trim().into(),
    }
}

pub async fn openai_request(
    http: &reqwest::Client,
    infer_url: &str,
    api_key: &str,
    request: &OpenAIRequest<'_>,
) -> Result<Box<str>, InferError> {
    let response = http
        .post(format!("{}/v1/chat/completions", infer_url.trim_end_matches('/')))
        .bearer_auth(api_key)
        .json(request)
        .send()
        .await?;

    let status = response.status();
    let response_text = response.text().await?;

    if !status.is_success() {
        return Err(InferError::ErrorResponse {
            status: status.as_u16(),
            message: error_message(&response_text),
        });
    }

    let response: OpenAIResponse = serde_json::from_str(&response_text)?;
    let choice = response.choices.into_iter().next().ok_or(InferError::NoChoices)?;
    choice.message.content.ok_or(InferError::EmptyContent)
}

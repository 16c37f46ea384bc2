use crate::{
    actuators::chat::dto::{ChatRequest, ChatResponse},
    service::{self, HttpErrorBody},
};

/// Talks to a running chat relay over HTTP.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: Box<str>,
}

impl ChatClient {
    pub fn new(base_url: impl Into<Box<str>>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub async fn chat(&self, request: &ChatRequest) -> service::Result<ChatResponse> {
        let response = self
            .http
            .post(format!("{}/chat", self.base_url.trim_end_matches('/')))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<HttpErrorBody>()
                .await
                .ok()
                .map(|body| body.error);
            return Err(service::Error::ErrorResponse {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<ChatResponse>().await?)
    }

    pub async fn ask(&self, user_input: &str, context: Option<&str>) -> service::Result<Box<str>> {
        let response = self
            .chat(&ChatRequest {
                user_input: user_input.into(),
                context: context.map(Into::into),
            })
            .await?;
        Ok(response.response.into_boxed_str())
    }
}

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;

mod handlers;

pub use handlers::build_router;

use super::dto::ChatRequest;
use crate::config::{ChatConfig, ConfigError};
use crate::infer::{Client, Message};
use crate::prompts::system;

pub struct AppState {
    pub infer: Client,
    pub allowed_origin: HeaderValue,
    pub enforce_disclaimer: bool,
}

impl AppState {
    pub fn from_config(config: &ChatConfig) -> Result<Self, ConfigError> {
        let allowed_origin =
            HeaderValue::from_str(&config.allowed_origin).map_err(|_| ConfigError::Invalid {
                name: "CORS_ALLOWED_ORIGIN",
                value: config.allowed_origin.clone(),
            })?;

        Ok(Self {
            infer: Client::new(
                config.openai_api_key.clone(),
                config.openai_base_url.clone(),
                config.model.clone(),
            ),
            allowed_origin,
            enforce_disclaimer: config.enforce_disclaimer,
        })
    }
}

/// Builds the outbound conversation: the fixed instructions, then the
/// situation description if one was given, then the trimmed question.
pub fn build_messages(request: &ChatRequest) -> Vec<Message> {
    let mut messages = Vec::with_capacity(3);
    messages.push(system::system());

    if let Some(context) = request.context.as_deref()
        && !context.is_empty()
    {
        messages.push(system::context(context));
    }

    messages.push(Message::new_text_user(request.user_input.trim()));
    messages
}

pub async fn serve(config: ChatConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    tracing::info!(
        model = state.infer.model(),
        allowed_origin = %config.allowed_origin,
        "Chat relay configured"
    );

    let router = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}

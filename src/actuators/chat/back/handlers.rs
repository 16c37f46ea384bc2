use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::cors::{AllowCredentials, AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use super::{AppState, build_messages};
use crate::{
    actuators::chat::dto::{ChatRequest, ChatResponse},
    prompts::system,
    service,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    // Configure CORS; credentials rule out wildcards, so methods and headers
    // are mirrored from the preflight instead. Other origins get no grant.
    let allowed_origin = state.allowed_origin.clone();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([allowed_origin.clone()]))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(AllowCredentials::predicate(move |origin, _| *origin == allowed_origin));

    // Build router
    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> service::Result<Json<ChatResponse>> {
    let messages = build_messages(&request);
    tracing::debug!(message_count = messages.len(), "Relaying question");

    let reply = state.infer.complete(&messages).await?;
    let reply = reply.trim();

    let response = if state.enforce_disclaimer {
        system::ensure_disclaimer(reply).into_owned()
    } else {
        reply.to_owned()
    };

    Ok(Json(ChatResponse { response }))
}

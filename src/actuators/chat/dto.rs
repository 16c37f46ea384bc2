use lawdesk_macro::dto;

#[allow(unused_imports)]
use serde::{Deserialize, Serialize};

#[dto(chat, request, clone, eq)]
pub struct ChatRequest {
    pub user_input: String,
    pub context: Option<String>,
}

#[dto(chat, response, clone, eq)]
pub struct ChatResponse {
    pub response: String,
}

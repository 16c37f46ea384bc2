use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Response parsing failed: {0}")]
    ParseFailed(#[from] serde_json::Error),

    #[error("Error response from API ({status}): {message}")]
    ErrorResponse { status: u16, message: Box<str> },

    #[error("API returned no choices")]
    NoChoices,

    #[error("API returned a choice without content")]
    EmptyContent,
}

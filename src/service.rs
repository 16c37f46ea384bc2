#[cfg(any(feature = "server-http2", feature = "client-http2"))]
#[allow(unused_imports)]
use serde::{Deserialize, Serialize};

/// Errors surfaced across the HTTP boundary, shared by the relay and the
/// `chat-out` client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Relay side: the completion provider failed.
    #[error("Upstream failure: {0}")]
    Upstream(Box<str>),
    /// Client side: the relay could not be reached.
    #[error("Request failed: {0}")]
    RequestFailed(Box<str>),
    /// Either side: an HTTP status with an optional error message.
    #[error("Error response ({status}): {}", .message.as_deref().unwrap_or("<no message>"))]
    ErrorResponse { status: u16, message: Option<Box<str>> },
    /// Client side: the relay's reply did not decode.
    #[error("Invalid Response")]
    InvalidResponse,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Message returned to HTTP callers when the completion provider fails. The
/// provider's own error text stays in the server log.
pub const UPSTREAM_FAILURE: &str = "upstream failure";

#[cfg(feature = "infer")]
impl From<crate::infer::InferError> for Error {
    fn from(error: crate::infer::InferError) -> Self {
        Error::Upstream(error.to_string().into())
    }
}

#[cfg(feature = "client-http2")]
impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Error::InvalidResponse
        } else {
            Error::RequestFailed(error.to_string().into())
        }
    }
}

#[cfg(any(feature = "server-http2", feature = "client-http2"))]
#[cfg_attr(feature = "server-http2", derive(Serialize))]
#[cfg_attr(feature = "client-http2", derive(Deserialize))]
pub(crate) struct HttpErrorBody {
    pub error: Box<str>,
}

#[cfg(feature = "server-http2")]
impl axum::response::IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, message): (StatusCode, Box<str>) = match self {
            Error::Upstream(reason) => {
                tracing::error!("Upstream failure: {}", reason);
                (StatusCode::BAD_GATEWAY, UPSTREAM_FAILURE.into())
            }
            Error::ErrorResponse { status, message } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message.unwrap_or_else(|| "error".into()),
            ),
            // Client-side failures, only seen here if a handler forwards one
            error @ (Error::RequestFailed(_) | Error::InvalidResponse) => {
                tracing::error!("Unexpected client error in handler: {}", error);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
        };

        (status, axum::Json(HttpErrorBody { error: message })).into_response()
    }
}

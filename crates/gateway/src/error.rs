//! Request-boundary error type and its HTTP mapping.

use {
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde_json::json,
    thiserror::Error,
};

use wagate_session::{ChatIdError, SessionError};

/// Everything a handler can fail with. Every variant maps to a JSON
/// `{"error": …}` body; no failure is fatal to the process.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing fields ({0})")]
    MissingFields(&'static str),

    #[error("{0}")]
    InvalidRecipient(#[from] ChatIdError),

    #[error("session is not ready, pair the device and wait for it to connect")]
    SessionNotReady,

    #[error("invalid base64 payload: {0}")]
    InvalidPayload(String),

    #[error("failed to download remote file: {0}")]
    UpstreamFetch(String),

    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::SessionNotReady => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotReady => Self::SessionNotReady,
            SessionError::Delivery(msg) => Self::Delivery(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

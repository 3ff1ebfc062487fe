//! Error type for every API-facing operation in this crate.

use satchel_core::import::UploadGateError;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Why an operation failed.
///
/// The split matters to callers: [`ApiError::Network`] and
/// [`ApiError::Status`] leave local state untouched, while
/// [`ApiError::SessionExpired`] means the transport has already wiped
/// the stored tokens and the user must log in again.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS,
    /// timeout). Nothing is retried automatically.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response, with the server's `detail` message when the
    /// body carried one.
    #[error("API error ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },

    /// The single refresh attempt failed (or the replay was rejected
    /// again); stored tokens are gone and auth state is reset.
    #[error("session expired")]
    SessionExpired,

    /// The client-side upload gate rejected the file; no request was made.
    #[error(transparent)]
    InvalidUpload(#[from] UploadGateError),

    /// Local validation blocked the operation; no request was made.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// HTTP status code, when the failure was a server response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server-provided `detail` message, when there was one.
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// What to show the user. Prefers the server's own message when it
    /// sent one (or the gate/validation message for local rejections);
    /// everything else gets the caller's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::InvalidUpload(gate) => gate.to_string(),
            Self::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Pull the `detail` field out of an error body, if it parses as JSON.
pub(crate) fn detail_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    }
}

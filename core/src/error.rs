//! Error type for the App Annie client.
//!
//! # Design
//! The service reports failures inside the JSON body, so there are exactly two
//! ways a call can fail: the body never arrived or could not be decoded
//! (`Connection`, always code 0), or it decoded and the service said no
//! (`Remote`, with the service's own code and message). Callers branch on
//! `code()` to decide whether a retry makes sense; the client never retries.

use thiserror::Error;

/// Message reported for every transport or decoding failure.
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection Error";

/// Errors returned by `ApiClient` calls and `process_response`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request failed at the transport level, or the response body was
    /// not a non-empty JSON object. `detail` keeps the underlying cause.
    #[error("Connection Error: {detail}")]
    Connection { detail: String },

    /// The service answered with a `code` other than 200.
    #[error("remote error {code}: {message}")]
    Remote { code: i64, message: String },
}

impl ApiError {
    pub fn connection(detail: impl Into<String>) -> Self {
        ApiError::Connection {
            detail: detail.into(),
        }
    }

    /// Numeric code: 0 for connection failures, the remote `code` otherwise.
    pub fn code(&self) -> i64 {
        match self {
            ApiError::Connection { .. } => 0,
            ApiError::Remote { code, .. } => *code,
        }
    }

    /// Message as the service contract defines it: `"Connection Error"` for
    /// transport failures, the remote `error` field otherwise.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Connection { .. } => CONNECTION_ERROR_MESSAGE,
            ApiError::Remote { message, .. } => message,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, ApiError::Connection { .. })
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::connection(format!("invalid JSON body: {err}"))
    }
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        ApiError::connection(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

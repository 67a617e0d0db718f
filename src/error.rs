//! Error types for the pocketbook client.
//!
//! Command handlers and other orchestration code use `anyhow` and attach context as errors
//! bubble up. The API layer uses [`ApiError`] so that callers which need to distinguish a
//! network failure from an HTTP rejection or a malformed payload can do so without string
//! matching.

use reqwest::StatusCode;
use serde::Deserialize;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The message used when a non-2xx response carries no usable `detail` field.
pub const GENERIC_FAILURE: &str = "API request failed";

/// An error from a backend API call.
///
/// The `Display` implementation preserves the message contract of the HTTP layer: for an
/// HTTP rejection it is the server's `detail` string when one was present, otherwise
/// [`GENERIC_FAILURE`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server responded with a non-2xx status.
    #[error("{}", .detail.as_deref().unwrap_or(GENERIC_FAILURE))]
    Http {
        status: StatusCode,
        detail: Option<String>,
    },

    /// A 2xx response whose body could not be interpreted.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// The error body shape the backend uses for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

impl ApiError {
    /// Builds the error for a non-2xx response from its status and raw body.
    ///
    /// The body is expected to be `{"detail": "..."}`. A body that is not valid JSON, or is
    /// missing `detail`, yields an error with no detail rather than a decode failure: error
    /// handling must never fail harder than the request it is reporting on.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail);
        ApiError::Http { status, detail }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ApiError::Decode(message.into())
    }

    /// The HTTP status, when this error came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_message() {
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, br#"{"detail":"nope"}"#);
        assert_eq!(err.to_string(), "nope");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_generic_message_when_detail_missing() {
        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, br#"{"other":1}"#);
        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn test_generic_message_when_body_unparseable() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, b"<html>oops</html>");
        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn test_generic_message_when_body_empty() {
        let err = ApiError::from_response(StatusCode::NOT_FOUND, b"");
        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn test_detail_null_is_generic() {
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, br#"{"detail":null}"#);
        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }
}

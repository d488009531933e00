//! Errors seen by the client side of the list item API.
//!
//! # Design
//! `NotFound` gets its own variant because callers treat a missing item
//! differently from other failures (a delete that hits 404 already
//! happened). Any other unexpected status lands in `HttpError` with the raw
//! body. `Transport` is produced by the host when the request never got a
//! response at all.

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,

    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),

    #[error("transport failed: {0}")]
    Transport(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Short text suitable for showing to a user. Prefers the server's own
    /// `{"error": ...}` message when the body carries one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotFound => "the item no longer exists".to_string(),
            ApiError::HttpError { status, body } => serde_json::from_str::<ErrorBody>(body)
                .map(|b| b.error)
                .unwrap_or_else(|_| format!("server replied with status {status}")),
            ApiError::Transport(_) => "the server could not be reached".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_uses_server_error_field() {
        let err = ApiError::HttpError {
            status: 400,
            body: r#"{"error":"Item title is required"}"#.to_string(),
        };
        assert_eq!(err.user_message(), "Item title is required");
    }

    #[test]
    fn user_message_falls_back_to_status() {
        let err = ApiError::HttpError {
            status: 502,
            body: "<html>bad gateway</html>".to_string(),
        };
        assert_eq!(err.user_message(), "server replied with status 502");
    }

    #[test]
    fn transport_detail_stays_out_of_user_message() {
        let err = ApiError::Transport("connection refused (os error 111)".to_string());
        assert_eq!(err.user_message(), "the server could not be reached");
        assert!(err.to_string().contains("os error 111"));
    }
}

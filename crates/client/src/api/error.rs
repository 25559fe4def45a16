//! API client error types.
//!
//! Heterogeneous transport failures (HTTP error bodies, network failures,
//! timeouts) normalize into a single [`ApiError`] shape so callers can key
//! behavior off [`ErrorKind`] without inspecting transport internals.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Uniform error category, stable across transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The server received the request and rejected it.
    ServerError,
    /// The request never produced a usable response.
    NetworkError,
    /// A request timed out, or the poll budget was exhausted.
    TimeoutError,
    /// Anything else (e.g. a response body that would not decode).
    UnknownError,
}

/// Normalized error from API operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Response received with a non-success status.
    #[error("server error ({status}): {message}")]
    Server {
        status: u16,
        message: String,
        /// Structured diagnostic payload from the server, when present.
        details: Option<Value>,
    },

    /// Request sent but no response received.
    #[error("network error: unable to reach the server ({0})")]
    Network(Arc<reqwest::Error>),

    /// Request timeout or exhausted poll budget.
    #[error("timed out: {0}")]
    Timeout(String),

    /// Catch-all for failures outside the taxonomy.
    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl ApiError {
    /// Uniform category for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Server { .. } => ErrorKind::ServerError,
            ApiError::Network(_) => ErrorKind::NetworkError,
            ApiError::Timeout(_) => ErrorKind::TimeoutError,
            ApiError::Unknown(_) => ErrorKind::UnknownError,
        }
    }

    /// HTTP status code, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-supplied diagnostic payload, when present.
    pub fn details(&self) -> Option<&Value> {
        match self {
            ApiError::Server { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout("request timed out".to_string())
        } else {
            ApiError::Network(Arc::new(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_mapping() {
        let err = ApiError::Server { status: 500, message: "boom".into(), details: None };
        assert_eq!(err.kind(), ErrorKind::ServerError);

        let err = ApiError::Timeout("budget exhausted".into());
        assert_eq!(err.kind(), ErrorKind::TimeoutError);

        let err = ApiError::Unknown("weird".into());
        assert_eq!(err.kind(), ErrorKind::UnknownError);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        assert_eq!(serde_json::to_value(ErrorKind::ServerError).unwrap(), json!("server_error"));
        assert_eq!(serde_json::to_value(ErrorKind::NetworkError).unwrap(), json!("network_error"));
        assert_eq!(serde_json::to_value(ErrorKind::TimeoutError).unwrap(), json!("timeout_error"));
        assert_eq!(serde_json::to_value(ErrorKind::UnknownError).unwrap(), json!("unknown_error"));
    }

    #[test]
    fn test_status_only_on_server_errors() {
        let err = ApiError::Server { status: 422, message: "invalid".into(), details: None };
        assert_eq!(err.status(), Some(422));

        let err = ApiError::Timeout("t".into());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_details_passthrough() {
        let payload = json!({ "field": "subject_id" });
        let err = ApiError::Server { status: 400, message: "invalid".into(), details: Some(payload.clone()) };
        assert_eq!(err.details(), Some(&payload));
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Server { status: 503, message: "overloaded".into(), details: None };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("overloaded"));
    }
}

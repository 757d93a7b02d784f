//! API client error types.

use thiserror::Error;

/// Result type for API client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Response body was not valid JSON.
    #[error("{raw} [{message}]")]
    ResponseParse {
        /// Raw response text.
        raw: String,
        /// Parser message.
        message: String,
    },

    /// Response JSON carried a truthy `error` field. The value is the
    /// server's payload, untouched.
    #[error("Application error: {0}")]
    Application(serde_json::Value),

    /// Response JSON did not fit the expected result type.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request building error.
    #[error("Failed to build request: {0}")]
    RequestBuild(String),

    /// Request body could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Query payload could not be converted.
    #[error("Query error: {0}")]
    Query(#[from] courier_query::QueryError),

    /// Underlying HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// Get the server-supplied error value if this is an application error.
    pub fn application_error(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Application(value) => Some(value),
            _ => None,
        }
    }

    /// Get the raw response text if the body failed to parse.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::ResponseParse { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }

    /// Check if this is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_connect())
    }
}

//! Query encoding error types.

use thiserror::Error;

/// Result type for query conversions.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors raised while building a [`QueryValue`](crate::QueryValue).
///
/// Encoding itself is infallible; only converting arbitrary serializable
/// types can fail.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The value could not be represented as JSON.
    #[error("Failed to convert value into query parameters: {0}")]
    Serialize(#[from] serde_json::Error),
}

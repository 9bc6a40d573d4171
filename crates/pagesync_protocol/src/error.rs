//! Error types for wire decoding.

use thiserror::Error;

/// Result type for protocol operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors that can occur while decoding a remote response body.
#[derive(Debug, Error)]
pub enum WireError {
    /// The body is not valid JSON.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A page body was not a JSON array.
    #[error("expected a JSON array of records")]
    ExpectedArray,

    /// A record body was not a JSON object.
    #[error("expected a JSON object")]
    ExpectedObject,

    /// A record object carries no `id` member.
    #[error("record is missing an id")]
    MissingId,

    /// A record's `id` member is not a non-negative integer.
    #[error("record id is not a non-negative integer")]
    InvalidId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            WireError::ExpectedArray.to_string(),
            "expected a JSON array of records"
        );
        assert_eq!(WireError::MissingId.to_string(), "record is missing an id");
    }
}

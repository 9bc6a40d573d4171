//! Error types for the sync engine.

use pagesync_protocol::{RecordId, WireError};
use thiserror::Error;

/// Result type for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while loading or mutating the collection.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A required field is missing or blank; caught before any network call.
    #[error("missing required field: {field}")]
    Validation {
        /// Name of the offending field.
        field: String,
    },

    /// Network or transport error.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// Malformed response body.
    #[error("decode error: {0}")]
    Decode(#[from] WireError),

    /// The server answered with a non-success status.
    #[error("server error (status {status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body or status text.
        message: String,
    },

    /// A mutation referenced a record id absent from the local collection.
    #[error("record {id} not found in local collection")]
    NotFound {
        /// The missing id.
        id: RecordId,
    },

    /// An insert token no longer names a pending entry.
    #[error("no pending insert for token {token}")]
    PendingNotFound {
        /// The stale token value.
        token: u64,
    },
}

impl SyncError {
    /// Creates a validation error for a field.
    pub fn validation(field: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
        }
    }

    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if this error can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Transport { retryable, .. } => *retryable,
            SyncError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

//! Error types for the protocol crate.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while parsing or serializing bridge traffic.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// An inbound envelope is missing required structure.
    #[error("malformed message: {reason}")]
    MalformedMessage {
        /// Why the envelope was rejected.
        reason: String,
    },

    /// A record category name is not one the protocol knows.
    #[error("unknown record category: {0:?}")]
    UnknownCategory(String),

    /// A sync action code is out of range.
    #[error("unknown sync action code: {0}")]
    UnknownAction(i64),

    /// Seed material has the wrong length.
    #[error("invalid seed length {len}: expected {expected}")]
    InvalidSeedLength {
        /// The offending length.
        len: usize,
        /// The required length.
        expected: usize,
    },

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProtocolError {
    /// Creates a malformed-message error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            reason: reason.into(),
        }
    }
}

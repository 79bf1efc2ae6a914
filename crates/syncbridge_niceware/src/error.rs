//! Error types for the passphrase codec.

use thiserror::Error;

/// Result type for codec operations.
pub type NicewareResult<T> = Result<T, NicewareError>;

/// Errors that can occur while encoding or decoding passphrases.
#[derive(Error, Debug)]
pub enum NicewareError {
    /// Byte input cannot be split into whole word-sized pairs.
    #[error("invalid byte length {len}: expected a multiple of 2")]
    InvalidLength {
        /// The offending length.
        len: usize,
    },

    /// A passphrase word is not present in the dictionary.
    #[error("invalid word: {word:?}")]
    InvalidWord {
        /// The word that failed lookup.
        word: String,
    },

    /// The supplied dictionary cannot back the codec.
    #[error("invalid dictionary: {reason}")]
    InvalidDictionary {
        /// Why the dictionary was rejected.
        reason: String,
    },
}

//! Error types for the sync engine.

use syncbridge_niceware::NicewareError;
use syncbridge_protocol::ProtocolError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A non-empty seed is already stored for this installation.
    #[error("sync seed already set; disconnect before joining another sync group")]
    SeedAlreadySet,

    /// An outbound call spent its readiness retry budget.
    #[error("sync not ready after {attempts} attempts")]
    NotReadyTimeout {
        /// How many readiness checks were made.
        attempts: u32,
    },

    /// Wire-level failure.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Passphrase codec failure.
    #[error("niceware error: {0}")]
    Niceware(#[from] NicewareError),

    /// Persisted-state collaborator failure.
    #[error("state store error: {0}")]
    StateStore(String),

    /// Local storage collaborator failure.
    #[error("local store error: {0}")]
    LocalStore(String),

    /// A remote record could not be matched to any local entity.
    #[error("record {object_id} did not resolve to a local entity")]
    RecordUnresolved {
        /// Stable id of the unresolved record.
        object_id: String,
    },

    /// The bridge rejected an outbound call.
    #[error("bridge error: {0}")]
    Bridge(String),

    /// The session was shut down.
    #[error("sync session is closed")]
    SessionClosed,
}

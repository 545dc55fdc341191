use thiserror::Error;

use crate::storage::StorageError;

/// Result type for host bridge calls.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Failures reported by the host platform bridge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The host could not be reached or the channel is closed.
    #[error("bridge_unavailable: {0}")]
    Unavailable(String),
    /// The user dismissed the host's account prompt.
    #[error("cancelled")]
    Cancelled,
    /// The host rejected the call.
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Error outputs from the session controller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A bridge call that the session does not recover from failed.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    /// Preference storage failed for a reason other than denied access.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The session was torn down and cannot be started again.
    #[error("torn_down")]
    TornDown,
}

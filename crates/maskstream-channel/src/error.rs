//! Error types for the channel state machines.

use maskstream_core::{Address, CoreError};
use maskstream_ledger::LedgerError;
use thiserror::Error;

/// Errors surfaced by publish and subscribe operations.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// A pure computation failed (bad secret, bad window).
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// The ledger refused or dropped a write.
    ///
    /// The index used for the attempt is already consumed; retrying the
    /// publish uses the next one-time key.
    #[error("submit failed at {address} (index {index}): {source}")]
    SubmitFailed {
        /// The address the envelope was bound for.
        address: Address,
        /// The consumed publish index.
        index: u64,
        /// The underlying ledger error.
        #[source]
        source: LedgerError,
    },

    /// The subscribe loop's output channel was closed by the caller.
    #[error("subscription cancelled")]
    Cancelled,
}

/// Result type for channel operations.
pub type Result<T> = std::result::Result<T, ChannelError>;

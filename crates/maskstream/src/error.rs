//! Error type for the unified API.

use thiserror::Error;

/// Errors from the unified channel API.
#[derive(Debug, Error)]
pub enum MamError {
    /// A pure computation failed (bad secret, bad window bounds).
    #[error(transparent)]
    Core(#[from] maskstream_core::CoreError),

    /// A publish or subscribe operation failed.
    #[error(transparent)]
    Channel(#[from] maskstream_channel::ChannelError),

    /// A direct ledger operation failed.
    #[error(transparent)]
    Ledger(#[from] maskstream_ledger::LedgerError),
}

//! Error types for ledger transports.

use maskstream_core::Address;
use thiserror::Error;

/// Errors from ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transient transport failure (node down, timeout, network).
    ///
    /// Says nothing about whether the address holds a message; callers
    /// retry with backoff and never treat this as "not found".
    #[error("transport error: {0}")]
    Transport(String),

    /// A message already exists at this address.
    ///
    /// The ledger is immutable; a second write at an address is a
    /// definite failure, not a transient one.
    #[error("address already occupied: {0}")]
    AddressOccupied(Address),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

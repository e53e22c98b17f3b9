//! Error types for Maskstream core.

use thiserror::Error;

/// Errors from pure channel computations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed root secret or channel key.
    #[error("invalid secret: {0}")]
    InvalidSecret(String),

    /// Invalid window bounds (zero count, out-of-range index, overflow).
    #[error("invalid window: {0}")]
    InvalidWindow(String),

    /// Merkle proof or AEAD verification failed.
    ///
    /// Subscribers treat this the same as "not found": an adversarial or
    /// corrupted ledger entry must not crash the poll loop.
    #[error("verification failure")]
    VerificationFailure,

    /// Envelope could not be encoded.
    #[error("encoding error: {0}")]
    EncodingError(String),

    /// Envelope could not be decoded.
    #[error("decoding error: {0}")]
    DecodingError(String),
}

//! Ledger trait: the abstract interface to the append-only store.
//!
//! Implementations may talk to a real distributed ledger node over HTTP,
//! or keep everything in memory for tests. The channel state machines
//! only ever see this trait.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use maskstream_core::{Address, Digest};

use crate::error::Result;

/// Opaque reference to an accepted write.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxRef(pub [u8; 32]);

impl TxRef {
    /// Derive a transaction reference from the written record.
    pub fn derive(address: &Address, payload: &[u8]) -> Self {
        let mut input = Vec::with_capacity(32 + payload.len());
        input.extend_from_slice(address.as_bytes());
        input.extend_from_slice(payload);
        Self(Digest::hash(&input).0)
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for TxRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxRef({})", &self.to_hex()[..16])
    }
}

/// Async interface to the append-only ledger.
///
/// Implementations must be thread-safe (Send + Sync).
///
/// # Contract
///
/// - **Write once**: a successful `submit` makes the payload readable at
///   the address forever; a second write at the same address fails.
/// - **Authoritative negative**: `fetch -> Ok(None)` means the address is
///   definitively empty right now.
/// - **Transient errors**: `Err(Transport)` from either call carries no
///   existence information and is always retryable.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Write `payload` at `address`.
    async fn submit(&self, address: &Address, payload: &[u8]) -> Result<TxRef>;

    /// Read the payload at `address`, if any.
    async fn fetch(&self, address: &Address) -> Result<Option<Bytes>>;
}

#[async_trait]
impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    async fn submit(&self, address: &Address, payload: &[u8]) -> Result<TxRef> {
        (**self).submit(address, payload).await
    }

    async fn fetch(&self, address: &Address) -> Result<Option<Bytes>> {
        (**self).fetch(address).await
    }
}

//! In-memory implementation of the Ledger trait.
//!
//! This is primarily for testing. It has write-once semantics and can be
//! scripted to fail transiently, so both retry paths of the channel state
//! machines are exercisable without a network.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use maskstream_core::Address;

use crate::error::{LedgerError, Result};
use crate::traits::{Ledger, TxRef};

/// In-memory ledger.
///
/// All data is lost when dropped. Thread-safe via RwLock.
pub struct MemoryLedger {
    inner: RwLock<MemoryLedgerInner>,
}

struct MemoryLedgerInner {
    /// Payloads keyed by address.
    entries: HashMap<Address, Bytes>,

    /// Remaining fetches to fail with a transport error.
    fetch_faults: u32,

    /// Remaining submits to fail with a transport error.
    submit_faults: u32,

    /// Counters for test assertions.
    fetch_count: u64,
    submit_count: u64,
}

impl MemoryLedger {
    /// Create a new empty in-memory ledger.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryLedgerInner {
                entries: HashMap::new(),
                fetch_faults: 0,
                submit_faults: 0,
                fetch_count: 0,
                submit_count: 0,
            }),
        }
    }

    /// Make the next `n` fetches fail with a transport error.
    pub fn fail_next_fetches(&self, n: u32) {
        self.inner.write().unwrap().fetch_faults = n;
    }

    /// Make the next `n` submits fail with a transport error.
    pub fn fail_next_submits(&self, n: u32) {
        self.inner.write().unwrap().submit_faults = n;
    }

    /// Number of fetch calls observed (including failed ones).
    pub fn fetch_count(&self) -> u64 {
        self.inner.read().unwrap().fetch_count
    }

    /// Number of submit calls observed (including failed ones).
    pub fn submit_count(&self) -> u64 {
        self.inner.read().unwrap().submit_count
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().entries.len()
    }

    /// Whether the ledger holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn submit(&self, address: &Address, payload: &[u8]) -> Result<TxRef> {
        let mut inner = self.inner.write().unwrap();
        inner.submit_count += 1;

        if inner.submit_faults > 0 {
            inner.submit_faults -= 1;
            return Err(LedgerError::Transport("injected submit fault".into()));
        }

        if inner.entries.contains_key(address) {
            return Err(LedgerError::AddressOccupied(*address));
        }

        inner
            .entries
            .insert(*address, Bytes::copy_from_slice(payload));
        Ok(TxRef::derive(address, payload))
    }

    async fn fetch(&self, address: &Address) -> Result<Option<Bytes>> {
        let mut inner = self.inner.write().unwrap();
        inner.fetch_count += 1;

        if inner.fetch_faults > 0 {
            inner.fetch_faults -= 1;
            return Err(LedgerError::Transport("injected fetch fault".into()));
        }

        Ok(inner.entries.get(address).cloned())
    }
}

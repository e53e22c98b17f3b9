//! # Maskstream Ledger
//!
//! The transport seam between Maskstream channels and an address-keyed
//! append-only ledger.
//!
//! The ledger is opaque: it supports only "write payload at address" and
//! "read payload at address", gives no ordering between addresses, and may
//! fail transiently at any time. `fetch` returning `Ok(None)` is the
//! authoritative "nothing there" answer; a transport error carries no
//! information about existence and must be retried.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{LedgerError, Result};
pub use memory::MemoryLedger;
pub use traits::{Ledger, TxRef};

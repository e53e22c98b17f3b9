//! # Maskstream
//!
//! Masked Authenticated Messaging channels over an immutable,
//! address-keyed, append-only ledger.
//!
//! A channel is an ordered sequence of encrypted, Merkle-authenticated
//! messages, all derived from one root secret. Publishers commit batches
//! of one-time keys to Merkle windows and announce each next window from
//! inside the current one; subscribers start from a single key handed
//! over out-of-band and follow the chain with no further coordination.
//!
//! ```no_run
//! use maskstream::{MamChannel, MamConfig, RootSecret};
//! use maskstream_ledger::MemoryLedger;
//! use std::sync::Arc;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let ledger = Arc::new(MemoryLedger::new());
//! let channel = MamChannel::open(RootSecret::generate(), ledger, MamConfig::default())?;
//!
//! let mut publisher = channel.publisher()?;
//! publisher.publish(b"hello").await?;
//!
//! let mut subscriber = channel.subscriber(channel.initial_key());
//! let message = subscriber.next_message().await;
//! assert_eq!(message.payload.as_ref(), b"hello");
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod error;

pub use channel::{MamChannel, MamConfig};
pub use error::MamError;

pub use maskstream_channel::{
    ChannelMessage, PollOutcome, PublishReceipt, Publisher, Subscriber, SubscriptionCursor,
};
pub use maskstream_core::{Address, ChannelRoot, Digest, OneTimeKey, RootSecret};
pub use maskstream_ledger::{Ledger, TxRef};

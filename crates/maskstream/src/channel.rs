//! The channel facade: one handle tying the key chain, a ledger, and the
//! publish/subscribe state machines together.
//!
//! This is the surface an interactive front end calls: open a channel
//! with a secret, hand out keys by index, construct publishers and
//! subscribers. The front end itself (prompting, command parsing) stays
//! outside this crate.

use std::sync::Arc;

use maskstream_channel::{Publisher, PublisherConfig, Subscriber, SubscriberConfig};
use maskstream_core::{Digest, KeyChain, OneTimeKey, RootSecret};
use maskstream_ledger::Ledger;

use crate::error::MamError;

/// Configuration for a channel.
#[derive(Debug, Clone, Default)]
pub struct MamConfig {
    /// Publisher settings (window size, probe backoff).
    pub publisher: PublisherConfig,
    /// Subscriber settings (poll backoff).
    pub subscriber: SubscriberConfig,
}

/// A handle to one Maskstream channel over a ledger.
///
/// Cheap to clone pieces off of: publishers and subscribers each take a
/// shared handle to the same ledger and own their state independently.
pub struct MamChannel<L: Ledger> {
    secret: RootSecret,
    chain: KeyChain,
    ledger: Arc<L>,
    config: MamConfig,
}

impl<L: Ledger> MamChannel<L> {
    /// Open a channel with the given secret and ledger.
    pub fn open(secret: RootSecret, ledger: Arc<L>, config: MamConfig) -> Result<Self, MamError> {
        if config.publisher.window_size == 0 {
            return Err(maskstream_core::CoreError::InvalidWindow(
                "window_size must be positive".into(),
            )
            .into());
        }
        Ok(Self {
            secret,
            chain: KeyChain::new(secret),
            ledger,
            config,
        })
    }

    /// The channel seed: a public label derived from the secret.
    pub fn channel_seed(&self) -> Digest {
        self.chain.channel_seed()
    }

    /// The one-time key for `index` (the interactive `get` command).
    ///
    /// Handing out `key_at(i)` lets a subscriber join from index `i`
    /// onward; earlier messages stay unreadable.
    pub fn key_at(&self, index: u64) -> OneTimeKey {
        self.chain.key(index)
    }

    /// The key a subscriber needs to follow the channel from the start.
    pub fn initial_key(&self) -> OneTimeKey {
        self.key_at(0)
    }

    /// Construct the publishing half, starting at index 0.
    pub fn publisher(&self) -> Result<Publisher<Arc<L>>, MamError> {
        Ok(Publisher::new(
            self.secret,
            Arc::clone(&self.ledger),
            self.config.publisher.clone(),
        )?)
    }

    /// Construct the publishing half resuming from `start_index`, e.g.
    /// after a restart with persisted progress.
    pub fn publisher_from(&self, start_index: u64) -> Result<Publisher<Arc<L>>, MamError> {
        Ok(Publisher::with_start_index(
            self.secret,
            Arc::clone(&self.ledger),
            self.config.publisher.clone(),
            start_index,
        )?)
    }

    /// Construct a subscriber starting from `key`.
    pub fn subscriber(&self, key: OneTimeKey) -> Subscriber<Arc<L>> {
        Subscriber::new(
            key,
            Arc::clone(&self.ledger),
            self.config.subscriber.clone(),
        )
    }
}

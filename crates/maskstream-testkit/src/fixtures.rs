//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;
use std::time::Duration;

use maskstream_channel::{
    PublishReceipt, Publisher, PublisherConfig, Subscriber, SubscriberConfig,
};
use maskstream_core::{KeyChain, OneTimeKey, RootSecret};
use maskstream_ledger::MemoryLedger;

/// A test fixture with a root secret and a shared in-memory ledger.
///
/// Publishers and subscribers built from the same fixture talk over the
/// same ledger, so publish-then-subscribe scenarios need no wiring.
pub struct ChannelFixture {
    pub secret: RootSecret,
    pub ledger: Arc<MemoryLedger>,
}

impl ChannelFixture {
    /// Create a new fixture with a random secret.
    pub fn new() -> Self {
        Self {
            secret: RootSecret::generate(),
            ledger: Arc::new(MemoryLedger::new()),
        }
    }

    /// Create with a deterministic secret from a seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            secret: RootSecret::from_bytes(seed),
            ledger: Arc::new(MemoryLedger::new()),
        }
    }

    /// The fixture's key chain.
    pub fn chain(&self) -> KeyChain {
        KeyChain::new(self.secret)
    }

    /// The one-time key at `index`.
    pub fn key(&self, index: u64) -> OneTimeKey {
        self.chain().key(index)
    }

    /// Publisher settings tightened for tests: small windows, no real
    /// backoff delays.
    pub fn publisher_config() -> PublisherConfig {
        PublisherConfig {
            window_size: 4,
            probe_interval: Duration::from_millis(1),
        }
    }

    /// Subscriber settings tightened for tests.
    pub fn subscriber_config() -> SubscriberConfig {
        SubscriberConfig {
            poll_interval: Duration::from_millis(5),
        }
    }

    /// A publisher over the fixture's ledger, starting at index 0.
    pub fn publisher(&self) -> Publisher<Arc<MemoryLedger>> {
        Publisher::new(
            self.secret,
            Arc::clone(&self.ledger),
            Self::publisher_config(),
        )
        .expect("fixture publisher config is valid")
    }

    /// A subscriber over the fixture's ledger, starting from the key at
    /// `index`.
    pub fn subscriber_from(&self, index: u64) -> Subscriber<Arc<MemoryLedger>> {
        Subscriber::new(
            self.key(index),
            Arc::clone(&self.ledger),
            Self::subscriber_config(),
        )
    }

    /// Publish `count` payloads `"message 0"`, `"message 1"`, ... and
    /// return the receipts.
    pub async fn publish_sequence(
        &self,
        publisher: &mut Publisher<Arc<MemoryLedger>>,
        count: usize,
    ) -> Vec<PublishReceipt> {
        let mut receipts = Vec::with_capacity(count);
        for i in 0..count {
            let payload = format!("message {}", i).into_bytes();
            let receipt = publisher
                .publish(&payload)
                .await
                .expect("fixture ledger accepts writes");
            receipts.push(receipt);
        }
        receipts
    }
}

impl Default for ChannelFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple fixtures with distinct secrets over one shared ledger,
/// for cross-channel isolation tests.
pub fn multi_channel_fixtures(count: usize) -> Vec<ChannelFixture> {
    let ledger = Arc::new(MemoryLedger::new());
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[1] = 0xc4;
            ChannelFixture {
                secret: RootSecret::from_bytes(seed),
                ledger: Arc::clone(&ledger),
            }
        })
        .collect()
}

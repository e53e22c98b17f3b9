//! The publish state machine.
//!
//! Per message: derive the one-time key for the current index, probe the
//! derived address to make sure the index was never used (a crashed and
//! restarted publisher may hold a stale index), seal the envelope with
//! the current window's proof and the next window's root, consume the
//! index, submit.

use std::time::Duration;

use maskstream_core::{
    Address, ChannelRoot, Envelope, KeyChain, OneTimeKey, RootSecret, WindowRotator,
};
use maskstream_ledger::{Ledger, TxRef};

use crate::error::{ChannelError, Result};

/// Configuration for publish behavior.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Keys per Merkle window. Fixed for the channel's lifetime; affects
    /// proof size and rotation frequency only, not correctness.
    pub window_size: u64,
    /// Delay between probe retries after a transient transport error.
    /// A floor, not a meaningful constant.
    pub probe_interval: Duration,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            window_size: 4,
            probe_interval: Duration::from_millis(1),
        }
    }
}

/// Confirmation of one accepted publish.
#[derive(Debug, Clone)]
pub struct PublishReceipt {
    /// The index the message was published under.
    pub index: u64,
    /// The ledger address the envelope was written to.
    pub address: Address,
    /// The window root the message is authenticated under.
    pub root: ChannelRoot,
    /// The next window root announced inside the envelope.
    pub next_root: ChannelRoot,
    /// The ledger's write reference.
    pub tx: TxRef,
}

/// The publishing half of a channel.
///
/// Owns the root secret, the publish index, and the window pair. One
/// publisher instance per channel; the probe-before-send guard is
/// best-effort only and does not make concurrent publishers safe (two
/// processes can both pass the probe before either submits).
pub struct Publisher<L: Ledger> {
    chain: KeyChain,
    ledger: L,
    config: PublisherConfig,
    windows: WindowRotator,
    index: u64,
}

impl<L: Ledger> Publisher<L> {
    /// Create a publisher starting at index 0.
    pub fn new(secret: RootSecret, ledger: L, config: PublisherConfig) -> Result<Self> {
        Self::with_start_index(secret, ledger, config, 0)
    }

    /// Create a publisher resuming from `start_index`.
    ///
    /// The index may be stale after a crash; the probe loop skips any
    /// indices that already carry a message.
    pub fn with_start_index(
        secret: RootSecret,
        ledger: L,
        config: PublisherConfig,
        start_index: u64,
    ) -> Result<Self> {
        if config.window_size == 0 {
            return Err(ChannelError::Core(maskstream_core::CoreError::InvalidWindow(
                "window_size must be positive".into(),
            )));
        }

        let chain = KeyChain::new(secret);
        let window_start = start_index - (start_index % config.window_size);
        let windows = WindowRotator::new(&chain, window_start, config.window_size)?;

        Ok(Self {
            chain,
            ledger,
            config,
            windows,
            index: start_index,
        })
    }

    /// The current publish index (the next index to be consumed).
    pub fn index(&self) -> u64 {
        self.index
    }

    /// The current window's root.
    pub fn current_root(&self) -> ChannelRoot {
        self.windows.current().root()
    }

    /// The pre-built next window's root.
    pub fn next_root(&self) -> ChannelRoot {
        self.windows.next().root()
    }

    /// Publish one message.
    ///
    /// Exactly one ledger write per successful call. The publish index is
    /// consumed once the envelope is sealed, whether or not the submit
    /// succeeds, so no one-time key ever covers two different payloads.
    pub async fn publish(&mut self, payload: &[u8]) -> Result<PublishReceipt> {
        let (key, address) = self.probe().await?;

        let index = self.index;
        let envelope = Envelope::seal(
            &key,
            self.windows.current(),
            index,
            self.windows.next().root(),
            payload,
        )?;
        let root = envelope.root;
        let next_root = self.windows.next().root();
        let bytes = envelope.encode()?;

        // Index is consumed from here on, regardless of submit outcome.
        self.consume_index()?;

        match self.ledger.submit(&address, &bytes).await {
            Ok(tx) => {
                tracing::debug!(index, %address, "published");
                Ok(PublishReceipt {
                    index,
                    address,
                    root,
                    next_root,
                    tx,
                })
            }
            Err(source) => Err(ChannelError::SubmitFailed {
                address,
                index,
                source,
            }),
        }
    }

    /// Find the first free address at or after the current index.
    ///
    /// A found message means the index is burned: skip it. An
    /// authoritative `None` means safe to publish. A transport error is
    /// retried after a short delay; it must never be read as "free",
    /// otherwise a flaky node causes a double publish.
    async fn probe(&mut self) -> Result<(OneTimeKey, Address)> {
        loop {
            let key = self.chain.key(self.index);
            let address = key.address();

            match self.ledger.fetch(&address).await {
                Ok(Some(_)) => {
                    tracing::warn!(index = self.index, %address, "index already used, skipping");
                    self.consume_index()?;
                }
                Ok(None) => return Ok((key, address)),
                Err(e) => {
                    tracing::debug!(index = self.index, error = %e, "probe failed, retrying");
                    tokio::time::sleep(self.config.probe_interval).await;
                }
            }
        }
    }

    /// Advance the index by one and rotate windows to cover it.
    fn consume_index(&mut self) -> Result<()> {
        self.index += 1;
        self.windows.advance(&self.chain, self.index)?;
        Ok(())
    }
}

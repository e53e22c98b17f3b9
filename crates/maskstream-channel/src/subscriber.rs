//! The subscribe state machine.
//!
//! The subscriber holds only public material: a channel key obtained
//! out-of-band and the cursor roots learned from opened messages. It
//! polls the address derived from the key, verifies and unmasks whatever
//! appears there, resolves its position in the root → next-root chain,
//! emits the payload, then chains the key one step forward and polls
//! again immediately. Only failed lookups incur backoff.

use std::time::Duration;

use bytes::Bytes;
use maskstream_core::{Address, ChannelRoot, Envelope, OneTimeKey};
use maskstream_ledger::Ledger;
use tokio::sync::mpsc;

use crate::error::{ChannelError, Result};

/// Configuration for subscribe behavior.
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Delay before re-polling after "not found", a transport error, or a
    /// rejected envelope. Subscribing is a patience-tolerant loop; this
    /// is deliberately longer than the publisher's probe interval.
    pub poll_interval: Duration,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// The subscriber's position in the channel.
///
/// `root`/`next_root` start empty and advance deterministically as
/// messages are found; the cursor never rewinds except through the
/// fresh-anchor branch of [`SubscriptionCursor::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionCursor {
    /// The key whose address is polled next.
    pub key: OneTimeKey,
    /// Root of the window we believe we are in.
    pub root: Option<ChannelRoot>,
    /// Announced root of the following window.
    pub next_root: Option<ChannelRoot>,
}

impl SubscriptionCursor {
    /// Start a cursor at the given channel key, with no known roots.
    pub fn new(key: OneTimeKey) -> Self {
        Self {
            key,
            root: None,
            next_root: None,
        }
    }

    /// Resolve an opened message's chain position and update the cursor.
    ///
    /// The trinary rule: same window, window advanced by one, or fresh
    /// anchor. The fallthrough deliberately re-anchors on any unknown
    /// root pair; it resynchronizes after a gap, and equally accepts an
    /// injected pair, exactly as the protocol defines (no additional
    /// chain authentication exists beyond root equality).
    fn resolve(&mut self, root: ChannelRoot, next_root: ChannelRoot) {
        if self.root == Some(root) {
            self.next_root = Some(next_root);
        } else if self.next_root == Some(root) {
            self.root = self.next_root;
            self.next_root = Some(next_root);
        } else {
            self.root = Some(root);
            self.next_root = Some(next_root);
        }
    }
}

/// A message discovered on the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMessage {
    /// Decrypted payload, byte-identical to what was published.
    pub payload: Bytes,
    /// The window root it was authenticated under.
    pub root: ChannelRoot,
    /// The announced next window root.
    pub next_root: ChannelRoot,
    /// The address it was found at.
    pub address: Address,
}

/// Outcome of a single poll step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// A message was found, verified, and decrypted; the cursor advanced.
    Message(ChannelMessage),
    /// Nothing usable at the address yet: not found, transport error, or
    /// an envelope that failed verification. Retry after backoff.
    Pending,
}

/// The subscribing half of a channel.
pub struct Subscriber<L: Ledger> {
    cursor: SubscriptionCursor,
    ledger: L,
    config: SubscriberConfig,
}

impl<L: Ledger> Subscriber<L> {
    /// Subscribe starting from `key` (obtained from the publisher
    /// out-of-band, e.g. the channel's initial one-time key).
    pub fn new(key: OneTimeKey, ledger: L, config: SubscriberConfig) -> Self {
        Self {
            cursor: SubscriptionCursor::new(key),
            ledger,
            config,
        }
    }

    /// The current cursor.
    pub fn cursor(&self) -> &SubscriptionCursor {
        &self.cursor
    }

    /// One poll step at the current key, without sleeping.
    ///
    /// Never fails: a transport error, missing entry, or adversarial
    /// ledger content all come back as [`PollOutcome::Pending`] — a
    /// corrupted entry must not crash the loop, and a transient error
    /// carries no information about existence.
    pub async fn poll_once(&mut self) -> PollOutcome {
        let address = self.cursor.key.address();

        let raw = match self.ledger.fetch(&address).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return PollOutcome::Pending,
            Err(e) => {
                tracing::debug!(%address, error = %e, "fetch failed, will retry");
                return PollOutcome::Pending;
            }
        };

        let opened = match Envelope::decode(&raw).and_then(|env| env.open(&self.cursor.key)) {
            Ok(opened) => opened,
            Err(e) => {
                tracing::warn!(%address, error = %e, "rejected ledger entry");
                return PollOutcome::Pending;
            }
        };

        self.cursor.resolve(opened.root, opened.next_root);
        let message = ChannelMessage {
            payload: opened.payload,
            root: opened.root,
            next_root: opened.next_root,
            address,
        };

        // Chain forward; the next poll targets the next key immediately.
        self.cursor.key = self.cursor.key.advance(1);
        PollOutcome::Message(message)
    }

    /// Wait for the next message, polling with backoff until one appears.
    ///
    /// Runs until a message is found; cancellation happens externally by
    /// dropping or `select!`-ing against this future between polls.
    pub async fn next_message(&mut self) -> ChannelMessage {
        loop {
            match self.poll_once().await {
                PollOutcome::Message(message) => return message,
                PollOutcome::Pending => {
                    tokio::time::sleep(self.config.poll_interval).await;
                }
            }
        }
    }

    /// Run the subscription indefinitely, sending each discovered message
    /// into `sink`. Returns [`ChannelError::Cancelled`] when the receiver
    /// is dropped; there is no other exit. Receiver loss is observed even
    /// while the channel is idle, so an abandoned subscription never keeps
    /// polling the ledger.
    pub async fn run(mut self, sink: mpsc::Sender<ChannelMessage>) -> Result<()> {
        loop {
            let message = tokio::select! {
                message = self.next_message() => message,
                _ = sink.closed() => return Err(ChannelError::Cancelled),
            };
            if sink.send(message).await.is_err() {
                return Err(ChannelError::Cancelled);
            }
        }
    }
}

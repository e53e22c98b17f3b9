//! # Maskstream Channel
//!
//! The publish and subscribe state machines.
//!
//! Publisher and subscriber are independent actors coupled only through
//! the ledger: the publisher derives one-time keys, commits to them in
//! Merkle windows, and writes sealed envelopes; the subscriber walks the
//! same key chain forward from a starting key handed over out-of-band,
//! polling each derived address and following the root → next-root chain.
//!
//! Each role is one sequential loop whose only suspension points are
//! ledger calls and backoff sleeps. Backoff intervals are configuration,
//! not protocol constants; the only hard rule is "eventually retry, never
//! busy-spin".

pub mod error;
pub mod publisher;
pub mod subscriber;

pub use error::{ChannelError, Result};
pub use publisher::{PublishReceipt, Publisher, PublisherConfig};
pub use subscriber::{
    ChannelMessage, PollOutcome, Subscriber, SubscriberConfig, SubscriptionCursor,
};

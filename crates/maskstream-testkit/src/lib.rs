//! # Maskstream Testkit
//!
//! Testing utilities for Maskstream.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Deterministic vectors**: Known channel setups whose derived keys,
//!   addresses, and window roots must never drift between releases
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up channel scenarios
//!
//! ## Test Fixtures
//!
//! Quickly set up a channel over an in-memory ledger:
//!
//! ```rust,no_run
//! use maskstream_testkit::fixtures::ChannelFixture;
//!
//! # async fn demo() {
//! let fixture = ChannelFixture::with_seed([0x42; 32]);
//! let mut publisher = fixture.publisher();
//! publisher.publish(b"hello").await.unwrap();
//!
//! let mut subscriber = fixture.subscriber_from(0);
//! let message = subscriber.next_message().await;
//! assert_eq!(message.payload.as_ref(), b"hello");
//! # }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use maskstream_testkit::generators::{window_from_params, WindowParams};
//!
//! proptest! {
//!     #[test]
//!     fn window_root_is_deterministic(params: WindowParams) {
//!         let w1 = window_from_params(&params);
//!         let w2 = window_from_params(&params);
//!         prop_assert_eq!(w1.root(), w2.root());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_channel_fixtures, ChannelFixture};
pub use generators::{window_from_params, WindowParams};
pub use vectors::{all_vectors, derive_vector, verify_all_vectors, ChannelVector, DerivedVector};

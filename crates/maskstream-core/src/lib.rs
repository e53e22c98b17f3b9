//! # Maskstream Core
//!
//! Pure primitives for Maskstream channels: key chains, Merkle windows,
//! and message envelopes.
//!
//! This crate contains no I/O, no ledger access, no timers. It is pure
//! computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`RootSecret`] - The channel owner's root secret (never transmitted)
//! - [`OneTimeKey`] - A single-use key derived from the secret and an index
//! - [`KeyChain`] - Deterministic derivation of the one-time key sequence
//! - [`MerkleWindow`] - A batch of keys committed to by one Merkle root
//! - [`WindowRotator`] - The double-buffered (current, next) window pair
//! - [`Envelope`] - The wire form of one published message
//!
//! ## Derivation
//!
//! All derivations are domain-separated Blake3. The key sequence is a
//! forward hash chain, so a subscriber holding `key(i)` can reach
//! `key(i + 1)` with one [`OneTimeKey::advance`] step but can never walk
//! backwards.

pub mod crypto;
pub mod envelope;
pub mod error;
pub mod keychain;
pub mod merkle;
pub mod window;

pub use crypto::{Address, ChannelRoot, Digest, OneTimeKey, RootSecret};
pub use envelope::{Envelope, OpenedMessage};
pub use error::CoreError;
pub use keychain::KeyChain;
pub use merkle::{verify_proof, MerkleProof, MerkleTree};
pub use window::{MerkleWindow, WindowRotator};

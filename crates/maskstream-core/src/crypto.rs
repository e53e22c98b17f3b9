//! Cryptographic value types for Maskstream.
//!
//! Wraps domain-separated Blake3 derivations with strong types. Every
//! derivation in the protocol goes through one of the domain constants
//! below, so key material, addresses, and tree nodes can never collide.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Domain prefix for the channel seed (a public label, not a key).
pub const CHANNEL_SEED_DOMAIN: &[u8] = b"maskstream/channel-seed/v0";
/// Domain prefix for the first link of the one-time key chain.
pub const KEY_CHAIN_DOMAIN: &[u8] = b"maskstream/key-chain/v0";
/// Domain prefix for one forward step of the key chain.
pub const KEY_STEP_DOMAIN: &[u8] = b"maskstream/key-step/v0";
/// Domain prefix for the ledger address of a one-time key.
pub const ADDRESS_DOMAIN: &[u8] = b"maskstream/address/v0";
/// Domain prefix for a Merkle leaf digest of a one-time key.
pub const LEAF_DOMAIN: &[u8] = b"maskstream/leaf/v0";
/// Domain prefix for an interior Merkle node.
pub const NODE_DOMAIN: &[u8] = b"maskstream/node/v0";
/// Domain prefix for the AEAD key masking a message body.
pub const MASK_KEY_DOMAIN: &[u8] = b"maskstream/mask-key/v0";
/// Domain prefix for the AEAD nonce masking a message body.
pub const MASK_NONCE_DOMAIN: &[u8] = b"maskstream/mask-nonce/v0";

/// A 32-byte Blake3 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// Compute the Blake3 digest of the given data.
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Compute a domain-separated digest: Blake3(domain || input).
    pub fn domain_hash(domain: &[u8], input: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(domain);
        hasher.update(input);
        Self(*hasher.finalize().as_bytes())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The zero digest (sentinel, used for Merkle padding).
    pub const ZERO: Self = Self([0u8; 32]);
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// The channel owner's root secret.
///
/// Held for the process lifetime, never transmitted, never serialized.
/// `Debug` is redacted.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RootSecret([u8; 32]);

impl RootSecret {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s)
            .map_err(|e| CoreError::InvalidSecret(format!("not hex: {}", e)))?;
        Self::from_slice(&bytes)
    }

    /// Create from a byte slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            CoreError::InvalidSecret(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    /// Generate a fresh random secret.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get the raw bytes.
    pub(crate) const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for RootSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RootSecret(..)")
    }
}

/// A single-use channel key.
///
/// Derived from the root secret and an index. Used once to compute a
/// ledger address and to mask exactly one message; publishing twice under
/// the same key breaks the channel's guarantees.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OneTimeKey([u8; 32]);

impl OneTimeKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from a 64-character hex string (a key handed out-of-band).
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s)
            .map_err(|e| CoreError::InvalidSecret(format!("not hex: {}", e)))?;
        let arr: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            CoreError::InvalidSecret(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The ledger address this key publishes to: H(addr-domain || H(key)).
    pub fn address(&self) -> Address {
        let inner = Digest::hash(&self.0);
        Address(Digest::domain_hash(ADDRESS_DOMAIN, inner.as_bytes()).0)
    }

    /// The Merkle leaf digest committing to this key.
    pub fn leaf_digest(&self) -> Digest {
        Digest::domain_hash(LEAF_DOMAIN, &self.0)
    }

    /// Advance `steps` links forward along the key chain.
    ///
    /// One step per published message; walking backwards is not possible.
    pub fn advance(&self, steps: u64) -> Self {
        let mut key = *self;
        for _ in 0..steps {
            key = Self(Digest::domain_hash(KEY_STEP_DOMAIN, &key.0).0);
        }
        key
    }
}

impl fmt::Debug for OneTimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OneTimeKey({})", &self.to_hex()[..16])
    }
}

/// A ledger address in the ledger's native alphabet (32 raw bytes here;
/// rendering to a node's wire alphabet is the transport's concern).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// The Merkle root of one window: the channel's publicly announced anchor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelRoot(pub [u8; 32]);

impl ChannelRoot {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// View as a digest (for proof verification).
    pub const fn digest(&self) -> Digest {
        Digest(self.0)
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ChannelRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChannelRoot({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ChannelRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl From<Digest> for ChannelRoot {
    fn from(d: Digest) -> Self {
        Self(d.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_deterministic() {
        let d1 = Digest::hash(b"test data");
        let d2 = Digest::hash(b"test data");
        assert_eq!(d1, d2);
        assert_ne!(d1, Digest::hash(b"other data"));
    }

    #[test]
    fn test_domain_separation() {
        let a = Digest::domain_hash(LEAF_DOMAIN, b"x");
        let b = Digest::domain_hash(NODE_DOMAIN, b"x");
        assert_ne!(a, b);
    }

    #[test]
    fn test_secret_hex_length_checked() {
        assert!(RootSecret::from_hex("abcd").is_err());
        assert!(RootSecret::from_hex("zz").is_err());
        let hex = "42".repeat(32);
        assert!(RootSecret::from_hex(&hex).is_ok());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = RootSecret::from_bytes([0x42; 32]);
        assert_eq!(format!("{:?}", secret), "RootSecret(..)");
    }

    #[test]
    fn test_key_advance_composes() {
        let key = OneTimeKey::from_bytes([0x11; 32]);
        assert_eq!(key.advance(3), key.advance(1).advance(2));
        assert_eq!(key.advance(0), key);
    }

    #[test]
    fn test_address_differs_from_leaf() {
        let key = OneTimeKey::from_bytes([0x11; 32]);
        assert_ne!(key.address().0, key.leaf_digest().0);
    }

    #[test]
    fn test_key_hex_roundtrip() {
        let key = OneTimeKey::from_bytes([0xab; 32]);
        let recovered = OneTimeKey::from_hex(&key.to_hex()).unwrap();
        assert_eq!(key, recovered);
    }
}

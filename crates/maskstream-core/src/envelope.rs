//! The wire envelope: one published message as it sits on the ledger.
//!
//! Logical fields: the publish index, this window's root, the Merkle
//! authentication path for the key at that index, and the masked body.
//! The body (payload plus the announced next root) is sealed under an
//! AEAD key derived from the one-time key, so the AEAD tag doubles as the
//! decryption-verification signal. Serialization is CBOR via serde.

use bytes::Bytes;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use serde::{Deserialize, Serialize};

use crate::crypto::{ChannelRoot, Digest, OneTimeKey, MASK_KEY_DOMAIN, MASK_NONCE_DOMAIN};
use crate::error::CoreError;
use crate::merkle::{verify_proof, MerkleProof};
use crate::window::MerkleWindow;

/// A sealed channel message, ready for `submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Absolute publish index of the one-time key.
    pub index: u64,
    /// Root of the window the key belongs to (the current anchor).
    pub root: ChannelRoot,
    /// Authentication path for the key's leaf within that window.
    pub proof: MerkleProof,
    /// AEAD-sealed body: CBOR of [`SealedBody`].
    pub ciphertext: Bytes,
}

/// The masked interior of an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SealedBody {
    payload: Bytes,
    next_root: ChannelRoot,
}

/// A verified, decrypted message as handed to the subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedMessage {
    /// The plaintext payload, byte-identical to what was published.
    pub payload: Bytes,
    /// The window root the message was authenticated against.
    pub root: ChannelRoot,
    /// The announced root of the following window.
    pub next_root: ChannelRoot,
}

impl Envelope {
    /// Seal `payload` under `key` for publication at `index` within
    /// `window`, announcing `next_root`.
    pub fn seal(
        key: &OneTimeKey,
        window: &MerkleWindow,
        index: u64,
        next_root: ChannelRoot,
        payload: &[u8],
    ) -> Result<Self, CoreError> {
        let proof = window.proof(index)?;

        let body = SealedBody {
            payload: Bytes::copy_from_slice(payload),
            next_root,
        };
        let mut plain = Vec::new();
        ciborium::into_writer(&body, &mut plain)
            .map_err(|e| CoreError::EncodingError(e.to_string()))?;

        let ciphertext = mask_cipher(key)
            .encrypt(&mask_nonce(key), plain.as_slice())
            .map_err(|_| CoreError::EncodingError("seal failed".into()))?;

        Ok(Self {
            index,
            root: window.root(),
            proof,
            ciphertext: ciphertext.into(),
        })
    }

    /// Verify and decrypt with the subscriber's derived key.
    ///
    /// Checks the Merkle path for the key's leaf against the claimed root
    /// before touching the ciphertext; any mismatch, including an AEAD tag
    /// failure, is [`CoreError::VerificationFailure`].
    pub fn open(&self, key: &OneTimeKey) -> Result<OpenedMessage, CoreError> {
        if !verify_proof(&self.root.digest(), &key.leaf_digest(), &self.proof) {
            return Err(CoreError::VerificationFailure);
        }

        let plain = mask_cipher(key)
            .decrypt(&mask_nonce(key), self.ciphertext.as_ref())
            .map_err(|_| CoreError::VerificationFailure)?;

        let body: SealedBody = ciborium::from_reader(plain.as_slice())
            .map_err(|_| CoreError::VerificationFailure)?;

        Ok(OpenedMessage {
            payload: body.payload,
            root: self.root,
            next_root: body.next_root,
        })
    }

    /// Serialize to ledger bytes.
    pub fn encode(&self) -> Result<Vec<u8>, CoreError> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| CoreError::EncodingError(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from ledger bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
    }
}

/// The AEAD cipher for a one-time key.
fn mask_cipher(key: &OneTimeKey) -> ChaCha20Poly1305 {
    let mask = Digest::domain_hash(MASK_KEY_DOMAIN, key.as_bytes());
    ChaCha20Poly1305::new(Key::from_slice(mask.as_bytes()))
}

/// The AEAD nonce for a one-time key. The key masks exactly one message,
/// so a key-derived nonce is never reused.
fn mask_nonce(key: &OneTimeKey) -> Nonce {
    let d = Digest::domain_hash(MASK_NONCE_DOMAIN, key.as_bytes());
    let mut nonce = [0u8; 12];
    nonce.copy_from_slice(&d.as_bytes()[..12]);
    nonce.into()
}

//! Proptest generators for property-based testing.

use proptest::prelude::*;

use maskstream_core::{
    ChannelRoot, Digest, KeyChain, MerkleWindow, OneTimeKey, RootSecret,
};

/// Generate a random root secret.
pub fn root_secret() -> impl Strategy<Value = RootSecret> {
    any::<[u8; 32]>().prop_map(RootSecret::from_bytes)
}

/// Generate a random one-time key.
pub fn one_time_key() -> impl Strategy<Value = OneTimeKey> {
    any::<[u8; 32]>().prop_map(OneTimeKey::from_bytes)
}

/// Generate a random digest.
pub fn digest() -> impl Strategy<Value = Digest> {
    any::<[u8; 32]>().prop_map(Digest::from_bytes)
}

/// Generate a random channel root.
pub fn channel_root() -> impl Strategy<Value = ChannelRoot> {
    any::<[u8; 32]>().prop_map(ChannelRoot::from_bytes)
}

/// Generate a usable window size. Includes 1 (rotation on every publish)
/// and non-powers of two (padded trees).
pub fn window_size() -> impl Strategy<Value = u64> {
    1u64..=16
}

/// Generate a window start index. Kept small: key derivation walks the
/// chain from index 0, so cost is linear in the start.
pub fn start_index() -> impl Strategy<Value = u64> {
    0u64..=256
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Parameters for building a Merkle window.
#[derive(Debug, Clone)]
pub struct WindowParams {
    pub secret: RootSecret,
    pub start: u64,
    pub count: u64,
}

impl Arbitrary for WindowParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (any::<[u8; 32]>(), start_index(), window_size())
            .prop_map(|(seed, start, count)| WindowParams {
                secret: RootSecret::from_bytes(seed),
                start,
                count,
            })
            .boxed()
    }
}

/// Build a window from parameters.
pub fn window_from_params(params: &WindowParams) -> MerkleWindow {
    let chain = KeyChain::new(params.secret);
    MerkleWindow::build(&chain, params.start, params.count)
        .expect("generated window parameters are valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use maskstream_core::{verify_proof, Envelope};

    proptest! {
        #[test]
        fn test_window_root_deterministic(params: WindowParams) {
            let w1 = window_from_params(&params);
            let w2 = window_from_params(&params);
            prop_assert_eq!(w1.root(), w2.root());
        }

        #[test]
        fn test_every_leaf_proof_verifies(params: WindowParams) {
            let chain = KeyChain::new(params.secret);
            let window = window_from_params(&params);

            for index in params.start..params.start + params.count {
                let proof = window.proof(index).unwrap();
                let leaf = chain.key(index).leaf_digest();
                prop_assert!(verify_proof(&window.root().digest(), &leaf, &proof));
            }
        }

        #[test]
        fn test_proof_fails_against_wrong_leaf(params: WindowParams) {
            let chain = KeyChain::new(params.secret);
            let window = window_from_params(&params);

            let proof = window.proof(params.start).unwrap();
            // A leaf from outside the window never verifies.
            let foreign = chain.key(params.start + params.count).leaf_digest();
            prop_assert!(!verify_proof(&window.root().digest(), &foreign, &proof));
        }

        #[test]
        fn test_key_advance_composes(key in one_time_key(), a in 0u64..50, b in 0u64..50) {
            prop_assert_eq!(key.advance(a).advance(b), key.advance(a + b));
        }

        #[test]
        fn test_chain_key_matches_advance(seed in any::<[u8; 32]>(), index in 0u64..100) {
            let chain = KeyChain::new(RootSecret::from_bytes(seed));
            prop_assert_eq!(chain.key(0).advance(index), chain.key(index));
        }

        #[test]
        fn test_seal_open_roundtrip(params: WindowParams, body in payload(512)) {
            let chain = KeyChain::new(params.secret);
            let window = window_from_params(&params);
            let next = MerkleWindow::build(&chain, params.start + params.count, params.count)
                .unwrap();

            let key = chain.key(params.start);
            let env = Envelope::seal(&key, &window, params.start, next.root(), &body).unwrap();
            let opened = env.open(&key).unwrap();

            prop_assert_eq!(opened.payload.as_ref(), body.as_slice());
            prop_assert_eq!(opened.root, window.root());
            prop_assert_eq!(opened.next_root, next.root());
        }

        #[test]
        fn test_open_with_wrong_key_rejected(params: WindowParams, body in payload(64)) {
            let chain = KeyChain::new(params.secret);
            let window = window_from_params(&params);
            let next = MerkleWindow::build(&chain, params.start + params.count, params.count)
                .unwrap();

            let key = chain.key(params.start);
            let env = Envelope::seal(&key, &window, params.start, next.root(), &body).unwrap();
            prop_assert!(env.open(&key.advance(1)).is_err());
        }

        #[test]
        fn test_addresses_distinct_along_chain(seed in any::<[u8; 32]>()) {
            let chain = KeyChain::new(RootSecret::from_bytes(seed));
            let addresses: Vec<_> = (0..8).map(|i| chain.key(i).address()).collect();
            for i in 0..addresses.len() {
                for j in i + 1..addresses.len() {
                    prop_assert_ne!(addresses[i], addresses[j]);
                }
            }
        }
    }
}

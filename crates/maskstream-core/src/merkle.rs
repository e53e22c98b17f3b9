//! Merkle tree over one-time key leaf digests.
//!
//! Leaves are padded with [`Digest::ZERO`] to the next power of two.
//! Interior nodes hash under a distinct domain, so a padding leaf can
//! never be confused with a node.

use serde::{Deserialize, Serialize};

use crate::crypto::{Digest, NODE_DOMAIN};

/// An inclusion proof for one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Position of the leaf within the window (0-based).
    pub leaf_index: u64,
    /// Sibling digests from leaf level up to just below the root.
    pub siblings: Vec<Digest>,
}

/// A fixed Merkle tree built over a batch of leaf digests.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// levels[0] is the padded leaf level; the last level is the root.
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Build a tree over the given leaves.
    ///
    /// The leaf slice must be non-empty; windows enforce this.
    pub fn build(leaves: &[Digest]) -> Self {
        debug_assert!(!leaves.is_empty());

        let width = leaves.len().next_power_of_two();
        let mut level: Vec<Digest> = leaves.to_vec();
        level.resize(width, Digest::ZERO);

        let mut levels = vec![level];
        while levels
            .last()
            .map(|l| l.len() > 1)
            .unwrap_or(false)
        {
            let below = &levels[levels.len() - 1];
            let mut above = Vec::with_capacity(below.len() / 2);
            for pair in below.chunks(2) {
                above.push(node(&pair[0], &pair[1]));
            }
            levels.push(above);
        }

        Self { levels }
    }

    /// The root digest.
    pub fn root(&self) -> Digest {
        self.levels[self.levels.len() - 1][0]
    }

    /// Number of (unpadded-or-padded) leaf slots.
    pub fn width(&self) -> usize {
        self.levels[0].len()
    }

    /// Inclusion proof for the leaf at `leaf_index`, if in range.
    pub fn proof(&self, leaf_index: usize) -> Option<MerkleProof> {
        if leaf_index >= self.width() {
            return None;
        }

        let mut siblings = Vec::with_capacity(self.levels.len() - 1);
        let mut pos = leaf_index;
        for level in &self.levels[..self.levels.len() - 1] {
            siblings.push(level[pos ^ 1]);
            pos >>= 1;
        }

        Some(MerkleProof {
            leaf_index: leaf_index as u64,
            siblings,
        })
    }
}

/// Verify that `leaf` sits at `proof.leaf_index` under `root`.
pub fn verify_proof(root: &Digest, leaf: &Digest, proof: &MerkleProof) -> bool {
    let mut acc = *leaf;
    let mut pos = proof.leaf_index;
    for sibling in &proof.siblings {
        acc = if pos & 1 == 0 {
            node(&acc, sibling)
        } else {
            node(sibling, &acc)
        };
        pos >>= 1;
    }
    pos == 0 && acc == *root
}

/// Hash an interior node from its two children.
fn node(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(NODE_DOMAIN);
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    Digest::from_bytes(*hasher.finalize().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves(n: usize) -> Vec<Digest> {
        (0..n)
            .map(|i| Digest::hash(&(i as u64).to_be_bytes()))
            .collect()
    }

    #[test]
    fn test_single_leaf_root_is_leaf() {
        let l = leaves(1);
        let tree = MerkleTree::build(&l);
        assert_eq!(tree.root(), l[0]);

        let proof = tree.proof(0).unwrap();
        assert!(proof.siblings.is_empty());
        assert!(verify_proof(&tree.root(), &l[0], &proof));
    }

    #[test]
    fn test_all_proofs_verify() {
        for n in [2usize, 3, 4, 5, 8] {
            let l = leaves(n);
            let tree = MerkleTree::build(&l);
            for (i, leaf) in l.iter().enumerate() {
                let proof = tree.proof(i).unwrap();
                assert!(
                    verify_proof(&tree.root(), leaf, &proof),
                    "proof failed for leaf {} of {}",
                    i,
                    n
                );
            }
        }
    }

    #[test]
    fn test_wrong_leaf_rejected() {
        let l = leaves(4);
        let tree = MerkleTree::build(&l);
        let proof = tree.proof(1).unwrap();
        assert!(!verify_proof(&tree.root(), &l[2], &proof));
    }

    #[test]
    fn test_wrong_position_rejected() {
        let l = leaves(4);
        let tree = MerkleTree::build(&l);
        let mut proof = tree.proof(1).unwrap();
        proof.leaf_index = 2;
        assert!(!verify_proof(&tree.root(), &l[1], &proof));
    }

    #[test]
    fn test_overlong_index_rejected() {
        // A forged proof claiming a position past the tree width must not
        // verify even if the sibling path happens to be empty.
        let l = leaves(1);
        let tree = MerkleTree::build(&l);
        let proof = MerkleProof {
            leaf_index: 5,
            siblings: vec![],
        };
        assert!(!verify_proof(&tree.root(), &l[0], &proof));
    }

    #[test]
    fn test_proof_out_of_range() {
        let l = leaves(4);
        let tree = MerkleTree::build(&l);
        assert!(tree.proof(4).is_none());
    }

    #[test]
    fn test_deterministic() {
        let l = leaves(7);
        assert_eq!(MerkleTree::build(&l).root(), MerkleTree::build(&l).root());
    }
}

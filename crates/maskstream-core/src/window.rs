//! Merkle windows and the double-buffered window rotator.
//!
//! A window commits to `count` consecutive one-time keys with a single
//! root. The rotator keeps exactly two windows alive, (current, next), so
//! the next root is always materialized before it is announced; older
//! windows are dropped and can be rebuilt deterministically if needed.

use std::mem;

use crate::crypto::ChannelRoot;
use crate::error::CoreError;
use crate::keychain::KeyChain;
use crate::merkle::{MerkleProof, MerkleTree};

/// A contiguous batch of one-time keys `[start, start + count)` committed
/// to by one Merkle root.
#[derive(Debug, Clone)]
pub struct MerkleWindow {
    start: u64,
    count: u64,
    tree: MerkleTree,
    root: ChannelRoot,
}

impl MerkleWindow {
    /// Build the window over `[start, start + count)`.
    ///
    /// Deterministic given the same `(secret, start, count)`. Fails with
    /// [`CoreError::InvalidWindow`] for `count == 0` or an index range
    /// that overflows.
    pub fn build(chain: &KeyChain, start: u64, count: u64) -> Result<Self, CoreError> {
        if count == 0 {
            return Err(CoreError::InvalidWindow("count must be positive".into()));
        }
        start
            .checked_add(count)
            .ok_or_else(|| CoreError::InvalidWindow("index range overflows".into()))?;

        let leaves: Vec<_> = chain
            .keys(start, count)
            .iter()
            .map(|k| k.leaf_digest())
            .collect();
        let tree = MerkleTree::build(&leaves);
        let root = ChannelRoot::from(tree.root());

        Ok(Self {
            start,
            count,
            tree,
            root,
        })
    }

    /// First index covered by this window.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Number of keys in this window.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// One past the last index covered by this window.
    pub fn end(&self) -> u64 {
        self.start + self.count
    }

    /// The window's Merkle root: the publicly announced channel anchor.
    pub fn root(&self) -> ChannelRoot {
        self.root
    }

    /// Whether the absolute `index` falls within this window.
    pub fn contains(&self, index: u64) -> bool {
        index >= self.start && index < self.end()
    }

    /// Inclusion proof for the key at absolute `index`.
    pub fn proof(&self, index: u64) -> Result<MerkleProof, CoreError> {
        if !self.contains(index) {
            return Err(CoreError::InvalidWindow(format!(
                "index {} outside window [{}, {})",
                index,
                self.start,
                self.end()
            )));
        }
        let local = (index - self.start) as usize;
        self.tree
            .proof(local)
            .ok_or_else(|| CoreError::InvalidWindow(format!("no leaf at {}", local)))
    }
}

/// The (current, next) window pair.
///
/// Invariant: `next.start == current.end()` at all times, and the publish
/// index handed to [`WindowRotator::advance`] never moves backwards.
#[derive(Debug, Clone)]
pub struct WindowRotator {
    current: MerkleWindow,
    next: MerkleWindow,
}

impl WindowRotator {
    /// Build the initial pair starting at `start`.
    pub fn new(chain: &KeyChain, start: u64, count: u64) -> Result<Self, CoreError> {
        let current = MerkleWindow::build(chain, start, count)?;
        let next = MerkleWindow::build(chain, start + count, count)?;
        Ok(Self { current, next })
    }

    /// The window covering the publish index.
    pub fn current(&self) -> &MerkleWindow {
        &self.current
    }

    /// The pre-built window announced as the next root.
    pub fn next(&self) -> &MerkleWindow {
        &self.next
    }

    /// Rotate until `index` falls within the current window.
    ///
    /// Called after every publish. Rotation is eager: the fresh next
    /// window is rebuilt immediately so its root can be announced.
    pub fn advance(&mut self, chain: &KeyChain, index: u64) -> Result<(), CoreError> {
        while index >= self.current.end() {
            let count = self.current.count();
            let fresh = MerkleWindow::build(chain, self.next.end(), count)?;
            self.current = mem::replace(&mut self.next, fresh);
        }
        Ok(())
    }
}

//! Thread-safe handle to the commitment tree
//!
//! Appends take the write lock, so there is exactly one writer at a time.
//! Path and root queries take read locks and may interleave with appends;
//! callers compare roots with [`crate::assert_shared_root`] instead of
//! assuming a snapshot.

use shieldkit_field::{FieldElement, Hasher};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::commitment::Commitment;
use crate::error::Result;
use crate::merkle::{MerkleTree, SiblingPath};

#[derive(Debug, Clone)]
pub struct SharedMerkleTree {
    inner: Arc<RwLock<MerkleTree>>,
}

impl SharedMerkleTree {
    pub fn new(tree: MerkleTree) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, MerkleTree> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MerkleTree> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one commitment; returns its index and the new root
    pub fn append(&self, commitment: &Commitment) -> Result<(u64, FieldElement)> {
        let mut tree = self.write();
        let index = tree.append(commitment)?;
        Ok((index, tree.root()))
    }

    /// Append in order; returns the first index and the new root
    pub fn append_many(&self, commitments: &[Commitment]) -> Result<(u64, FieldElement)> {
        let mut tree = self.write();
        let first = tree.append_many(commitments)?;
        Ok((first, tree.root()))
    }

    pub fn sibling_path(&self, commitment: &Commitment, index: u64) -> Result<SiblingPath> {
        self.read().sibling_path(commitment, index)
    }

    pub fn root(&self) -> FieldElement {
        self.read().root()
    }

    pub fn len(&self) -> u64 {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn leaf(&self, index: u64) -> Option<Commitment> {
        self.read().leaf(index)
    }

    pub fn hasher(&self) -> Hasher {
        *self.read().hasher()
    }

    pub fn depth(&self) -> usize {
        self.read().depth()
    }
}

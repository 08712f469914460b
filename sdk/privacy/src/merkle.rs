//! Append-only Merkle tree of commitments
//!
//! Sparse storage: only nodes that have a leaf below them are kept. Every
//! missing node reads as the zero filler, the same convention the shield
//! contract uses, so a single leaf in an empty tree hashes up as
//! `H(…H(H(c0, 0), 0)…, 0)`.
//!
//! ```text
//!                    Root                 path = [root, s1, s2]
//!                   /    \                for leaf C1:
//!                 H01     s1 = H23          s2 = C0 (leaf level)
//!                /  \                       s1 = H23
//!               C0  C1
//! ```
//!
//! Level 0 is the leaf level. Sibling paths list siblings from the top
//! (depth 1) down to the leaf level, after the root.

use log::debug;
use serde::{Deserialize, Serialize};
use shieldkit_field::{Element, FieldElement, Hasher};
use std::collections::{HashMap, VecDeque};

use crate::commitment::Commitment;
use crate::error::{PrivacyError, Result};

/// Default tree depth (supports 2^32 commitments)
pub const TREE_DEPTH: usize = 32;

/// Deepest tree whose leaf indices fit a `u64`
pub const MAX_TREE_DEPTH: usize = 63;

/// `[root, sibling at depth 1, …, sibling at depth D]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiblingPath {
    pub root: FieldElement,
    /// Top-down: `siblings[0]` is just below the root, the last one is a leaf
    pub siblings: Vec<FieldElement>,
}

impl SiblingPath {
    /// Flat `[root, s1, …, sD]` form
    pub fn nodes(&self) -> Vec<FieldElement> {
        std::iter::once(self.root)
            .chain(self.siblings.iter().copied())
            .collect()
    }

    pub fn from_nodes(nodes: &[FieldElement]) -> Result<Self> {
        let (root, siblings) = nodes
            .split_first()
            .ok_or_else(|| PrivacyError::Validation("empty sibling path".into()))?;
        Ok(Self {
            root: *root,
            siblings: siblings.to_vec(),
        })
    }

    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Siblings as 256-bit prover inputs, root excluded
    pub fn to_elements(&self) -> Vec<Element> {
        self.siblings.iter().map(Element::from).collect()
    }
}

/// Recompute the root from a leaf and its path and compare with `expected_root`.
///
/// At leaf level `l`, bit `l` of `index` selects the operand order: 0 puts
/// the running value on the left.
pub fn verify_path(
    hasher: &Hasher,
    commitment: &Commitment,
    index: u64,
    path: &SiblingPath,
    expected_root: &FieldElement,
) -> bool {
    let depth = path.depth();
    if depth == 0 || depth > MAX_TREE_DEPTH || index >> depth != 0 {
        return false;
    }
    let computed = path
        .siblings
        .iter()
        .rev()
        .enumerate()
        .fold(commitment.0, |current, (level, sibling)| {
            if (index >> level) & 1 == 0 {
                hasher.hash_pair(&current, sibling)
            } else {
                hasher.hash_pair(sibling, &current)
            }
        });
    &computed == expected_root
}

/// Fails with `InconsistentRoot` unless every path carries the same root
pub fn assert_shared_root(paths: &[&SiblingPath]) -> Result<FieldElement> {
    let (first, rest) = paths
        .split_first()
        .ok_or_else(|| PrivacyError::Validation("no sibling paths supplied".into()))?;
    if let Some(other) = rest.iter().find(|p| p.root != first.root) {
        return Err(PrivacyError::InconsistentRoot {
            first: first.root.to_hex(),
            second: other.root.to_hex(),
        });
    }
    Ok(first.root)
}

/// Sparse, append-only Merkle tree
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// Non-empty nodes: (level, index) -> hash
    nodes: HashMap<(usize, u64), FieldElement>,
    /// Next available leaf position
    next_index: u64,
    depth: usize,
    hasher: Hasher,
    root: FieldElement,
}

impl MerkleTree {
    pub fn new(hasher: Hasher, depth: usize) -> Result<Self> {
        if depth == 0 || depth > MAX_TREE_DEPTH {
            return Err(PrivacyError::Validation(format!(
                "tree depth must be between 1 and {MAX_TREE_DEPTH}, got {depth}"
            )));
        }
        Ok(Self {
            nodes: HashMap::new(),
            next_index: 0,
            depth,
            hasher,
            root: FieldElement::zero(),
        })
    }

    pub fn with_default_depth(hasher: Hasher) -> Self {
        Self {
            nodes: HashMap::new(),
            next_index: 0,
            depth: TREE_DEPTH,
            hasher,
            root: FieldElement::zero(),
        }
    }

    pub fn root(&self) -> FieldElement {
        self.root
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn hasher(&self) -> &Hasher {
        &self.hasher
    }

    /// Number of leaves appended so far
    pub fn len(&self) -> u64 {
        self.next_index
    }

    pub fn is_empty(&self) -> bool {
        self.next_index == 0
    }

    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    fn node(&self, level: usize, index: u64) -> FieldElement {
        self.nodes
            .get(&(level, index))
            .copied()
            .unwrap_or_else(FieldElement::zero)
    }

    /// Append a commitment and return its leaf index
    pub fn append(&mut self, commitment: &Commitment) -> Result<u64> {
        if self.next_index >= self.capacity() {
            return Err(PrivacyError::Validation(format!(
                "tree of depth {} is full",
                self.depth
            )));
        }
        let position = self.next_index;
        self.nodes.insert((0, position), commitment.0);

        let mut current_index = position;
        let mut current_hash = commitment.0;
        for level in 0..self.depth {
            let is_right = current_index & 1 == 1;
            let sibling = self.node(level, current_index ^ 1);
            current_hash = if is_right {
                self.hasher.hash_pair(&sibling, &current_hash)
            } else {
                self.hasher.hash_pair(&current_hash, &sibling)
            };
            current_index >>= 1;
            self.nodes.insert((level + 1, current_index), current_hash);
        }

        self.root = current_hash;
        self.next_index += 1;
        debug!("appended {} at leaf {position}", commitment.short());
        Ok(position)
    }

    /// Append several commitments in order; returns the first index
    pub fn append_many(&mut self, commitments: &[Commitment]) -> Result<u64> {
        let first = self.next_index;
        if first + commitments.len() as u64 > self.capacity() {
            return Err(PrivacyError::Validation(format!(
                "{} commitments do not fit in a tree of depth {}",
                commitments.len(),
                self.depth
            )));
        }
        for commitment in commitments {
            self.append(commitment)?;
        }
        Ok(first)
    }

    pub fn leaf(&self, index: u64) -> Option<Commitment> {
        self.nodes.get(&(0, index)).copied().map(Commitment)
    }

    pub fn contains(&self, index: u64, commitment: &Commitment) -> bool {
        self.leaf(index).as_ref() == Some(commitment)
    }

    /// Sibling path for `commitment`, which must be stored at `index`
    pub fn sibling_path(&self, commitment: &Commitment, index: u64) -> Result<SiblingPath> {
        if !self.contains(index, commitment) {
            return Err(PrivacyError::LeafNotFound {
                commitment: commitment.to_hex(),
                index,
            });
        }

        let mut siblings = Vec::with_capacity(self.depth);
        let mut current_index = index;
        for level in 0..self.depth {
            siblings.push(self.node(level, current_index ^ 1));
            current_index >>= 1;
        }
        siblings.reverse();

        Ok(SiblingPath {
            root: self.root,
            siblings,
        })
    }
}

/// Recent roots, most recent first
///
/// Lets a verifier accept a proof built against a root that was current a
/// few appends ago.
#[derive(Debug, Clone, Default)]
pub struct RootHistory {
    roots: VecDeque<FieldElement>,
    max_size: usize,
}

impl RootHistory {
    pub fn new(max_size: usize) -> Self {
        Self {
            roots: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record a new root, pruning the oldest beyond `max_size`
    pub fn push(&mut self, root: FieldElement) {
        self.roots.push_front(root);
        self.roots.truncate(self.max_size);
    }

    pub fn is_valid(&self, root: &FieldElement) -> bool {
        self.roots.contains(root)
    }

    pub fn current(&self) -> Option<&FieldElement> {
        self.roots.front()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

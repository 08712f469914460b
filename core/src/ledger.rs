//! Ledger collaborator
//!
//! The ledger verifies proofs, records spent nullifiers and inserts output
//! commitments into the tree. It answers with leaf-insertion events, from
//! which the caller learns where its new commitments landed.
//!
//! [`MemoryLedger`] keeps everything in process and is what tests and the
//! CLI run against.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use shieldkit_field::FieldElement;
use shieldkit_privacy::{Commitment, Nullifier, RootHistory, SharedMerkleTree};

use crate::compliance::ComplianceRecord;
use crate::error::{Result, ShieldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Mint,
    Transfer,
    BatchTransfer,
    ConsolidationTransfer,
    Burn,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mint => "mint",
            Self::Transfer => "transfer",
            Self::BatchTransfer => "batch-transfer",
            Self::ConsolidationTransfer => "consolidation-transfer",
            Self::Burn => "burn",
        };
        f.write_str(name)
    }
}

/// Everything an operation hands to the ledger
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub operation: Operation,
    /// Flattened proof, decimal strings
    pub proof: Vec<String>,
    /// Public inputs, decimal strings
    pub public_inputs: Vec<String>,
    /// Root the proof was built against (none for mint)
    pub root: Option<FieldElement>,
    pub nullifiers: Vec<Nullifier>,
    /// Output commitments in insertion order
    pub commitments: Vec<Commitment>,
    pub compliance: Option<ComplianceRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LedgerEvent {
    NewLeaf { leaf_index: u64, root: FieldElement },
    NewLeaves { min_leaf_index: u64, root: FieldElement },
}

impl LedgerEvent {
    pub fn first_index(&self) -> u64 {
        match self {
            Self::NewLeaf { leaf_index, .. } => *leaf_index,
            Self::NewLeaves { min_leaf_index, .. } => *min_leaf_index,
        }
    }

    pub fn root(&self) -> FieldElement {
        match self {
            Self::NewLeaf { root, .. } | Self::NewLeaves { root, .. } => *root,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub events: Vec<LedgerEvent>,
}

impl Receipt {
    /// The leaf-insertion event, if the submission inserted anything
    pub fn insertion(&self) -> Option<&LedgerEvent> {
        self.events.first()
    }
}

pub trait Ledger: Send + Sync {
    fn submit(&self, submission: Submission) -> Result<Receipt>;

    /// Whether `nullifier` has already been revealed
    fn is_spent(&self, nullifier: &Nullifier) -> bool;
}

#[derive(Debug, Default)]
struct LedgerState {
    spent: HashSet<Nullifier>,
    roots: RootHistory,
    compliance: Vec<ComplianceRecord>,
}

/// In-process ledger sharing the commitment tree with the shield context
#[derive(Debug)]
pub struct MemoryLedger {
    tree: SharedMerkleTree,
    state: Mutex<LedgerState>,
}

impl MemoryLedger {
    pub fn new(tree: SharedMerkleTree, root_history: usize) -> Self {
        let mut roots = RootHistory::new(root_history);
        roots.push(tree.root());
        Self {
            tree,
            state: Mutex::new(LedgerState {
                roots,
                ..Default::default()
            }),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn spent_count(&self) -> usize {
        self.state().spent.len()
    }

    /// Compliance records attached to accepted submissions
    pub fn compliance_records(&self) -> Vec<ComplianceRecord> {
        self.state().compliance.clone()
    }

    pub fn is_known_root(&self, root: &FieldElement) -> bool {
        self.state().roots.is_valid(root)
    }
}

impl Ledger for MemoryLedger {
    fn submit(&self, submission: Submission) -> Result<Receipt> {
        // One submission at a time, so nullifier checks and appends are atomic
        let mut state = self.state();

        if submission.proof.is_empty() {
            return Err(ShieldError::Ledger(format!(
                "{} submitted without a proof",
                submission.operation
            )));
        }
        if let Some(root) = &submission.root {
            if !state.roots.is_valid(root) {
                return Err(ShieldError::Ledger(format!("unknown root {root}")));
            }
        }

        let mut seen = HashSet::with_capacity(submission.nullifiers.len());
        for nullifier in &submission.nullifiers {
            if state.spent.contains(nullifier) || !seen.insert(*nullifier) {
                return Err(ShieldError::Ledger(format!(
                    "nullifier {} has already been spent",
                    nullifier.to_hex()
                )));
            }
        }

        let event = match submission.commitments.as_slice() {
            [] => None,
            [single] => {
                let (leaf_index, root) = self.tree.append(single)?;
                Some(LedgerEvent::NewLeaf { leaf_index, root })
            }
            many => {
                let (min_leaf_index, root) = self.tree.append_many(many)?;
                Some(LedgerEvent::NewLeaves {
                    min_leaf_index,
                    root,
                })
            }
        };

        state.spent.extend(seen);
        if let Some(event) = &event {
            state.roots.push(event.root());
        }
        if let Some(record) = submission.compliance {
            state.compliance.push(record);
        }

        log::info!(
            "Ledger accepted {} ({} nullifiers, {} commitments)",
            submission.operation,
            submission.nullifiers.len(),
            submission.commitments.len()
        );
        Ok(Receipt {
            events: event.into_iter().collect(),
        })
    }

    fn is_spent(&self, nullifier: &Nullifier) -> bool {
        self.state().spent.contains(nullifier)
    }
}

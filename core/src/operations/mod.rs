//! Protocol operations
//!
//! Every operation follows the same steps:
//!
//! ```text
//!  validate ──► derive nullifiers / commitments ──► sibling paths (shared root)
//!      │
//!      ▼
//!  prover vector ──► prove (blocking thread, temp workspace) ──► ledger ──► outcome
//! ```
//!
//! Nothing reaches the prover or the ledger until the request has passed
//! every local check.

mod batch;
mod burn;
mod consolidation;
mod mint;
mod transfer;

pub use batch::BatchTransferRequest;
pub use burn::BurnRequest;
pub use consolidation::ConsolidationRequest;
pub use transfer::TransferRequest;

use serde::Serialize;
use shieldkit_field::{Element, FieldElement, format_inputs};
use shieldkit_privacy::{
    AssetAddress, Commitment, NoteValue, Nullifier, OutputNote, Salt, SiblingPath, SpendableNote,
    ZkpPrivateKey, ZkpPublicKey,
};

use crate::compliance::ComplianceRecord;
use crate::context::ShieldContext;
use crate::error::{Result, ShieldError};
use crate::ledger::{Operation, Submission};

/// A commitment created by an operation, with what its owner needs to
/// spend it later
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedNote {
    pub commitment: Commitment,
    pub index: u64,
    pub owner: ZkpPublicKey,
    pub value: NoteValue,
    pub salt: Salt,
}

impl CreatedNote {
    pub fn spendable(&self) -> SpendableNote {
        SpendableNote::new(self.value, self.salt, self.commitment, self.index)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationOutcome {
    pub operation: Operation,
    /// New commitments in insertion order
    pub created: Vec<CreatedNote>,
    pub nullifiers: Vec<Nullifier>,
    /// Root the proof was built against (none for mint)
    pub spent_root: Option<FieldElement>,
    /// Root after the ledger applied the operation
    pub root: FieldElement,
    pub proof: Vec<String>,
    pub public_inputs: Vec<String>,
    pub compliance: Option<ComplianceRecord>,
}

/// An input that passed its checks, with everything the prover needs
struct OpenedInput {
    note: SpendableNote,
    nullifier: Nullifier,
    path: SiblingPath,
}

/// A fully checked operation, ready for the prover
struct Draft {
    operation: Operation,
    /// Names the prover workspace
    label: Commitment,
    inputs: Vec<OpenedInput>,
    outputs: Vec<PendingOutput>,
    spent_root: Option<FieldElement>,
    prover_inputs: Vec<Element>,
    public_input_hash: Element,
    compliance: Option<ComplianceRecord>,
}

/// Commitment about to be created, before the ledger assigns an index
struct PendingOutput {
    commitment: Commitment,
    owner: ZkpPublicKey,
    note: OutputNote,
}

impl PendingOutput {
    fn new(asset: &AssetAddress, owner: ZkpPublicKey, note: OutputNote) -> Self {
        let commitment = Commitment::derive(asset, note.value, &owner, &note.salt);
        Self {
            commitment,
            owner,
            note,
        }
    }
}

fn exactly<T>(items: &[T], expected: usize, what: &str) -> Result<()> {
    if items.len() != expected {
        return Err(ShieldError::Validation(format!(
            "expected {expected} {what}, got {}",
            items.len()
        )));
    }
    Ok(())
}

fn pair<T>(items: Vec<T>, what: &str) -> Result<[T; 2]> {
    items.try_into().map_err(|items: Vec<T>| {
        ShieldError::Validation(format!("expected 2 {what}, got {}", items.len()))
    })
}

fn distinct_nullifiers(inputs: &[OpenedInput]) -> Result<()> {
    for (i, a) in inputs.iter().enumerate() {
        if inputs[..i].iter().any(|b| b.nullifier == a.nullifier) {
            return Err(ShieldError::Validation(format!(
                "input at index {} is spent twice",
                a.note.index
            )));
        }
    }
    Ok(())
}

impl ShieldContext {
    /// Check that `input` opens to its commitment under `owner`, has not
    /// been spent, and sits in the tree at its index
    fn open_input(
        &self,
        asset: &AssetAddress,
        owner: &ZkpPublicKey,
        owner_key: &ZkpPrivateKey,
        input: &SpendableNote,
    ) -> Result<OpenedInput> {
        let expected = Commitment::derive(asset, input.value, owner, &input.salt);
        if expected != input.commitment {
            return Err(ShieldError::Validation(format!(
                "input {} does not open to its commitment",
                input.commitment.short()
            )));
        }

        let nullifier = input.nullifier(owner_key);
        if self.ledger().is_spent(&nullifier) {
            return Err(ShieldError::Ledger(format!(
                "input {} has already been spent",
                input.commitment.short()
            )));
        }

        let path = self.tree().sibling_path(&input.commitment, input.index)?;
        log::debug!(
            "Opened input {} at index {} (nullifier {})",
            input.commitment.short(),
            input.index,
            &nullifier.to_hex()[..14]
        );
        Ok(OpenedInput {
            note: input.clone(),
            nullifier,
            path,
        })
    }

    /// Prove `draft`, submit it and pair its outputs with the indices the
    /// ledger reports
    async fn execute(&self, draft: Draft) -> Result<OperationOutcome> {
        let Draft {
            operation,
            label,
            inputs,
            outputs,
            spent_root,
            prover_inputs,
            public_input_hash,
            compliance,
        } = draft;

        let proof = self.prove(operation, &label, &prover_inputs).await?;
        let public_inputs = format_inputs(std::slice::from_ref(&public_input_hash));
        let nullifiers: Vec<Nullifier> = inputs.iter().map(|i| i.nullifier).collect();

        let receipt = self.submit(Submission {
            operation,
            proof: proof.proof.clone(),
            public_inputs: public_inputs.clone(),
            root: spent_root,
            nullifiers: nullifiers.clone(),
            commitments: outputs.iter().map(|o| o.commitment).collect(),
            compliance: compliance.clone(),
        })?;

        let (first_index, root) = match receipt.insertion() {
            Some(event) => (event.first_index(), event.root()),
            None if outputs.is_empty() => (0, self.tree().root()),
            None => {
                return Err(ShieldError::Ledger(format!(
                    "{operation} receipt has no leaf insertion event"
                )));
            }
        };

        let created: Vec<CreatedNote> = outputs
            .into_iter()
            .zip(first_index..)
            .map(|(output, index)| CreatedNote {
                commitment: output.commitment,
                index,
                owner: output.owner,
                value: output.note.value,
                salt: output.note.salt,
            })
            .collect();
        for note in &created {
            log::info!("{operation}: {} at leaf {}", note.commitment.short(), note.index);
        }

        Ok(OperationOutcome {
            operation,
            created,
            nullifiers,
            spent_root,
            root,
            proof: proof.proof,
            public_inputs,
            compliance,
        })
    }
}

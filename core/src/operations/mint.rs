use shieldkit_privacy::{Note, OutputNote};

use super::{Draft, OperationOutcome, PendingOutput};
use crate::context::ShieldContext;
use crate::error::Result;
use crate::inputs::public_input_hash;
use crate::ledger::Operation;

impl ShieldContext {
    /// Mint `note.value` of `note.asset` into a new commitment owned by
    /// `note.owner`.
    ///
    /// Public input hash: `H(asset, amount, commitment)`.
    ///
    /// Prover inputs: `[pih, asset₂₄₈, amount₁₂₈, pk, salt, commitment]`.
    pub async fn mint(&self, note: &Note) -> Result<OperationOutcome> {
        let output = PendingOutput::new(
            &note.asset,
            note.owner,
            OutputNote::new(note.value, note.salt),
        );
        let commitment = output.commitment;
        log::info!("Minting {}", commitment.short());

        let amount = note.value.to_element();
        let pih = public_input_hash(&[
            note.asset.to_element(),
            amount.clone(),
            commitment.to_element(),
        ])?;

        let prover_inputs = vec![
            pih.clone(),
            note.asset.to_circuit_element(),
            amount,
            note.owner.to_element(),
            note.salt.to_element(),
            commitment.to_element(),
        ];

        self.execute(Draft {
            operation: Operation::Mint,
            label: commitment,
            inputs: Vec::new(),
            outputs: vec![output],
            spent_root: None,
            prover_inputs,
            public_input_hash: pih,
            compliance: None,
        })
        .await
    }
}

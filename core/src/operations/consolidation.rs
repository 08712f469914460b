use shieldkit_config::BATCH_SIZE;
use shieldkit_field::Element;
use shieldkit_privacy::{
    AssetAddress, OutputNote, SpendableNote, ZkpPrivateKey, ZkpPublicKey, assert_shared_root,
    check_conservation,
};

use super::{Draft, OperationOutcome, PendingOutput, distinct_nullifiers, exactly};
use crate::context::ShieldContext;
use crate::error::Result;
use crate::inputs::{index_element, public_input_hash};
use crate::ledger::Operation;

/// [`BATCH_SIZE`] inputs merged into one output owned by `receiver`
#[derive(Debug, Clone)]
pub struct ConsolidationRequest {
    pub asset: AssetAddress,
    pub inputs: Vec<SpendableNote>,
    pub output: OutputNote,
    pub receiver: ZkpPublicKey,
    pub sender_key: ZkpPrivateKey,
}

impl ShieldContext {
    /// [`BATCH_SIZE`]-in, one-out transfer. The output value must equal
    /// the sum of the inputs.
    ///
    /// Public input hash: `H(root, nf₁ … nf_N, c)`.
    ///
    /// Prover inputs:
    /// `[pih, asset, v₁…v_N, sk, salt₁…salt_N, path₁…path_N, index₁…index_N,
    ///   nf₁…nf_N, v_out, receiver pk, salt_out, c, root]`
    ///
    /// The consolidation circuit takes the root as one 256-bit element in
    /// both hash modes.
    pub async fn consolidation_transfer(
        &self,
        request: ConsolidationRequest,
    ) -> Result<OperationOutcome> {
        let ConsolidationRequest {
            asset,
            inputs,
            output,
            receiver,
            sender_key,
        } = request;
        exactly(&inputs, BATCH_SIZE, "consolidation inputs")?;
        let input_values: Vec<_> = inputs.iter().map(|i| i.value).collect();
        check_conservation(&input_values, &[output.value])?;

        let sender = sender_key.public_key();
        let opened = inputs
            .iter()
            .map(|input| self.open_input(&asset, &sender, &sender_key, input))
            .collect::<Result<Vec<_>>>()?;
        distinct_nullifiers(&opened)?;
        let paths: Vec<_> = opened.iter().map(|i| &i.path).collect();
        let root = assert_shared_root(&paths)?;

        let pending = PendingOutput::new(&asset, receiver, output);
        log::info!(
            "Consolidating {} inputs into {}",
            opened.len(),
            pending.commitment.short()
        );

        let mut hashed: Vec<Element> = vec![root.into()];
        hashed.extend(opened.iter().map(|i| i.nullifier.to_element()));
        hashed.push(pending.commitment.to_element());
        let pih = public_input_hash(&hashed)?;

        let mut prover_inputs = vec![pih.clone(), asset.to_circuit_element()];
        prover_inputs.extend(opened.iter().map(|i| i.note.value.to_element()));
        prover_inputs.push(sender_key.to_element());
        prover_inputs.extend(opened.iter().map(|i| i.note.salt.to_element()));
        for input in &opened {
            prover_inputs.extend(input.path.to_elements());
        }
        for input in &opened {
            prover_inputs.push(index_element(input.note.index)?);
        }
        prover_inputs.extend(opened.iter().map(|i| i.nullifier.to_element()));
        prover_inputs.extend([
            pending.note.value.to_element(),
            receiver.to_element(),
            pending.note.salt.to_element(),
            pending.commitment.to_element(),
        ]);
        prover_inputs.push(Element::from(&root));

        self.execute(Draft {
            operation: Operation::ConsolidationTransfer,
            label: pending.commitment,
            inputs: opened,
            outputs: vec![pending],
            spent_root: Some(root),
            prover_inputs,
            public_input_hash: pih,
            compliance: None,
        })
        .await
    }
}

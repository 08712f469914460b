use shieldkit_config::BATCH_SIZE;
use shieldkit_field::Element;
use shieldkit_privacy::{
    AssetAddress, OutputNote, SpendableNote, ZkpPrivateKey, ZkpPublicKey, check_conservation,
};

use super::{Draft, OperationOutcome, PendingOutput, exactly};
use crate::context::ShieldContext;
use crate::error::Result;
use crate::inputs::{path_elements, public_input_hash, root_elements};
use crate::ledger::Operation;

/// One input split into [`BATCH_SIZE`] outputs, `outputs[i]` owned by
/// `receivers[i]`. Unused slots carry zero-value outputs.
#[derive(Debug, Clone)]
pub struct BatchTransferRequest {
    pub asset: AssetAddress,
    pub input: SpendableNote,
    pub outputs: Vec<OutputNote>,
    pub receivers: Vec<ZkpPublicKey>,
    pub sender_key: ZkpPrivateKey,
}

impl ShieldContext {
    /// One-in, [`BATCH_SIZE`]-out transfer. The output values must sum to
    /// exactly the input value.
    ///
    /// Public input hash: `H(root, nf, c₁ … c_N)`.
    ///
    /// Prover inputs:
    /// `[pih, asset, v_in, sk, salt_in, path…, index, nf, v₁…v_N, pk₁…pk_N,
    ///   salt₁…salt_N, c₁…c_N, root…]`
    pub async fn batch_transfer(&self, request: BatchTransferRequest) -> Result<OperationOutcome> {
        let BatchTransferRequest {
            asset,
            input,
            outputs,
            receivers,
            sender_key,
        } = request;
        exactly(&outputs, BATCH_SIZE, "batch outputs")?;
        exactly(&receivers, BATCH_SIZE, "batch receivers")?;
        let output_values: Vec<_> = outputs.iter().map(|o| o.value).collect();
        check_conservation(&[input.value], &output_values)?;

        let sender = sender_key.public_key();
        let opened = self.open_input(&asset, &sender, &sender_key, &input)?;
        let root = opened.path.root;

        let pending: Vec<PendingOutput> = outputs
            .into_iter()
            .zip(receivers.iter().copied())
            .map(|(note, owner)| PendingOutput::new(&asset, owner, note))
            .collect();
        log::info!(
            "Batch transferring {} to {} outputs",
            input.commitment.short(),
            pending.len()
        );

        let mut hashed: Vec<Element> = vec![root.into(), opened.nullifier.to_element()];
        hashed.extend(pending.iter().map(|p| p.commitment.to_element()));
        let pih = public_input_hash(&hashed)?;

        let mut prover_inputs = vec![
            pih.clone(),
            asset.to_circuit_element(),
            input.value.to_element(),
            sender_key.to_element(),
            input.salt.to_element(),
        ];
        prover_inputs.extend(path_elements(&opened.path, input.index)?);
        prover_inputs.push(opened.nullifier.to_element());
        prover_inputs.extend(pending.iter().map(|p| p.note.value.to_element()));
        prover_inputs.extend(receivers.iter().map(ZkpPublicKey::to_element));
        prover_inputs.extend(pending.iter().map(|p| p.note.salt.to_element()));
        prover_inputs.extend(pending.iter().map(|p| p.commitment.to_element()));
        prover_inputs.extend(root_elements(self.hasher().mode(), &root)?);

        self.execute(Draft {
            operation: Operation::BatchTransfer,
            label: pending[0].commitment,
            inputs: vec![opened],
            outputs: pending,
            spent_root: Some(root),
            prover_inputs,
            public_input_hash: pih,
            compliance: None,
        })
        .await
    }
}

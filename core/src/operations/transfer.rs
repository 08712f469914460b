use shieldkit_privacy::{
    AssetAddress, OutputNote, SpendableNote, ZkpPrivateKey, ZkpPublicKey, assert_shared_root,
    check_two_by_two,
};

use super::{Draft, OperationOutcome, PendingOutput, distinct_nullifiers, pair};
use crate::compliance::ComplianceRecord;
use crate::context::ShieldContext;
use crate::error::Result;
use crate::inputs::{path_elements, public_input_hash, root_elements};
use crate::ledger::Operation;

/// Two inputs owned by the sender, two outputs: `outputs[0]` goes to
/// `receiver`, `outputs[1]` returns change to the sender
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub asset: AssetAddress,
    pub inputs: Vec<SpendableNote>,
    pub outputs: Vec<OutputNote>,
    pub receiver: ZkpPublicKey,
    pub sender_key: ZkpPrivateKey,
}

impl ShieldContext {
    /// Two-in, two-out shielded transfer.
    ///
    /// Both input and output sums must stay within `0xffffffff` and be
    /// equal. Public input hash: `H(root, nf₀, nf₁, c₀, c₁)`.
    ///
    /// Prover inputs:
    /// `[pih, asset, v_in0, sk, salt_in0, path_in0…, index_in0, v_in1, salt_in1,
    ///   path_in1…, index_in1, nf₀, nf₁, v_out0, receiver pk, salt_out0, c₀,
    ///   v_out1, salt_out1, c₁, root…]`
    pub async fn transfer(&self, request: TransferRequest) -> Result<OperationOutcome> {
        let TransferRequest {
            asset,
            inputs,
            outputs,
            receiver,
            sender_key,
        } = request;
        let [in0, in1] = pair(inputs, "transfer inputs")?;
        let [to_receiver, change] = pair(outputs, "transfer outputs")?;
        check_two_by_two(&[in0.value, in1.value], &[to_receiver.value, change.value])?;

        let sender = sender_key.public_key();
        let opened = vec![
            self.open_input(&asset, &sender, &sender_key, &in0)?,
            self.open_input(&asset, &sender, &sender_key, &in1)?,
        ];
        distinct_nullifiers(&opened)?;
        let root = assert_shared_root(&[&opened[0].path, &opened[1].path])?;

        let pending = vec![
            PendingOutput::new(&asset, receiver, to_receiver),
            PendingOutput::new(&asset, sender, change),
        ];
        log::info!(
            "Transferring {} + {} -> {} + {}",
            in0.commitment.short(),
            in1.commitment.short(),
            pending[0].commitment.short(),
            pending[1].commitment.short()
        );

        let pih = public_input_hash(&[
            root.into(),
            opened[0].nullifier.to_element(),
            opened[1].nullifier.to_element(),
            pending[0].commitment.to_element(),
            pending[1].commitment.to_element(),
        ])?;

        let mut prover_inputs = vec![
            pih.clone(),
            asset.to_circuit_element(),
            in0.value.to_element(),
            sender_key.to_element(),
            in0.salt.to_element(),
        ];
        prover_inputs.extend(path_elements(&opened[0].path, in0.index)?);
        prover_inputs.extend([in1.value.to_element(), in1.salt.to_element()]);
        prover_inputs.extend(path_elements(&opened[1].path, in1.index)?);
        prover_inputs.extend([
            opened[0].nullifier.to_element(),
            opened[1].nullifier.to_element(),
            pending[0].note.value.to_element(),
            receiver.to_element(),
            pending[0].note.salt.to_element(),
            pending[0].commitment.to_element(),
            pending[1].note.value.to_element(),
            pending[1].note.salt.to_element(),
            pending[1].commitment.to_element(),
        ]);
        prover_inputs.extend(root_elements(self.hasher().mode(), &root)?);

        let compliance = self
            .compliance_keys()
            .map(|keys| {
                ComplianceRecord::for_transfer(keys, pending[0].note.value, &sender, &receiver)
            })
            .transpose()?;

        self.execute(Draft {
            operation: Operation::Transfer,
            label: pending[0].commitment,
            inputs: opened,
            outputs: pending,
            spent_root: Some(root),
            prover_inputs,
            public_input_hash: pih,
            compliance,
        })
        .await
    }
}

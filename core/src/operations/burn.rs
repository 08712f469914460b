use shieldkit_privacy::{AssetAddress, PayToAddress, SpendableNote, ZkpPrivateKey};

use super::{Draft, OperationOutcome};
use crate::compliance::ComplianceRecord;
use crate::context::ShieldContext;
use crate::error::Result;
use crate::inputs::{path_elements, public_input_hash, root_elements};
use crate::ledger::Operation;

/// Burn a whole note and pay its value out to `pay_to`
#[derive(Debug, Clone)]
pub struct BurnRequest {
    pub asset: AssetAddress,
    pub input: SpendableNote,
    pub pay_to: PayToAddress,
    pub sender_key: ZkpPrivateKey,
}

impl ShieldContext {
    /// Spend a commitment back into public tokens.
    ///
    /// Public input hash: `H(asset, root, nf, amount, payTo)`.
    ///
    /// Prover inputs:
    /// `[pih, asset₂₄₈, payTo, amount₁₂₈, sk, salt, path…, index, nf, root…]`
    pub async fn burn(&self, request: BurnRequest) -> Result<OperationOutcome> {
        let BurnRequest {
            asset,
            input,
            pay_to,
            sender_key,
        } = request;

        let sender = sender_key.public_key();
        let opened = self.open_input(&asset, &sender, &sender_key, &input)?;
        let root = opened.path.root;
        log::info!("Burning {} to {}", input.commitment.short(), pay_to.to_hex());

        let amount = input.value.to_element();
        let pih = public_input_hash(&[
            asset.to_element(),
            root.into(),
            opened.nullifier.to_element(),
            amount.clone(),
            pay_to.to_element(),
        ])?;

        let mut prover_inputs = vec![
            pih.clone(),
            asset.to_circuit_element(),
            pay_to.to_element(),
            amount,
            sender_key.to_element(),
            input.salt.to_element(),
        ];
        prover_inputs.extend(path_elements(&opened.path, input.index)?);
        prover_inputs.push(opened.nullifier.to_element());
        prover_inputs.extend(root_elements(self.hasher().mode(), &root)?);

        let compliance = self
            .compliance_keys()
            .map(|keys| ComplianceRecord::for_burn(keys, &sender))
            .transpose()?;

        self.execute(Draft {
            operation: Operation::Burn,
            label: input.commitment,
            inputs: vec![opened],
            outputs: Vec::new(),
            spent_root: Some(root),
            prover_inputs,
            public_input_hash: pih,
            compliance,
        })
        .await
    }
}

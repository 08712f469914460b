//! Shield context
//!
//! Owns the per-deployment state every operation needs: the configuration,
//! the one [`Hasher`] the tree was built with, the tree itself, the
//! authority keys and the prover and ledger collaborators.

use std::path::PathBuf;
use std::sync::Arc;

use shieldkit_config::{ProgramConfig, ShieldConfig};
use shieldkit_elgamal::{AuthorityKeys, AuthorityRegistry};
use shieldkit_field::{Element, Hasher, format_inputs};
use shieldkit_privacy::{
    AssetAddress, Commitment, MerkleTree, Note, NoteValue, Salt, SharedMerkleTree, ZkpPublicKey,
};
use shieldkit_prover::{ProofBackend, ProofJob, ProofResult, ProofWorkspace};

use crate::error::{Result, ShieldError};
use crate::ledger::{Ledger, MemoryLedger, Operation, Receipt, Submission};

pub struct ShieldContext {
    config: ShieldConfig,
    hasher: Hasher,
    tree: SharedMerkleTree,
    authority: AuthorityRegistry,
    prover: Arc<dyn ProofBackend>,
    ledger: Arc<dyn Ledger>,
}

/// Result of [`ShieldContext::check_correctness`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectnessCheck {
    /// The preimage hashes to the claimed commitment
    pub commitment_correct: bool,
    /// The tree holds the commitment at the claimed index
    pub onchain_correct: bool,
}

impl CorrectnessCheck {
    pub fn is_valid(&self) -> bool {
        self.commitment_correct && self.onchain_correct
    }
}

impl ShieldContext {
    /// Build a context around an existing tree and ledger.
    ///
    /// The tree must use the configured hash mode and depth. Authority keys
    /// from the configuration are installed when compliance is enabled.
    pub fn new(
        config: ShieldConfig,
        tree: SharedMerkleTree,
        prover: Arc<dyn ProofBackend>,
        ledger: Arc<dyn Ledger>,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| ShieldError::Config(format!("{e:#}")))?;

        let hasher = Hasher::new(config.hash.mode);
        if tree.hasher() != hasher {
            return Err(ShieldError::Config(format!(
                "tree hashes with {} but the deployment uses {}",
                tree.hasher().mode(),
                config.hash.mode
            )));
        }
        if tree.depth() != config.tree.depth {
            return Err(ShieldError::Config(format!(
                "tree depth is {} but the deployment uses {}",
                tree.depth(),
                config.tree.depth
            )));
        }

        let mut authority = AuthorityRegistry::new();
        if config.compliance.enabled {
            let keys = AuthorityKeys::from_hex(&config.compliance.authority_private_keys)?;
            authority.set_authority_private_keys(keys)?;
        }

        log::info!(
            "Shield context ready: hash={}, depth={}, prover={}, compliance={}",
            config.hash.mode,
            config.tree.depth,
            prover.name(),
            authority.is_set()
        );

        Ok(Self {
            config,
            hasher,
            tree,
            authority,
            prover,
            ledger,
        })
    }

    /// A fresh tree with an in-process ledger, returned alongside the
    /// context so callers can inspect it
    pub fn in_memory(
        config: ShieldConfig,
        prover: Arc<dyn ProofBackend>,
    ) -> Result<(Self, Arc<MemoryLedger>)> {
        let tree = MerkleTree::new(Hasher::new(config.hash.mode), config.tree.depth)?;
        let tree = SharedMerkleTree::new(tree);
        let ledger = Arc::new(MemoryLedger::new(tree.clone(), config.tree.root_history));
        let context = Self::new(config, tree, prover, ledger.clone())?;
        Ok((context, ledger))
    }

    pub fn config(&self) -> &ShieldConfig {
        &self.config
    }

    pub fn hasher(&self) -> Hasher {
        self.hasher
    }

    pub fn tree(&self) -> &SharedMerkleTree {
        &self.tree
    }

    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    pub fn set_authority_private_keys(&mut self, keys: AuthorityKeys) -> Result<()> {
        Ok(self.authority.set_authority_private_keys(keys)?)
    }

    pub fn clear_authority_private_keys(&mut self) -> Option<AuthorityKeys> {
        self.authority.clear_authority_private_keys()
    }

    /// Keys to encrypt compliance records to, if compliance is active
    pub(crate) fn compliance_keys(&self) -> Option<&AuthorityKeys> {
        if self.config.compliance.enabled {
            self.authority.keys()
        } else {
            None
        }
    }

    pub(crate) fn program(&self, operation: Operation) -> &ProgramConfig {
        let programs = &self.config.prover.programs;
        match operation {
            Operation::Mint => &programs.mint,
            Operation::Transfer => &programs.transfer,
            Operation::BatchTransfer => &programs.batch_transfer,
            Operation::ConsolidationTransfer => &programs.consolidation_transfer,
            Operation::Burn => &programs.burn,
        }
    }

    /// Run the prover on a blocking thread inside a workspace labelled
    /// `label`. The workspace is removed whether proving succeeds or not.
    pub(crate) async fn prove(
        &self,
        operation: Operation,
        label: &Commitment,
        inputs: &[Element],
    ) -> Result<ProofResult> {
        let job = ProofJob::new(
            self.program(operation),
            &self.config.prover.scheme,
            format_inputs(inputs),
        );
        let parent = self.config.prover.output_directory.as_ref().map(PathBuf::from);
        let backend = Arc::clone(&self.prover);
        let label = label.to_hex();

        log::info!("Proving {operation} with {} inputs", inputs.len());
        let proof = tokio::task::spawn_blocking(move || {
            let workspace = ProofWorkspace::create(parent.as_deref(), &label)?;
            let outcome = job.run(backend.as_ref(), &workspace);
            let closed = workspace.close();
            let proof = outcome?;
            closed?;
            Ok::<_, shieldkit_prover::ProverError>(proof)
        })
        .await??;
        log::debug!("{operation} proof ready ({} components)", proof.len());
        Ok(proof)
    }

    pub(crate) fn submit(&self, submission: Submission) -> Result<Receipt> {
        let operation = submission.operation;
        let receipt = self.ledger.submit(submission)?;
        log::debug!("{operation} receipt: {:?}", receipt.events);
        Ok(receipt)
    }

    /// Check an incoming commitment before relying on it.
    ///
    /// Recomputes the commitment from its preimage and confirms the tree
    /// holds it at `index`.
    pub fn check_correctness(
        &self,
        asset: &AssetAddress,
        value: NoteValue,
        owner: &ZkpPublicKey,
        salt: &Salt,
        commitment: &Commitment,
        index: u64,
    ) -> CorrectnessCheck {
        let recomputed = Note::new(*asset, value, *owner, *salt).commitment();
        let check = CorrectnessCheck {
            commitment_correct: recomputed == *commitment,
            onchain_correct: self.tree.leaf(index).as_ref() == Some(commitment),
        };
        if !check.is_valid() {
            log::warn!(
                "Commitment {} at index {index} failed checks: {check:?}",
                commitment.short()
            );
        }
        check
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shieldkit_prover::MockProver;

    #[test]
    fn test_rejects_mismatched_tree() {
        let config = ShieldConfig::default();
        let tree = SharedMerkleTree::new(MerkleTree::new(Hasher::mimc(), config.tree.depth).unwrap());
        let ledger = Arc::new(MemoryLedger::new(tree.clone(), 10));
        let err = ShieldContext::new(config, tree, Arc::new(MockProver::new()), ledger)
            .err()
            .unwrap();
        assert!(matches!(err, ShieldError::Config(_)), "got {err:?}");
    }

    #[test]
    fn test_compliance_keys_from_config() {
        let mut config = ShieldConfig::default();
        config.compliance.enabled = true;
        config.compliance.authority_private_keys = vec!["0x01".into(), "0x02".into(), "0x03".into()];
        let (mut context, _) = ShieldContext::in_memory(config, Arc::new(MockProver::new())).unwrap();
        assert_eq!(context.compliance_keys().map(AuthorityKeys::len), Some(3));

        let again = AuthorityKeys::from_hex(&["0x04"]).unwrap();
        assert!(context.set_authority_private_keys(again.clone()).is_err(), "keys are set once");
        assert!(context.clear_authority_private_keys().is_some());
        context.set_authority_private_keys(again).unwrap();
        assert_eq!(context.compliance_keys().map(AuthorityKeys::len), Some(1));
    }

    #[test]
    fn test_check_correctness() {
        let (context, _) =
            ShieldContext::in_memory(ShieldConfig::default(), Arc::new(MockProver::new())).unwrap();
        let asset = AssetAddress::from_hex("0x01").unwrap();
        let owner = shieldkit_privacy::ZkpPrivateKey::from_bytes([0x11; 32]).public_key();
        let salt = Salt::from_bytes([0xaa; 32]);
        let note = Note::new(asset, NoteValue::new(0x20), owner, salt);
        let commitment = note.commitment();
        let index = context.tree().append(&commitment).unwrap().0;

        let check =
            context.check_correctness(&asset, NoteValue::new(0x20), &owner, &salt, &commitment, index);
        assert!(check.is_valid());

        let check =
            context.check_correctness(&asset, NoteValue::new(0x21), &owner, &salt, &commitment, index);
        assert!(!check.commitment_correct, "wrong value");
        assert!(check.onchain_correct);

        let check =
            context.check_correctness(&asset, NoteValue::new(0x20), &owner, &salt, &commitment, 5);
        assert!(!check.onchain_correct, "nothing stored at index 5");
    }
}

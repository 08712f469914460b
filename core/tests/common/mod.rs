#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use shieldkit_config::ShieldConfig;
use shieldkit_core::{MemoryLedger, OperationOutcome, ShieldContext};
use shieldkit_field::HashMode;
use shieldkit_privacy::{AssetAddress, Note, NoteValue, Salt, ZkpPrivateKey, ZkpPublicKey};
use shieldkit_prover::{MockProver, ProofBackend, ProofResult};
use tempfile::TempDir;

pub const PK_HEX: &str = "0x00d449a31fbb267c8f352e9968a79e3e5fc95c1bbeaa502fd6454ebde5a4bedc";
pub const COMMITMENT_HEX: &str =
    "0x00ac321493cdb70e00a1ad5dfdd8b541cc40ae5466b464e1ba0a77605f9e0e4a";
pub const NULLIFIER_HEX: &str =
    "0x008b9969b1724fadee969800cc108aa90d04ba6a9175e636e66876997019dd69";
pub const ONE_LEAF_ROOT_HEX: &str =
    "0x00cfb8dd1c1d48137bcd03306cdd1f5da45684c193031bc81ddc47215650a4a9";

pub fn sender_key() -> ZkpPrivateKey {
    ZkpPrivateKey::from_bytes([0x11; 32])
}

pub fn receiver_key() -> ZkpPrivateKey {
    ZkpPrivateKey::from_bytes([0x22; 32])
}

pub fn asset() -> AssetAddress {
    AssetAddress::from_hex("0x01").unwrap()
}

pub fn note(value: u128, owner: ZkpPublicKey) -> Note {
    Note::random(asset(), NoteValue::new(value), owner)
}

/// The reference note: 0x20 of asset 0x01 owned by H(0x11…11), salt 0xAA…AA
pub fn reference_note() -> Note {
    Note::new(
        asset(),
        NoteValue::new(0x20),
        sender_key().public_key(),
        Salt::from_bytes([0xaa; 32]),
    )
}

/// Records every prover input vector and delegates to the mock prover
#[derive(Default)]
pub struct RecordingProver {
    inner: MockProver,
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingProver {
    pub fn last_inputs(&self) -> Vec<String> {
        self.calls.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl ProofBackend for RecordingProver {
    fn compute_witness(
        &self,
        program: &Path,
        output_dir: &Path,
        witness_name: &str,
        inputs: &[String],
    ) -> shieldkit_prover::Result<PathBuf> {
        self.calls.lock().unwrap().push(inputs.to_vec());
        self.inner
            .compute_witness(program, output_dir, witness_name, inputs)
    }

    fn generate_proof(
        &self,
        proving_key: &Path,
        program: &Path,
        witness: &Path,
        scheme: &str,
        output_dir: &Path,
    ) -> shieldkit_prover::Result<ProofResult> {
        self.inner
            .generate_proof(proving_key, program, witness, scheme, output_dir)
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub struct Harness {
    pub context: ShieldContext,
    pub ledger: Arc<MemoryLedger>,
    pub prover: Arc<RecordingProver>,
    pub workspaces: TempDir,
}

impl Harness {
    pub fn new(mode: HashMode) -> Self {
        Self::with_config(mode, |_| {})
    }

    pub fn with_config(mode: HashMode, tweak: impl FnOnce(&mut ShieldConfig)) -> Self {
        let workspaces = tempfile::tempdir().unwrap();
        let mut config = ShieldConfig::default();
        config.hash.mode = mode;
        config.prover.output_directory = Some(workspaces.path().to_string_lossy().into_owned());
        tweak(&mut config);

        let prover = Arc::new(RecordingProver::default());
        let (context, ledger) = ShieldContext::in_memory(config, prover.clone()).unwrap();
        Self {
            context,
            ledger,
            prover,
            workspaces,
        }
    }

    pub fn with_backend(backend: Arc<dyn ProofBackend>) -> (ShieldContext, Arc<MemoryLedger>, TempDir) {
        let workspaces = tempfile::tempdir().unwrap();
        let mut config = ShieldConfig::default();
        config.prover.output_directory = Some(workspaces.path().to_string_lossy().into_owned());
        let (context, ledger) = ShieldContext::in_memory(config, backend).unwrap();
        (context, ledger, workspaces)
    }

    pub async fn mint(&self, value: u128, owner: ZkpPublicKey) -> OperationOutcome {
        self.context.mint(&note(value, owner)).await.unwrap()
    }

    /// Proof workspaces left behind
    pub fn leftover_workspaces(&self) -> usize {
        std::fs::read_dir(self.workspaces.path()).unwrap().count()
    }
}

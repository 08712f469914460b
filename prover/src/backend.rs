//! Prover trait
//!
//! Proving is a two-step external process:
//!
//! ```text
//!   inputs (decimal) ──► compute_witness ──► witness ──► generate_proof ──► proof.json
//!                           (program)                   (program, proving key, scheme)
//! ```
//!
//! Both steps block; async callers run them on a blocking thread.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shieldkit_config::{ProgramConfig, ProverBackendToml, ProverConfig};

use crate::error::Result;
use crate::mock::MockProver;
use crate::proof::ProofResult;
use crate::workspace::ProofWorkspace;
use crate::zokrates::ZokratesCli;

/// Witness file name inside a workspace
pub const WITNESS_NAME: &str = "witness";

pub trait ProofBackend: Send + Sync {
    /// Evaluate the program on `inputs` and write the witness to
    /// `output_dir/witness_name`. Returns the witness path.
    fn compute_witness(
        &self,
        program: &Path,
        output_dir: &Path,
        witness_name: &str,
        inputs: &[String],
    ) -> Result<PathBuf>;

    /// Prove the witness and return the flattened proof
    fn generate_proof(
        &self,
        proving_key: &Path,
        program: &Path,
        witness: &Path,
        scheme: &str,
        output_dir: &Path,
    ) -> Result<ProofResult>;

    fn name(&self) -> &'static str;
}

/// Everything needed to prove one operation
#[derive(Debug, Clone)]
pub struct ProofJob {
    pub program: PathBuf,
    pub proving_key: PathBuf,
    pub scheme: String,
    /// Ordered prover inputs as decimal strings
    pub inputs: Vec<String>,
}

impl ProofJob {
    pub fn new(program: &ProgramConfig, scheme: &str, inputs: Vec<String>) -> Self {
        Self {
            program: PathBuf::from(&program.program),
            proving_key: PathBuf::from(&program.proving_key),
            scheme: scheme.to_string(),
            inputs,
        }
    }

    /// Run both prover steps inside `workspace`
    pub fn run(&self, backend: &dyn ProofBackend, workspace: &ProofWorkspace) -> Result<ProofResult> {
        log::debug!(
            "Computing witness for {} with {} inputs ({})",
            self.program.display(),
            self.inputs.len(),
            backend.name()
        );
        let witness =
            backend.compute_witness(&self.program, workspace.path(), WITNESS_NAME, &self.inputs)?;

        log::debug!("Generating {} proof", self.scheme);
        let result = backend.generate_proof(
            &self.proving_key,
            &self.program,
            &witness,
            &self.scheme,
            workspace.path(),
        )?;
        log::debug!("Proof has {} components", result.len());
        Ok(result)
    }
}

/// Build the backend selected in the config
pub fn backend_from_config(config: &ProverConfig) -> Arc<dyn ProofBackend> {
    match config.backend {
        ProverBackendToml::Zokrates => Arc::new(ZokratesCli::new(&config.zokrates_path)),
        ProverBackendToml::Mock => Arc::new(MockProver::new()),
    }
}

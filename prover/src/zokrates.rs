//! ZoKrates command line backend

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::backend::ProofBackend;
use crate::error::{ProverError, Result};
use crate::proof::{PROOF_FILE_NAME, ProofResult};

/// Shells out to a `zokrates` binary
#[derive(Debug, Clone)]
pub struct ZokratesCli {
    binary: PathBuf,
}

impl ZokratesCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn run(&self, mut command: Command, step: &str) -> Result<()> {
        log::debug!("Running {command:?}");
        let output = command.output()?;
        if !output.status.success() {
            return Err(ProverError::CommandFailed {
                command: format!("{} {step}", self.binary.display()),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl ProofBackend for ZokratesCli {
    fn compute_witness(
        &self,
        program: &Path,
        output_dir: &Path,
        witness_name: &str,
        inputs: &[String],
    ) -> Result<PathBuf> {
        let witness = output_dir.join(witness_name);
        let mut command = Command::new(&self.binary);
        command
            .arg("compute-witness")
            .arg("-i")
            .arg(program)
            .arg("-o")
            .arg(&witness)
            .arg("-a")
            .args(inputs);
        self.run(command, "compute-witness")?;
        Ok(witness)
    }

    fn generate_proof(
        &self,
        proving_key: &Path,
        program: &Path,
        witness: &Path,
        scheme: &str,
        output_dir: &Path,
    ) -> Result<ProofResult> {
        let proof_path = output_dir.join(PROOF_FILE_NAME);
        let mut command = Command::new(&self.binary);
        command
            .arg("generate-proof")
            .arg("-i")
            .arg(program)
            .arg("-w")
            .arg(witness)
            .arg("-p")
            .arg(proving_key)
            .arg("--proving-scheme")
            .arg(scheme)
            .arg("-j")
            .arg(&proof_path);
        self.run(command, "generate-proof")?;

        let contents = std::fs::read_to_string(&proof_path)?;
        ProofResult::from_json(&contents)
    }

    fn name(&self) -> &'static str {
        "zokrates"
    }
}

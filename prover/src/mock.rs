//! Deterministic stand-in for the external prover
//!
//! The witness file holds the inputs one per line. The "proof" is derived
//! from SHA-256 of the program path and the witness, so identical inputs
//! give identical proofs.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use sha2::{Digest, Sha256};

use crate::backend::ProofBackend;
use crate::error::{ProverError, Result};
use crate::proof::{PROOF_FILE_NAME, ProofResult};

/// Number of 32-byte limbs in a mock proof (a: 2, b: 4, c: 2)
const PROOF_LIMBS: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct MockProver {
    fail_proving: bool,
}

impl MockProver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A prover whose proof step always fails, after the witness is written
    pub fn failing() -> Self {
        Self { fail_proving: true }
    }
}

fn limb(seed: &[u8], i: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update([i as u8]);
    format!("0x{}", hex::encode(hasher.finalize()))
}

impl ProofBackend for MockProver {
    fn compute_witness(
        &self,
        _program: &Path,
        output_dir: &Path,
        witness_name: &str,
        inputs: &[String],
    ) -> Result<PathBuf> {
        let witness = output_dir.join(witness_name);
        fs::write(&witness, inputs.join("\n"))?;
        Ok(witness)
    }

    fn generate_proof(
        &self,
        _proving_key: &Path,
        program: &Path,
        witness: &Path,
        _scheme: &str,
        output_dir: &Path,
    ) -> Result<ProofResult> {
        if self.fail_proving {
            return Err(ProverError::CommandFailed {
                command: "mock generate-proof".into(),
                status: "exit status: 1".into(),
                stderr: "proving disabled".into(),
            });
        }

        let witness_bytes = fs::read(witness)?;
        let mut hasher = Sha256::new();
        hasher.update(program.to_string_lossy().as_bytes());
        hasher.update(&witness_bytes);
        let seed = hasher.finalize();

        let limbs: Vec<String> = (0..PROOF_LIMBS).map(|i| limb(&seed, i)).collect();
        let inputs: Vec<&str> = std::str::from_utf8(&witness_bytes)
            .map_err(|e| ProverError::InvalidProof(format!("witness is not utf-8: {e}")))?
            .lines()
            .collect();
        let file = json!({
            "proof": {
                "a": [limbs[0], limbs[1]],
                "b": [[limbs[2], limbs[3]], [limbs[4], limbs[5]]],
                "c": [limbs[6], limbs[7]],
            },
            "inputs": inputs,
        });

        let contents = serde_json::to_string_pretty(&file)?;
        fs::write(output_dir.join(PROOF_FILE_NAME), &contents)?;
        ProofResult::from_json(&contents)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

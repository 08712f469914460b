//! Proof artifacts
//!
//! A proof file looks like
//!
//! ```text
//! { "proof": { "a": ["0x..", "0x.."], "b": [["0x..", "0x.."], ...], "c": [...] },
//!   "inputs": ["0x..", ...] }
//! ```
//!
//! The verifier contract wants the `proof` components flattened depth-first,
//! in key order, as decimal strings.

use serde::Serialize;
use serde_json::Value;
use shieldkit_field::{decimal_to_biguint, hex_to_decimal};

use crate::error::{ProverError, Result};

/// File name the proof is written to inside a workspace
pub const PROOF_FILE_NAME: &str = "proof.json";

/// A generated proof, flattened for on-chain verification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProofResult {
    /// Flattened components as decimal strings
    pub proof: Vec<String>,
    /// The proof file as written by the prover
    pub raw: Value,
}

impl ProofResult {
    /// Parse a proof file's contents
    pub fn from_json(contents: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(contents)?;
        let components = raw
            .get("proof")
            .ok_or_else(|| ProverError::InvalidProof("missing \"proof\" object".into()))?;

        let mut proof = Vec::new();
        flatten_into(components, &mut proof)?;
        if proof.is_empty() {
            return Err(ProverError::InvalidProof("proof has no components".into()));
        }
        Ok(Self { proof, raw })
    }

    pub fn len(&self) -> usize {
        self.proof.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proof.is_empty()
    }
}

fn flatten_into(value: &Value, out: &mut Vec<String>) -> Result<()> {
    match value {
        Value::Object(map) => map.values().try_for_each(|v| flatten_into(v, out)),
        Value::Array(items) => items.iter().try_for_each(|v| flatten_into(v, out)),
        Value::String(s) => {
            out.push(to_decimal(s)?);
            Ok(())
        }
        Value::Number(n) => {
            out.push(n.to_string());
            Ok(())
        }
        other => Err(ProverError::InvalidProof(format!(
            "unexpected proof component {other}"
        ))),
    }
}

fn to_decimal(component: &str) -> Result<String> {
    if component.starts_with("0x") || component.starts_with("0X") {
        Ok(hex_to_decimal(component)?)
    } else {
        Ok(decimal_to_biguint(component)?.to_string())
    }
}

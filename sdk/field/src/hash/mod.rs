//! Circuit-compatible hash functions
//!
//! Two interchangeable constructions exist, and a deployment commits to
//! exactly one of them for its Merkle tree. [`Hasher`] binds a mode once;
//! it has no setter.

pub mod mimc;
pub mod sha;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::element::Element;
use crate::error::FieldError;
use crate::field::FieldElement;

pub use mimc::{MIMC_ROUNDS, MiMC, mimc_hash};
pub use sha::{SHA_OUTPUT_BYTES, sha_hash};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashMode {
    /// Truncated SHA-256
    #[default]
    Sha,
    /// MiMC-p/p, x^7, 91 rounds
    Mimc,
}

impl FromStr for HashMode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha" | "sha256" => Ok(Self::Sha),
            "mimc" => Ok(Self::Mimc),
            other => Err(FieldError::UnknownHashMode(other.to_string())),
        }
    }
}

impl fmt::Display for HashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha => f.write_str("sha"),
            Self::Mimc => f.write_str("mimc"),
        }
    }
}

/// A hash function fixed to one mode for its whole lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hasher {
    mode: HashMode,
}

impl Hasher {
    pub fn new(mode: HashMode) -> Self {
        Self { mode }
    }

    pub fn sha() -> Self {
        Self::new(HashMode::Sha)
    }

    pub fn mimc() -> Self {
        Self::new(HashMode::Mimc)
    }

    pub fn mode(&self) -> HashMode {
        self.mode
    }

    pub fn hash(&self, inputs: &[Element]) -> FieldElement {
        match self.mode {
            HashMode::Sha => sha_hash(inputs),
            HashMode::Mimc => mimc_hash(inputs),
        }
    }

    /// Merkle node hash of two children
    pub fn hash_pair(&self, left: &FieldElement, right: &FieldElement) -> FieldElement {
        self.hash(&[left.into(), right.into()])
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(HashMode::default())
    }
}

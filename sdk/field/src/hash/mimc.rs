//! MiMC hash
//!
//! MiMC-p/p in Miyaguchi-Preneel mode with an x^7 S-box and 91 rounds over
//! the BN254 scalar field. Round constants are the keccak256 chain seeded
//! with `keccak256("mimc")`, matching the on-chain MiMC contract and the
//! ZoKrates standard library.

use ark_bn254::Fr;
use ark_ff::{Field, PrimeField};
use sha3::{Digest, Keccak256};
use std::sync::LazyLock;

use crate::element::Element;
use crate::field::FieldElement;

/// Number of MiMC rounds
pub const MIMC_ROUNDS: usize = 91;

const MIMC_SEED: &[u8] = b"mimc";

static DEFAULT_MIMC: LazyLock<MiMC> = LazyLock::new(MiMC::new);

/// MiMC hasher with precomputed round constants
#[derive(Debug, Clone)]
pub struct MiMC {
    round_constants: Vec<Fr>,
}

impl Default for MiMC {
    fn default() -> Self {
        Self::new()
    }
}

impl MiMC {
    pub fn new() -> Self {
        let mut c: [u8; 32] = Keccak256::digest(MIMC_SEED).into();
        let round_constants = (0..MIMC_ROUNDS)
            .map(|_| {
                c = Keccak256::digest(c).into();
                Fr::from_be_bytes_mod_order(&c)
            })
            .collect();

        Self { round_constants }
    }

    /// Shared instance; the constants never change
    pub fn shared() -> &'static MiMC {
        &DEFAULT_MIMC
    }

    pub fn round_constant(&self, round: usize) -> Option<FieldElement> {
        self.round_constants
            .get(round)
            .copied()
            .map(FieldElement::from_fr)
    }

    /// (x + k + c)^7
    fn round(&self, x: Fr, k: Fr, c: Fr) -> Fr {
        let t = x + k + c;
        let t2 = t.square();
        let t4 = t2.square();
        t4 * t2 * t
    }

    /// Block cipher E_k(x) followed by the final key addition
    fn permute(&self, x: Fr, k: Fr) -> Fr {
        let mut state = x;
        for c in &self.round_constants {
            state = self.round(state, k, *c);
        }
        state + k
    }

    /// Miyaguchi-Preneel chaining: r = r + x_i + E_r(x_i), starting from r = 0
    pub fn hash_fields(&self, inputs: &[Fr]) -> Fr {
        inputs
            .iter()
            .fold(Fr::from(0u64), |r, x| r + x + self.permute(*x, r))
    }

    pub fn hash(&self, inputs: &[Element]) -> FieldElement {
        let fields: Vec<Fr> = inputs
            .iter()
            .map(|e| Fr::from_be_bytes_mod_order(&e.to_be_bytes()))
            .collect();
        FieldElement::from_fr(self.hash_fields(&fields))
    }
}

pub fn mimc_hash(inputs: &[Element]) -> FieldElement {
    MiMC::shared().hash(inputs)
}

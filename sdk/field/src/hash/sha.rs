//! SHA-256 over concatenated fixed-width inputs
//!
//! The digest is cut to its low 248 bits (the first byte is dropped) so the
//! result always fits in the field and matches the shield contract, which
//! does the same truncation on-chain.

use sha2::{Digest, Sha256};

use crate::element::Element;
use crate::field::FieldElement;

/// Bytes of digest kept after truncation
pub const SHA_OUTPUT_BYTES: usize = 31;

pub fn sha_hash(inputs: &[Element]) -> FieldElement {
    let mut hasher = Sha256::new();
    for input in inputs {
        hasher.update(input.to_be_bytes());
    }
    let digest = hasher.finalize();

    let mut out = [0u8; 32];
    out[1..].copy_from_slice(&digest[32 - SHA_OUTPUT_BYTES..]);
    // 248 bits is always below the modulus
    FieldElement::from_biguint_reduced(&num_bigint::BigUint::from_bytes_be(&out))
}

//! Shieldkit field layer
//!
//! BN254 scalar field arithmetic, fixed-width encodings and the two hash
//! constructions shared by the shield contract and its circuits.
//!
//! ```text
//!   hex / decimal ──► Element (value, bits) ──► sha_hash / mimc_hash ──► FieldElement
//!                            │
//!                            └──► format_inputs ──► prover (decimal strings)
//! ```

pub mod element;
pub mod encoding;
pub mod error;
pub mod field;
pub mod hash;
pub mod number_theory;
pub mod random;

pub use element::{Element, format_inputs};
pub use encoding::{
    decimal_to_biguint, decimal_to_hex, ensure_0x, hex_to_biguint, hex_to_bytes, hex_to_decimal,
    left_pad_hex, pad_hex, strip_0x,
};
pub use error::{FieldError, Result};
pub use field::{FIELD_BYTES, FieldElement};
pub use hash::{HashMode, Hasher, MiMC, mimc_hash, sha_hash};
pub use number_theory::{is_quadratic_residue, square_root_mod_prime};
pub use random::{random_below, random_field_element, random_hex};

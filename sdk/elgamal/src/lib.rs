//! Shieldkit ElGamal engine
//!
//! BabyJubJub point arithmetic, point compression and ElGamal encryption
//! used to give compliance authorities a view of shielded amounts and keys.
//!
//! ```text
//!  amount / key ──► m·G ──► encrypt(authority PKs) ──► [S, C_1 … C_n]
//!                                                        │
//!  authority SKs ──────────────────► decrypt ◄───────────┘
//!                                      │
//!                                      ▼
//!                        brute_force(m·G, candidates) ──► m
//! ```

pub mod authority;
pub mod brute_force;
pub mod curve;
pub mod elgamal;
pub mod error;

pub use authority::{AuthorityKeys, AuthorityRegistry};
pub use brute_force::{RangeGenerator, brute_force, brute_force_range, range_generator};
pub use curve::{
    CompressedPoint, CurvePoint, edwards_compress, edwards_decompress, point_add, scalar_mult,
    scalar_mult_biguint,
};
pub use elgamal::{Ciphertext, decrypt, encrypt, encrypt_to, encrypt_with_randomness};
pub use error::{CurveError, Result};

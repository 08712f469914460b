//! Error definitions for field, encoding and hashing operations.
use thiserror::Error;

/// Errors raised by the field layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Malformed hex or decimal input
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Value is not below the field modulus
    #[error("Value {0} is not a field element")]
    NotInField(String),

    /// Value does not fit into the requested width
    #[error("Value needs {needed} bits but only {available} are available")]
    TooWide { needed: u64, available: u64 },

    /// Requested bit width is unusable
    #[error("Invalid bit width {0} (must be a positive multiple of 8)")]
    InvalidWidth(usize),

    /// Square root requested for a quadratic non-residue
    #[error("{0} is not a quadratic residue")]
    NonResidue(String),

    /// Modulus too small for modular arithmetic
    #[error("Invalid modulus {0} (must be a prime of at least 2)")]
    InvalidModulus(String),

    /// Rejection sampling kept drawing values above the bound
    #[error("Rejection sampling gave up after {0} draws")]
    SamplingExhausted(usize),

    /// Unknown hash mode name
    #[error("Unknown hash mode '{0}' (expected 'sha' or 'mimc')")]
    UnknownHashMode(String),
}

/// Result type for field operations
pub type Result<T> = std::result::Result<T, FieldError>;

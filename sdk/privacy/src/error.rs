use shieldkit_field::FieldError;
use thiserror::Error;

/// Errors raised while deriving notes or querying the commitment tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrivacyError {
    /// Malformed or out-of-range input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Input and output values differ
    #[error("Value mismatch: inputs sum to {inputs}, outputs sum to {outputs}")]
    ValueMismatch { inputs: u128, outputs: u128 },

    /// A value sum exceeded its permitted bound
    #[error("Value overflow: {0}")]
    Overflow(String),

    /// The commitment is not stored at the claimed leaf index
    #[error("Commitment {commitment} not found at leaf index {index}")]
    LeafNotFound { commitment: String, index: u64 },

    /// Two sibling paths of one operation were read against different roots
    #[error("Sibling paths disagree on the root: {first} vs {second}")]
    InconsistentRoot { first: String, second: String },

    #[error(transparent)]
    Field(#[from] FieldError),
}

pub type Result<T> = std::result::Result<T, PrivacyError>;

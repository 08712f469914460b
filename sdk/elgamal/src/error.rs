use shieldkit_field::FieldError;
use thiserror::Error;

/// Errors raised by curve and ElGamal operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    /// Coordinates do not satisfy the curve equation
    #[error("Point ({x}, {y}) is not on the curve")]
    NotOnCurve { x: String, y: String },

    /// Compressed encoding does not correspond to a curve point
    #[error("Cannot decompress point: {0}")]
    Decompression(String),

    /// Brute force exhausted its candidates
    #[error("No candidate matched the decrypted point")]
    NotFound,

    /// Caller supplied inconsistent input
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Field(#[from] FieldError),
}

pub type Result<T> = std::result::Result<T, CurveError>;

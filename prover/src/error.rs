use shieldkit_field::FieldError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProverError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The prover binary exited unsuccessfully
    #[error("{command} failed with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The proof file exists but does not have the expected shape
    #[error("Invalid proof: {0}")]
    InvalidProof(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Field(#[from] FieldError),
}

pub type Result<T> = std::result::Result<T, ProverError>;

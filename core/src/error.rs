use shieldkit_elgamal::CurveError;
use shieldkit_field::FieldError;
use shieldkit_privacy::PrivacyError;
use shieldkit_prover::ProverError;
use thiserror::Error;

/// Errors surfaced by shield operations
#[derive(Error, Debug)]
pub enum ShieldError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Privacy(#[from] PrivacyError),

    #[error("Prover failed: {0}")]
    Prover(#[from] ProverError),

    #[error("Proving task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Ledger rejected submission: {0}")]
    Ledger(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Closed classification of [`ShieldError`], for callers that branch on
/// the failure type rather than the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    ValueMismatch,
    Overflow,
    LeafNotFound,
    InconsistentRoot,
    Decompression,
    NotFound,
    Prover,
    Ledger,
    Config,
}

fn field_kind(err: &FieldError) -> ErrorKind {
    match err {
        FieldError::NonResidue(_) => ErrorKind::Decompression,
        FieldError::UnknownHashMode(_) => ErrorKind::Config,
        FieldError::InvalidEncoding(_)
        | FieldError::NotInField(_)
        | FieldError::TooWide { .. }
        | FieldError::InvalidWidth(_) => ErrorKind::Validation,
    }
}

impl ShieldError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Field(e) => field_kind(e),
            Self::Curve(e) => match e {
                CurveError::NotOnCurve { .. } | CurveError::Validation(_) => ErrorKind::Validation,
                CurveError::Decompression(_) => ErrorKind::Decompression,
                CurveError::NotFound => ErrorKind::NotFound,
                CurveError::Field(e) => field_kind(e),
            },
            Self::Privacy(e) => match e {
                PrivacyError::Validation(_) => ErrorKind::Validation,
                PrivacyError::ValueMismatch { .. } => ErrorKind::ValueMismatch,
                PrivacyError::Overflow(_) => ErrorKind::Overflow,
                PrivacyError::LeafNotFound { .. } => ErrorKind::LeafNotFound,
                PrivacyError::InconsistentRoot { .. } => ErrorKind::InconsistentRoot,
                PrivacyError::Field(e) => field_kind(e),
            },
            Self::Prover(_) | Self::Task(_) => ErrorKind::Prover,
            Self::Ledger(_) => ErrorKind::Ledger,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShieldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let err: ShieldError = PrivacyError::ValueMismatch {
            inputs: 50,
            outputs: 51,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::ValueMismatch);

        let err: ShieldError = CurveError::Field(FieldError::NonResidue("2".into())).into();
        assert_eq!(err.kind(), ErrorKind::Decompression);

        let err: ShieldError = PrivacyError::Field(FieldError::TooWide {
            needed: 130,
            available: 128,
        })
        .into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err: ShieldError = ProverError::InvalidProof("empty".into()).into();
        assert_eq!(err.kind(), ErrorKind::Prover);
        assert_eq!(ShieldError::Ledger("spent".into()).kind(), ErrorKind::Ledger);
    }
}

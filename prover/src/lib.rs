//! Shieldkit prover integration
//!
//! Runs the external proving system for each protocol operation and turns
//! its output into the flat decimal proof the verifier contract expects.

pub mod backend;
pub mod error;
pub mod mock;
pub mod proof;
pub mod workspace;
pub mod zokrates;

pub use backend::{ProofBackend, ProofJob, WITNESS_NAME, backend_from_config};
pub use error::{ProverError, Result};
pub use mock::MockProver;
pub use proof::{PROOF_FILE_NAME, ProofResult};
pub use workspace::ProofWorkspace;
pub use zokrates::ZokratesCli;

//! Shieldkit core
//!
//! Orchestrates shielded ERC-20 operations on top of the field, curve and
//! note primitives.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ShieldContext                         │
//! │                                                              │
//! │  mint / transfer / batch_transfer / consolidation / burn     │
//! │       │              │                    │                  │
//! │       ▼              ▼                    ▼                  │
//! │  SharedMerkleTree  ProofBackend       Ledger                 │
//! │  (sibling paths)   (witness, proof)   (nullifiers, leaves)   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod compliance;
pub mod context;
pub mod error;
pub mod inputs;
pub mod ledger;
pub mod operations;

pub use compliance::{
    ComplianceField, ComplianceRecord, DecryptedField, Guessers, decrypt_compliance,
};
pub use context::{CorrectnessCheck, ShieldContext};
pub use error::{ErrorKind, Result, ShieldError};
pub use ledger::{Ledger, LedgerEvent, MemoryLedger, Operation, Receipt, Submission};
pub use operations::{
    BatchTransferRequest, BurnRequest, ConsolidationRequest, CreatedNote, OperationOutcome,
    TransferRequest,
};
pub use shieldkit_config::BATCH_SIZE;

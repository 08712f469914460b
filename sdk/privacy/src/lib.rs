//! Shieldkit privacy SDK
//!
//! Note-based privacy primitives for shielded ERC-20 transfers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Shielded Transfer                          │
//! │  ┌──────────────┐  ┌──────────────┐  ┌───────────────────────┐  │
//! │  │  Nullifiers  │  │ Commitments  │  │   Sibling paths       │  │
//! │  │  H(salt|sk)  │  │ H(a|v|pk|s)  │  │   [root, s1 … sD]     │  │
//! │  └──────────────┘  └──────────────┘  └───────────────────────┘  │
//! │         │                 │                     │               │
//! │         ▼                 ▼                     ▼               │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │              ZK Proof (external prover)                 │    │
//! │  │  • Valid nullifier derivation                           │    │
//! │  │  • Input commitments are leaves of the tree             │    │
//! │  │  • Balance preservation: Σ inputs = Σ outputs           │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod commitment;
pub mod error;
pub mod keys;
pub mod merkle;
pub mod note;
pub mod nullifier;
pub mod shared;

pub use commitment::Commitment;
pub use error::{PrivacyError, Result};
pub use keys::{ASSET_BITS, AssetAddress, PayToAddress, Salt, ZkpPrivateKey, ZkpPublicKey};
pub use merkle::{
    MAX_TREE_DEPTH, MerkleTree, RootHistory, SiblingPath, TREE_DEPTH, assert_shared_root,
    verify_path,
};
pub use note::{
    Note, NoteValue, OutputNote, SpendableNote, TRANSFER_SUM_LIMIT, VALUE_BITS,
    check_conservation, check_two_by_two,
};
pub use nullifier::Nullifier;
pub use shared::SharedMerkleTree;

//! Note commitments
//!
//! ```text
//! Commitment = H(asset_256 | value_128 | owner_pk_256 | salt_256)
//! ```
//!
//! The hash is the truncated SHA-256 construction the shield contract
//! recomputes on mint and burn, independent of the Merkle tree's mode.

use serde::{Deserialize, Serialize};
use shieldkit_field::{Element, FieldElement, sha_hash};
use std::fmt;

use crate::error::Result;
use crate::keys::{AssetAddress, Salt, ZkpPublicKey};
use crate::note::NoteValue;

/// A commitment to a note (one Merkle leaf)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Commitment(pub FieldElement);

impl Commitment {
    pub fn derive(
        asset: &AssetAddress,
        value: NoteValue,
        owner: &ZkpPublicKey,
        salt: &Salt,
    ) -> Self {
        Self(sha_hash(&[
            asset.to_element(),
            value.to_element(),
            owner.to_element(),
            salt.to_element(),
        ]))
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        Ok(Self(FieldElement::from_hex(hex)?))
    }

    pub fn as_field(&self) -> &FieldElement {
        &self.0
    }

    pub fn to_element(&self) -> Element {
        Element::from(self.0)
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// Short form for log lines
    pub fn short(&self) -> String {
        let hex = self.to_hex();
        format!("{}…", &hex[..12])
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

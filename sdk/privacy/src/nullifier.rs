//! Nullifiers
//!
//! ```text
//! Nullifier = H(salt_256 | private_key_256)
//! ```
//!
//! Only the holder of both the salt and the spending key can produce it,
//! and nothing links it to the public commitment. Once revealed, the
//! commitment it belongs to cannot be spent again.

use serde::{Deserialize, Serialize};
use shieldkit_field::{Element, FieldElement, sha_hash};
use std::fmt;

use crate::error::Result;
use crate::keys::{Salt, ZkpPrivateKey};

/// Unique tag revealed when a commitment is spent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Nullifier(pub FieldElement);

impl Nullifier {
    pub fn derive(salt: &Salt, private_key: &ZkpPrivateKey) -> Self {
        Self(sha_hash(&[salt.to_element(), private_key.to_element()]))
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
}

impl fmt::Display for Nullifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

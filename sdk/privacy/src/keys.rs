//! Key, salt and asset types
//!
//! ```text
//! ZkpPrivateKey (32 random bytes)
//!        │  sha_hash
//!        ▼
//! ZkpPublicKey  (field element, the note owner)
//! ```

use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use shieldkit_field::{Element, FieldElement, hex_to_bytes, sha_hash};
use std::fmt;

use crate::error::{PrivacyError, Result};

/// Width of the asset address inside the circuit
pub const ASSET_BITS: usize = 248;

fn bytes32(hex: &str) -> Result<[u8; 32]> {
    let bytes = hex_to_bytes(hex, 32)?;
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Secret key of a note owner
///
/// This is the spending key: it derives both the owner's public key and
/// every nullifier the owner reveals.
#[derive(Clone, PartialEq, Eq)]
pub struct ZkpPrivateKey([u8; 32]);

impl ZkpPrivateKey {
    pub fn random() -> Self {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        Self(key)
    }

    pub fn from_bytes(key: [u8; 32]) -> Self {
        Self(key)
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        Ok(Self(bytes32(hex)?))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_element(&self) -> Element {
        Element::from_bytes(&self.0)
    }

    /// pk = H(sk)
    pub fn public_key(&self) -> ZkpPublicKey {
        ZkpPublicKey(sha_hash(&[self.to_element()]))
    }
}

impl fmt::Debug for ZkpPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ZkpPrivateKey(..)")
    }
}

/// Public key of a note owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZkpPublicKey(pub FieldElement);

impl ZkpPublicKey {
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

impl fmt::Display for ZkpPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Blinding value of a commitment
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Salt(#[serde(with = "hex::serde")] [u8; 32]);

impl Salt {
    /// Fresh salt from the OS generator
    pub fn random() -> Self {
        let mut salt = [0u8; 32];
        OsRng.fill_bytes(&mut salt);
        Self(salt)
    }

    pub fn from_bytes(salt: [u8; 32]) -> Self {
        Self(salt)
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        Ok(Self(bytes32(hex)?))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_element(&self) -> Element {
        Element::from_bytes(&self.0)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({})", self.to_hex())
    }
}

/// Token contract address, left-padded to 32 bytes
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetAddress(#[serde(with = "hex::serde")] [u8; 32]);

impl AssetAddress {
    /// Accepts a 20-byte address or an already padded 32-byte word
    pub fn from_hex(hex: &str) -> Result<Self> {
        let padded = bytes32(hex)?;
        if padded[0] != 0 {
            return Err(PrivacyError::Validation(format!(
                "asset address {hex} does not fit in {ASSET_BITS} bits"
            )));
        }
        Ok(Self(padded))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// 256-bit form used inside commitments
    pub fn to_element(&self) -> Element {
        Element::from_bytes(&self.0)
    }

    /// 248-bit form passed to the prover
    pub fn to_circuit_element(&self) -> Element {
        Element::from_bytes(&self.0[32 - ASSET_BITS / 8..])
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

/// Account that receives burned tokens, padded the same way
pub type PayToAddress = AssetAddress;

impl fmt::Debug for AssetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetAddress({})", self.to_hex())
    }
}

//! Shielded notes and value conservation
//!
//! ```text
//! Note = {
//!     asset: AssetAddress,   // token contract
//!     value: u128,           // amount, at most 128 bits
//!     owner: ZkpPublicKey,   // who can spend it
//!     salt:  Salt,           // blinding factor
//! }
//! ```

use serde::{Deserialize, Serialize};
use shieldkit_field::{Element, hex_to_biguint};

use crate::commitment::Commitment;
use crate::error::{PrivacyError, Result};
use crate::keys::{AssetAddress, Salt, ZkpPrivateKey, ZkpPublicKey};
use crate::nullifier::Nullifier;

/// Bit width of a note value inside commitments and the circuit
pub const VALUE_BITS: usize = 128;

/// Bound on each side of a two-input/two-output transfer
pub const TRANSFER_SUM_LIMIT: u128 = 0xffff_ffff;

/// Note value with overflow protection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct NoteValue(pub u128);

impl NoteValue {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(u128::MAX);

    pub fn new(value: u128) -> Self {
        Self(value)
    }

    pub fn as_u128(&self) -> u128 {
        self.0
    }

    /// Parse a hex amount of at most 16 bytes
    pub fn from_hex(hex: &str) -> Result<Self> {
        let value = hex_to_biguint(hex)?;
        let digits = value.to_u64_digits();
        if digits.len() > 2 {
            return Err(PrivacyError::Validation(format!(
                "value {hex} exceeds {VALUE_BITS} bits"
            )));
        }
        let lo = digits.first().copied().unwrap_or(0) as u128;
        let hi = digits.get(1).copied().unwrap_or(0) as u128;
        Ok(Self((hi << 64) | lo))
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn to_element(&self) -> Element {
        Element::from_bytes(&self.0.to_be_bytes())
    }

    pub fn to_hex(&self) -> String {
        format!("0x{:032x}", self.0)
    }
}

impl From<u128> for NoteValue {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

/// Preimage of a commitment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub asset: AssetAddress,
    pub value: NoteValue,
    pub owner: ZkpPublicKey,
    pub salt: Salt,
}

impl Note {
    pub fn new(asset: AssetAddress, value: NoteValue, owner: ZkpPublicKey, salt: Salt) -> Self {
        Self {
            asset,
            value,
            owner,
            salt,
        }
    }

    /// Note with a fresh random salt
    pub fn random(asset: AssetAddress, value: NoteValue, owner: ZkpPublicKey) -> Self {
        Self::new(asset, value, owner, Salt::random())
    }

    pub fn commitment(&self) -> Commitment {
        Commitment::derive(&self.asset, self.value, &self.owner, &self.salt)
    }

    /// Nullifier revealed when the owner spends this note
    pub fn nullifier(&self, owner_key: &ZkpPrivateKey) -> Nullifier {
        Nullifier::derive(&self.salt, owner_key)
    }
}

/// A commitment the caller owns and wants to spend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendableNote {
    pub value: NoteValue,
    pub salt: Salt,
    pub commitment: Commitment,
    /// Leaf index in the commitment tree
    pub index: u64,
}

impl SpendableNote {
    pub fn new(value: NoteValue, salt: Salt, commitment: Commitment, index: u64) -> Self {
        Self {
            value,
            salt,
            commitment,
            index,
        }
    }

    pub fn nullifier(&self, owner_key: &ZkpPrivateKey) -> Nullifier {
        Nullifier::derive(&self.salt, owner_key)
    }
}

/// Output of a transfer before its commitment is known
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputNote {
    pub value: NoteValue,
    pub salt: Salt,
}

impl OutputNote {
    pub fn new(value: NoteValue, salt: Salt) -> Self {
        Self { value, salt }
    }

    pub fn random(value: NoteValue) -> Self {
        Self::new(value, Salt::random())
    }
}

fn sum(values: &[NoteValue]) -> Result<u128> {
    values.iter().try_fold(0u128, |acc, v| {
        acc.checked_add(v.0)
            .ok_or_else(|| PrivacyError::Overflow("value sum exceeds 128 bits".into()))
    })
}

/// Exact conservation check for batch and consolidation transfers
pub fn check_conservation(inputs: &[NoteValue], outputs: &[NoteValue]) -> Result<()> {
    let inputs = sum(inputs)?;
    let outputs = sum(outputs)?;
    if inputs != outputs {
        return Err(PrivacyError::ValueMismatch { inputs, outputs });
    }
    Ok(())
}

/// Conservation check for the two-input/two-output transfer circuit, whose
/// adders only handle sums up to [`TRANSFER_SUM_LIMIT`]
pub fn check_two_by_two(inputs: &[NoteValue; 2], outputs: &[NoteValue; 2]) -> Result<()> {
    let input_sum = sum(inputs)?;
    let output_sum = sum(outputs)?;
    if input_sum > TRANSFER_SUM_LIMIT || output_sum > TRANSFER_SUM_LIMIT {
        return Err(PrivacyError::Overflow(format!(
            "transfer sums {input_sum}/{output_sum} exceed {TRANSFER_SUM_LIMIT:#x}"
        )));
    }
    check_conservation(inputs, outputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(v: &[u128]) -> Vec<NoteValue> {
        v.iter().copied().map(NoteValue::new).collect()
    }

    #[test]
    fn test_value_checked_math() {
        let a = NoteValue::new(10);
        assert_eq!(a.checked_add(NoteValue::new(5)), Some(NoteValue::new(15)));
        assert_eq!(a.checked_sub(NoteValue::new(11)), None);
        assert_eq!(NoteValue::MAX.checked_add(NoteValue::new(1)), None);
    }

    #[test]
    fn test_value_hex() {
        let v = NoteValue::from_hex("0x00000000000000000000000000000020").unwrap();
        assert_eq!(v, NoteValue::new(0x20));
        assert_eq!(v.to_hex(), "0x00000000000000000000000000000020");
        assert_eq!(v.to_element().bits(), 128);
        let big = NoteValue::from_hex(&format!("0x{}", "ff".repeat(16))).unwrap();
        assert_eq!(big, NoteValue::MAX);
        assert!(NoteValue::from_hex(&format!("0x01{}", "00".repeat(16))).is_err());
    }

    #[test]
    fn test_two_by_two() {
        let inputs = [NoteValue(0x20), NoteValue(0x30)];
        assert!(check_two_by_two(&inputs, &[NoteValue(0x40), NoteValue(0x10)]).is_ok());

        let err = check_two_by_two(&inputs, &[NoteValue(0x40), NoteValue(0x11)]).unwrap_err();
        assert_eq!(
            err,
            PrivacyError::ValueMismatch {
                inputs: 0x50,
                outputs: 0x51
            }
        );

        let err = check_two_by_two(
            &[NoteValue(0xffff_ffff), NoteValue(1)],
            &[NoteValue(0x1_0000_0000), NoteValue(0)],
        )
        .unwrap_err();
        assert!(matches!(err, PrivacyError::Overflow(_)));
    }

    #[test]
    fn test_conservation() {
        let mut outputs = vec![2u128; 20];
        outputs[0] = 12;
        assert!(check_conservation(&values(&[50]), &values(&outputs)).is_ok());
        outputs[0] = 13;
        assert!(matches!(
            check_conservation(&values(&[50]), &values(&outputs)),
            Err(PrivacyError::ValueMismatch { inputs: 50, outputs: 51 })
        ));
        assert!(matches!(
            check_conservation(&values(&[u128::MAX, 1]), &values(&[1])),
            Err(PrivacyError::Overflow(_))
        ));
    }

    #[test]
    fn test_note_commitment_and_nullifier() {
        let sk = ZkpPrivateKey::random();
        let asset = AssetAddress::from_hex("0x01").unwrap();
        let note = Note::random(asset, NoteValue::new(7), sk.public_key());
        let spendable = SpendableNote::new(note.value, note.salt, note.commitment(), 3);
        assert_eq!(note.nullifier(&sk), spendable.nullifier(&sk));
        assert_eq!(spendable.commitment, note.commitment());
    }
}

//! Width-tagged hash and prover inputs
//!
//! Salts, keys and asset addresses are raw 256-bit values that may exceed
//! the field prime, so hash inputs carry their own declared bit width
//! instead of being forced into the field.

use num_bigint::BigUint;
use num_traits::One;

use crate::encoding::hex_to_biguint;
use crate::error::{FieldError, Result};
use crate::field::{FIELD_BYTES, FieldElement};

/// An unsigned integer with a declared big-endian bit width
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Element {
    value: BigUint,
    bits: usize,
}

impl Element {
    pub fn new(value: BigUint, bits: usize) -> Result<Self> {
        if bits == 0 || bits % 8 != 0 {
            return Err(FieldError::InvalidWidth(bits));
        }
        if value.bits() > bits as u64 {
            return Err(FieldError::TooWide {
                needed: value.bits(),
                available: bits as u64,
            });
        }
        Ok(Self { value, bits })
    }

    pub fn from_hex(hex: &str, bits: usize) -> Result<Self> {
        Self::new(hex_to_biguint(hex)?, bits)
    }

    pub fn from_u128(value: u128, bits: usize) -> Result<Self> {
        Self::new(BigUint::from(value), bits)
    }

    /// Width is taken from the slice length
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            value: BigUint::from_bytes_be(bytes),
            bits: bytes.len() * 8,
        }
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn bits(&self) -> usize {
        self.bits
    }

    pub fn byte_len(&self) -> usize {
        self.bits / 8
    }

    /// Big-endian bytes padded to the declared width
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let raw = self.value.to_bytes_be();
        let mut out = vec![0u8; self.byte_len()];
        if raw != [0] {
            out[self.byte_len() - raw.len()..].copy_from_slice(&raw);
        }
        out
    }

    /// Keep only the low `bits` bits
    pub fn truncated(&self, bits: usize) -> Result<Self> {
        let mask = (BigUint::one() << bits) - BigUint::one();
        Self::new(&self.value & mask, bits)
    }

    /// Split into `count` equal big-endian limbs, most significant first
    pub fn packets(&self, count: usize) -> Result<Vec<Self>> {
        if count == 0 || self.bits % count != 0 || (self.bits / count) % 8 != 0 {
            return Err(FieldError::InvalidWidth(self.bits));
        }
        let limb_bytes = self.byte_len() / count;
        self.to_be_bytes()
            .chunks(limb_bytes)
            .map(|chunk| Self::new(BigUint::from_bytes_be(chunk), limb_bytes * 8))
            .collect()
    }

    pub fn to_decimal(&self) -> String {
        self.value.to_string()
    }
}

impl From<FieldElement> for Element {
    fn from(fe: FieldElement) -> Self {
        Self {
            value: fe.to_biguint(),
            bits: FIELD_BYTES * 8,
        }
    }
}

impl From<&FieldElement> for Element {
    fn from(fe: &FieldElement) -> Self {
        Element::from(*fe)
    }
}

/// Render an ordered prover input vector as decimal strings
pub fn format_inputs(elements: &[Element]) -> Vec<String> {
    elements.iter().map(Element::to_decimal).collect()
}

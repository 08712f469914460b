//! BN254 scalar field elements
//!
//! [`FieldElement`] is the value type every commitment, nullifier, Merkle
//! node and curve coordinate is expressed in. Construction from external
//! data is strict: anything at or above the modulus is rejected rather
//! than silently reduced.

use ark_bn254::Fr;
use ark_ff::{BigInteger, Field, One, PrimeField, Zero};
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::LazyLock;

use crate::encoding::{hex_to_biguint, left_pad_hex};
use crate::error::{FieldError, Result};

static MODULUS: LazyLock<BigUint> =
    LazyLock::new(|| BigUint::from_bytes_be(&Fr::MODULUS.to_bytes_be()));

/// Width of a field element in bytes when serialized
pub const FIELD_BYTES: usize = 32;

/// An element of the BN254 scalar field
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldElement(Fr);

impl FieldElement {
    /// The field prime p
    pub fn modulus() -> &'static BigUint {
        &MODULUS
    }

    pub fn zero() -> Self {
        Self(Fr::zero())
    }

    pub fn one() -> Self {
        Self(Fr::one())
    }

    pub fn from_u64(value: u64) -> Self {
        Self(Fr::from(value))
    }

    pub fn from_u128(value: u128) -> Self {
        Self(Fr::from(value))
    }

    /// Strict conversion: fails if `value >= p`
    pub fn from_biguint(value: &BigUint) -> Result<Self> {
        if value >= Self::modulus() {
            return Err(FieldError::NotInField(value.to_string()));
        }
        Ok(Self::from_biguint_reduced(value))
    }

    /// Reducing conversion, used where the algorithm itself works mod p
    pub fn from_biguint_reduced(value: &BigUint) -> Self {
        Self(Fr::from_be_bytes_mod_order(&value.to_bytes_be()))
    }

    /// Strict conversion from big-endian bytes (at most 32)
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > FIELD_BYTES {
            return Err(FieldError::TooWide {
                needed: bytes.len() as u64 * 8,
                available: FIELD_BYTES as u64 * 8,
            });
        }
        Self::from_biguint(&BigUint::from_bytes_be(bytes))
    }

    /// Strict conversion from a hex string, with or without `0x`
    pub fn from_hex(hex: &str) -> Result<Self> {
        Self::from_biguint(&hex_to_biguint(hex)?)
    }

    /// Strict conversion from a decimal string
    pub fn from_decimal(decimal: &str) -> Result<Self> {
        let value = BigUint::parse_bytes(decimal.trim().as_bytes(), 10)
            .ok_or_else(|| FieldError::InvalidEncoding(format!("not a decimal: {decimal}")))?;
        Self::from_biguint(&value)
    }

    pub(crate) fn from_fr(inner: Fr) -> Self {
        Self(inner)
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0.into_bigint().to_bytes_be())
    }

    pub fn to_be_bytes(&self) -> [u8; FIELD_BYTES] {
        let bytes = self.0.into_bigint().to_bytes_be();
        let mut out = [0u8; FIELD_BYTES];
        out[FIELD_BYTES - bytes.len()..].copy_from_slice(&bytes);
        out
    }

    /// `0x`-prefixed, zero-padded to 64 hex digits
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_be_bytes()))
    }

    pub fn to_decimal(&self) -> String {
        self.to_biguint().to_string()
    }

    /// Hex padded to `byte_len` bytes, for callers that need a narrower width
    pub fn to_hex_width(&self, byte_len: usize) -> Result<String> {
        left_pad_hex(&self.to_biguint(), byte_len)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parity of the canonical representative
    pub fn is_odd(&self) -> bool {
        self.0.into_bigint().is_odd()
    }

    pub fn square(&self) -> Self {
        Self(self.0.square())
    }

    pub fn pow(&self, exponent: u64) -> Self {
        Self(self.0.pow([exponent]))
    }

    /// Multiplicative inverse, `None` for zero
    pub fn inverse(&self) -> Option<Self> {
        self.0.inverse().map(Self)
    }
}

impl Add for FieldElement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for FieldElement {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul for FieldElement {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Neg for FieldElement {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_hex())
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        FieldElement::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: &str =
        "21888242871839275222246405745257275088548364400416034343698204186575808495617";

    #[test]
    fn test_modulus() {
        assert_eq!(FieldElement::modulus().to_string(), P);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let p = BigUint::parse_bytes(P.as_bytes(), 10).unwrap();
        assert!(matches!(
            FieldElement::from_biguint(&p),
            Err(FieldError::NotInField(_))
        ));
        let below = &p - 1u32;
        let fe = FieldElement::from_biguint(&below).unwrap();
        assert_eq!(fe + FieldElement::one(), FieldElement::zero());
    }

    #[test]
    fn test_salt_sized_value_is_not_a_field_element() {
        let salt = format!("0x{}", "aa".repeat(32));
        assert!(FieldElement::from_hex(&salt).is_err());
    }

    #[test]
    fn test_hex_and_decimal() {
        let fe = FieldElement::from_hex("0x20").unwrap();
        assert_eq!(fe, FieldElement::from_u64(32));
        assert_eq!(fe.to_decimal(), "32");
        assert_eq!(fe.to_hex().len(), 66);
        assert_eq!(FieldElement::from_decimal("32").unwrap(), fe);
        assert!(FieldElement::from_decimal("3x2").is_err());
        assert_eq!(fe.to_hex_width(16).unwrap(), format!("0x{}20", "0".repeat(30)));
    }

    #[test]
    fn test_arithmetic() {
        let a = FieldElement::from_u64(7);
        let b = FieldElement::from_u64(5);
        assert_eq!(a - b, FieldElement::from_u64(2));
        assert_eq!(a * b, FieldElement::from_u64(35));
        assert_eq!(a.pow(2), a.square());
        assert_eq!(a * a.inverse().unwrap(), FieldElement::one());
        assert!(FieldElement::zero().inverse().is_none());
        assert_eq!(-FieldElement::one() + FieldElement::one(), FieldElement::zero());
        assert!(a.is_odd());
        assert!(!b.square().is_zero());
    }

    #[test]
    fn test_serde_as_hex() {
        let fe = FieldElement::from_u64(255);
        let json = serde_json::to_string(&fe).unwrap();
        assert_eq!(json, format!("\"0x{}ff\"", "0".repeat(62)));
        let back: FieldElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fe);
    }
}

//! Hex / decimal conversion helpers
//!
//! External collaborators speak `0x`-prefixed hex (the ledger) or decimal
//! strings (the prover); these helpers convert between the two and enforce
//! fixed widths.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{FieldError, Result};

pub fn strip_0x(hex: &str) -> &str {
    hex.strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex)
}

pub fn ensure_0x(hex: &str) -> String {
    format!("0x{}", strip_0x(hex))
}

/// Parse a hex string (with or without `0x`) into an unsigned integer
pub fn hex_to_biguint(hex: &str) -> Result<BigUint> {
    let digits = strip_0x(hex.trim());
    if digits.is_empty() {
        return Err(FieldError::InvalidEncoding("empty hex string".into()));
    }
    BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| FieldError::InvalidEncoding(format!("not hex: {hex}")))
}

/// Render `value` as `0x`-prefixed hex, zero-padded to `byte_len` bytes.
///
/// Fails if the value needs more than `byte_len` bytes.
pub fn left_pad_hex(value: &BigUint, byte_len: usize) -> Result<String> {
    let available = byte_len as u64 * 8;
    if value.bits() > available {
        return Err(FieldError::TooWide {
            needed: value.bits(),
            available,
        });
    }
    let digits = if value.is_zero() {
        String::new()
    } else {
        value.to_str_radix(16)
    };
    Ok(format!("0x{digits:0>width$}", width = byte_len * 2))
}

/// Re-pad an existing hex string to `byte_len` bytes
pub fn pad_hex(hex: &str, byte_len: usize) -> Result<String> {
    left_pad_hex(&hex_to_biguint(hex)?, byte_len)
}

pub fn hex_to_decimal(hex: &str) -> Result<String> {
    Ok(hex_to_biguint(hex)?.to_string())
}

pub fn decimal_to_biguint(decimal: &str) -> Result<BigUint> {
    BigUint::parse_bytes(decimal.trim().as_bytes(), 10)
        .ok_or_else(|| FieldError::InvalidEncoding(format!("not a decimal: {decimal}")))
}

pub fn decimal_to_hex(decimal: &str, byte_len: usize) -> Result<String> {
    left_pad_hex(&decimal_to_biguint(decimal)?, byte_len)
}

/// Decode hex into exactly `byte_len` big-endian bytes
pub fn hex_to_bytes(hex: &str, byte_len: usize) -> Result<Vec<u8>> {
    let value = hex_to_biguint(hex)?;
    let padded = left_pad_hex(&value, byte_len)?;
    hex::decode(strip_0x(&padded)).map_err(|e| FieldError::InvalidEncoding(e.to_string()))
}

//! Random values without modulo bias

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::{FieldError, Result};
use crate::field::{FIELD_BYTES, FieldElement};

/// Give up after this many rejected draws; with the mask below each draw
/// succeeds with probability above 1/2.
const MAX_DRAWS: usize = 256;

/// `byte_len` random bytes as `0x`-prefixed hex
pub fn random_hex(byte_len: usize) -> String {
    let mut bytes = vec![0u8; byte_len];
    OsRng.fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

/// Uniform value in `[0, bound)` drawn from `byte_len` random bytes
pub fn random_below(bound: &BigUint, byte_len: usize) -> Result<BigUint> {
    random_below_with(&mut OsRng, bound, byte_len)
}

/// Same as [`random_below`] with a caller-supplied generator
pub fn random_below_with<R: RngCore>(
    rng: &mut R,
    bound: &BigUint,
    byte_len: usize,
) -> Result<BigUint> {
    if bound.is_zero() {
        return Err(FieldError::InvalidEncoding("bound must be positive".into()));
    }
    let available = byte_len as u64 * 8;
    // The largest representable draw is 2^available - 1, so bound may be at most 2^available
    if bound.bits() > available + 1
        || (bound.bits() == available + 1 && *bound != BigUint::one() << available)
    {
        return Err(FieldError::TooWide {
            needed: bound.bits(),
            available,
        });
    }
    let mask_bits = (bound - BigUint::one()).bits();
    let mask = (BigUint::one() << mask_bits) - BigUint::one();

    let mut bytes = vec![0u8; byte_len];
    for _ in 0..MAX_DRAWS {
        rng.fill_bytes(&mut bytes);
        let candidate = BigUint::from_bytes_be(&bytes) & &mask;
        if &candidate < bound {
            return Ok(candidate);
        }
    }
    Err(FieldError::SamplingExhausted(MAX_DRAWS))
}

/// Uniform field element
pub fn random_field_element() -> Result<FieldElement> {
    random_field_element_with(&mut OsRng)
}

pub fn random_field_element_with<R: RngCore>(rng: &mut R) -> Result<FieldElement> {
    let value = random_below_with(rng, FieldElement::modulus(), FIELD_BYTES)?;
    FieldElement::from_biguint(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_hex_length() {
        let h = random_hex(32);
        assert_eq!(h.len(), 66);
        assert!(h.starts_with("0x"));
        assert_ne!(random_hex(32), h, "two draws should differ");
    }

    #[test]
    fn test_random_below_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let bound = BigUint::from(1000u32);
        for _ in 0..200 {
            let v = random_below_with(&mut rng, &bound, 2).unwrap();
            assert!(v < bound);
        }
    }

    #[test]
    fn test_random_below_rejects_unrepresentable_bound() {
        let bound = BigUint::from(70_000u32);
        assert!(matches!(
            random_below(&bound, 2),
            Err(FieldError::TooWide { .. })
        ));
        // 2^16 is exactly representable with two bytes
        assert!(random_below(&BigUint::from(65_536u32), 2).is_ok());
        assert!(random_below(&BigUint::zero(), 2).is_err());
    }

    #[test]
    fn test_random_field_element_in_field() {
        let fe = random_field_element().unwrap();
        assert!(&fe.to_biguint() < FieldElement::modulus());
    }

    /// Generator stuck on all-ones bytes, which the mask maps above p
    struct Saturated;

    impl RngCore for Saturated {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0xff);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_random_field_element_reports_exhaustion() {
        assert_eq!(
            random_field_element_with(&mut Saturated),
            Err(FieldError::SamplingExhausted(MAX_DRAWS))
        );
    }
}

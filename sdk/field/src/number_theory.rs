//! Modular square roots over arbitrary odd primes

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{FieldError, Result};

/// Euler's criterion: `n^((p-1)/2) == 1 (mod p)`
pub fn is_quadratic_residue(n: &BigUint, p: &BigUint) -> bool {
    if *p < BigUint::from(2u32) {
        return false;
    }
    let n = n % p;
    if n.is_zero() {
        return true;
    }
    let exponent = (p - BigUint::one()) >> 1;
    n.modpow(&exponent, p).is_one()
}

/// One square root of `n` modulo the prime `p`; the other is `p - root`.
///
/// Uses the `p ≡ 3 (mod 4)` shortcut when available and Tonelli-Shanks
/// otherwise.
pub fn square_root_mod_prime(n: &BigUint, p: &BigUint) -> Result<BigUint> {
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    if *p < two {
        return Err(FieldError::InvalidModulus(p.to_string()));
    }
    let n = n % p;

    if n.is_zero() {
        return Ok(n);
    }
    if *p == two {
        return Ok(n);
    }
    if !is_quadratic_residue(&n, p) {
        return Err(FieldError::NonResidue(n.to_string()));
    }

    if p % 4u32 == BigUint::from(3u32) {
        let exponent = (p + &one) >> 2;
        return Ok(n.modpow(&exponent, p));
    }

    // p - 1 = q * 2^s with q odd
    let p_minus_one = p - &one;
    let s = p_minus_one.trailing_zeros().unwrap_or(0);
    let q = &p_minus_one >> s;

    let mut z = two.clone();
    while is_quadratic_residue(&z, p) {
        z += &one;
    }

    let mut m = s;
    let mut c = z.modpow(&q, p);
    let mut t = n.modpow(&q, p);
    let mut r = n.modpow(&((&q + &one) >> 1), p);

    while !t.is_one() {
        // least i with t^(2^i) == 1
        let mut i = 0u64;
        let mut t2i = t.clone();
        while !t2i.is_one() {
            t2i = (&t2i * &t2i) % p;
            i += 1;
            if i == m {
                return Err(FieldError::NonResidue(n.to_string()));
            }
        }
        let b = c.modpow(&(BigUint::one() << (m - i - 1)), p);
        m = i;
        c = (&b * &b) % p;
        t = (t * &c) % p;
        r = (r * b) % p;
    }
    Ok(r)
}

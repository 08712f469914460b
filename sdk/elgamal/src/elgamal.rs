//! ElGamal over BabyJubJub
//!
//! ```text
//! S   = r·G
//! C_i = m_i·G + r·PK_i
//! m_i·G = C_i − sk_i·S
//! ```
//!
//! Decryption yields the point `m·G`; the scalar itself has to be found
//! with [`crate::brute_force`].

use serde::{Deserialize, Serialize};
use shieldkit_field::{FieldElement, random_below};

use crate::curve::{CompressedPoint, CurvePoint, edwards_compress, scalar_mult};
use crate::error::{CurveError, Result};

/// Shared ephemeral point followed by one masked point per message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub ephemeral: CurvePoint,
    pub masked: Vec<CurvePoint>,
}

impl Ciphertext {
    /// Flattened `[S, C_1, …, C_n]` as the shield contract stores it
    pub fn points(&self) -> Vec<CurvePoint> {
        std::iter::once(self.ephemeral)
            .chain(self.masked.iter().copied())
            .collect()
    }

    pub fn compressed(&self) -> Vec<CompressedPoint> {
        self.points().iter().map(edwards_compress).collect()
    }

    pub fn len(&self) -> usize {
        self.masked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masked.is_empty()
    }
}

/// Encrypt message `i` to `public_keys[i]` with fresh randomness
pub fn encrypt(messages: &[FieldElement], public_keys: &[CurvePoint]) -> Result<Ciphertext> {
    let r = random_below(CurvePoint::subgroup_order(), 32)?;
    encrypt_with_randomness(messages, public_keys, &FieldElement::from_biguint(&r)?)
}

/// Encrypt every message to the same key
pub fn encrypt_to(public_key: &CurvePoint, messages: &[FieldElement]) -> Result<Ciphertext> {
    encrypt(messages, &vec![*public_key; messages.len()])
}

pub fn encrypt_with_randomness(
    messages: &[FieldElement],
    public_keys: &[CurvePoint],
    randomness: &FieldElement,
) -> Result<Ciphertext> {
    if messages.len() > public_keys.len() {
        return Err(CurveError::Validation(format!(
            "{} messages but only {} public keys",
            messages.len(),
            public_keys.len()
        )));
    }
    let g = CurvePoint::generator();
    let ephemeral = scalar_mult(randomness, &g);
    let masked = messages
        .iter()
        .zip(public_keys)
        .map(|(m, pk)| scalar_mult(m, &g).add(&scalar_mult(randomness, pk)))
        .collect();
    Ok(Ciphertext { ephemeral, masked })
}

/// Recover `m_i·G` for each masked point using `private_keys[i]`
pub fn decrypt(ciphertext: &Ciphertext, private_keys: &[FieldElement]) -> Result<Vec<CurvePoint>> {
    if ciphertext.masked.len() > private_keys.len() {
        return Err(CurveError::Validation(format!(
            "{} ciphertexts but only {} private keys",
            ciphertext.masked.len(),
            private_keys.len()
        )));
    }
    Ok(ciphertext
        .masked
        .iter()
        .zip(private_keys)
        .map(|(c, sk)| c.sub(&scalar_mult(sk, &ciphertext.ephemeral)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keypair(sk: u64) -> (FieldElement, CurvePoint) {
        let sk = FieldElement::from_u64(sk);
        (sk, scalar_mult(&sk, &CurvePoint::generator()))
    }

    #[test]
    fn test_round_trip_single_key() {
        let (sk, pk) = keypair(0x1234_5678);
        let m = FieldElement::from_u64(42);
        let ct = encrypt_to(&pk, &[m]).unwrap();
        let points = decrypt(&ct, &[sk]).unwrap();
        assert_eq!(points[0], scalar_mult(&m, &CurvePoint::generator()));
    }

    #[test]
    fn test_round_trip_per_message_keys() {
        let keys: Vec<_> = [11u64, 22, 33].into_iter().map(keypair).collect();
        let sks: Vec<_> = keys.iter().map(|(sk, _)| *sk).collect();
        let pks: Vec<_> = keys.iter().map(|(_, pk)| *pk).collect();
        let messages = [1u64, 2, 3].map(FieldElement::from_u64);

        let ct = encrypt(&messages, &pks).unwrap();
        assert_eq!(ct.len(), 3);
        assert_eq!(ct.points().len(), 4);
        let g = CurvePoint::generator();
        for (point, m) in decrypt(&ct, &sks).unwrap().iter().zip(messages.iter()) {
            assert_eq!(*point, scalar_mult(m, &g));
        }
    }

    #[test]
    fn test_wrong_key_does_not_decrypt() {
        let (_, pk) = keypair(5);
        let (other, _) = keypair(6);
        let m = FieldElement::from_u64(9);
        let ct = encrypt_to(&pk, &[m]).unwrap();
        let points = decrypt(&ct, &[other]).unwrap();
        assert_ne!(points[0], scalar_mult(&m, &CurvePoint::generator()));
    }

    #[test]
    fn test_fresh_randomness() {
        let (_, pk) = keypair(5);
        let m = [FieldElement::from_u64(9)];
        assert_ne!(encrypt_to(&pk, &m).unwrap(), encrypt_to(&pk, &m).unwrap());
    }

    #[test]
    fn test_not_enough_keys() {
        let (sk, pk) = keypair(5);
        let messages = [FieldElement::one(), FieldElement::one()];
        assert!(matches!(
            encrypt(&messages, &[pk]),
            Err(CurveError::Validation(_))
        ));
        let ct = encrypt(&messages, &[pk, pk]).unwrap();
        assert!(matches!(decrypt(&ct, &[sk]), Err(CurveError::Validation(_))));
    }
}

//! Regulatory compliance records
//!
//! When compliance is enabled, transfers and burns carry an ElGamal
//! encryption of who paid whom (and how much) to the authority keys.
//!
//! ```text
//! transfer: [amount of output 0, sender pk, receiver pk]
//! burn:     [sender pk]
//! ```
//!
//! Authorities recover each field by decrypting to `m·G` and searching a
//! bounded candidate set: amounts over `0..max_amount`, keys over a list of
//! known public keys.

use serde::{Deserialize, Serialize};
use shieldkit_elgamal::{
    AuthorityKeys, Ciphertext, brute_force, brute_force_range, decrypt, encrypt, range_generator,
};
use shieldkit_field::FieldElement;
use shieldkit_privacy::{NoteValue, ZkpPublicKey};

use crate::error::{Result, ShieldError};

/// What an encrypted slot holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceField {
    Amount,
    SenderPublicKey,
    ReceiverPublicKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub ciphertext: Ciphertext,
    /// Layout of `ciphertext.masked`
    pub fields: Vec<ComplianceField>,
}

impl ComplianceRecord {
    /// Encrypt transfer metadata, one authority key per field
    pub fn for_transfer(
        keys: &AuthorityKeys,
        amount: NoteValue,
        sender: &ZkpPublicKey,
        receiver: &ZkpPublicKey,
    ) -> Result<Self> {
        let fields = vec![
            ComplianceField::Amount,
            ComplianceField::SenderPublicKey,
            ComplianceField::ReceiverPublicKey,
        ];
        let messages = [
            FieldElement::from_u128(amount.as_u128()),
            *sender.as_field(),
            *receiver.as_field(),
        ];
        Self::encrypt(keys, &messages, fields)
    }

    pub fn for_burn(keys: &AuthorityKeys, sender: &ZkpPublicKey) -> Result<Self> {
        Self::encrypt(keys, &[*sender.as_field()], vec![ComplianceField::SenderPublicKey])
    }

    fn encrypt(
        keys: &AuthorityKeys,
        messages: &[FieldElement],
        fields: Vec<ComplianceField>,
    ) -> Result<Self> {
        if keys.len() < messages.len() {
            return Err(ShieldError::Config(format!(
                "compliance needs {} authority keys, {} configured",
                messages.len(),
                keys.len()
            )));
        }
        let ciphertext = encrypt(messages, keys.public_keys())?;
        Ok(Self { ciphertext, fields })
    }
}

/// Candidate sets used to invert decrypted points
#[derive(Debug, Clone, Default)]
pub struct Guessers {
    /// Amounts are searched over `0..max_amount`
    pub max_amount: u64,
    pub known_public_keys: Vec<ZkpPublicKey>,
}

/// A decrypted compliance record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecryptedField {
    Amount(NoteValue),
    SenderPublicKey(ZkpPublicKey),
    ReceiverPublicKey(ZkpPublicKey),
}

/// Decrypt every field of `record` with the authority private keys
pub fn decrypt_compliance(
    record: &ComplianceRecord,
    keys: &AuthorityKeys,
    guessers: &Guessers,
) -> Result<Vec<DecryptedField>> {
    if record.fields.len() != record.ciphertext.len() {
        return Err(ShieldError::Validation(format!(
            "record lists {} fields for {} ciphertexts",
            record.fields.len(),
            record.ciphertext.len()
        )));
    }
    let points = decrypt(&record.ciphertext, keys.private_keys())?;
    let known_keys: Vec<String> = guessers
        .known_public_keys
        .iter()
        .map(ZkpPublicKey::to_hex)
        .collect();

    record
        .fields
        .iter()
        .zip(points.iter())
        .map(|(field, point)| -> Result<DecryptedField> {
            Ok(match field {
                ComplianceField::Amount => {
                    let m = brute_force_range(point, &range_generator(guessers.max_amount))?;
                    DecryptedField::Amount(NoteValue::from_hex(&m.to_hex())?)
                }
                ComplianceField::SenderPublicKey => {
                    DecryptedField::SenderPublicKey(ZkpPublicKey(brute_force(point, &known_keys)?))
                }
                ComplianceField::ReceiverPublicKey => {
                    DecryptedField::ReceiverPublicKey(ZkpPublicKey(brute_force(point, &known_keys)?))
                }
            })
        })
        .collect()
}

//! Compliance authority keys
//!
//! Authority keys are loaded once through an explicit
//! [`AuthorityRegistry::set_authority_private_keys`] call and removed with
//! [`AuthorityRegistry::clear_authority_private_keys`]. Nothing initializes
//! them implicitly.

use log::info;
use shieldkit_field::{FieldElement, random_below};

use crate::curve::{CompressedPoint, CurvePoint, edwards_compress, scalar_mult};
use crate::error::{CurveError, Result};

/// Private keys and their public points, index-aligned
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorityKeys {
    private_keys: Vec<FieldElement>,
    public_keys: Vec<CurvePoint>,
}

impl AuthorityKeys {
    pub fn from_private_keys(private_keys: Vec<FieldElement>) -> Result<Self> {
        if private_keys.is_empty() {
            return Err(CurveError::Validation("no authority keys supplied".into()));
        }
        let g = CurvePoint::generator();
        let public_keys = private_keys.iter().map(|sk| scalar_mult(sk, &g)).collect();
        Ok(Self {
            private_keys,
            public_keys,
        })
    }

    /// Parse hex-encoded private keys as found in configuration
    pub fn from_hex<S: AsRef<str>>(keys: &[S]) -> Result<Self> {
        let private_keys = keys
            .iter()
            .map(|k| FieldElement::from_hex(k.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::from_private_keys(private_keys)
    }

    /// Fresh random keys, for local deployments and tests
    pub fn generate(count: usize) -> Result<Self> {
        let private_keys = (0..count)
            .map(|_| {
                random_below(CurvePoint::subgroup_order(), 32)
                    .and_then(|k| FieldElement::from_biguint(&k))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::from_private_keys(private_keys)
    }

    pub fn len(&self) -> usize {
        self.private_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.private_keys.is_empty()
    }

    pub fn private_keys(&self) -> &[FieldElement] {
        &self.private_keys
    }

    pub fn public_keys(&self) -> &[CurvePoint] {
        &self.public_keys
    }

    /// Compressed public keys, as registered with the shield contract
    pub fn compressed_public_keys(&self) -> Vec<CompressedPoint> {
        self.public_keys.iter().map(edwards_compress).collect()
    }
}

impl std::fmt::Debug for AuthorityKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorityKeys")
            .field("count", &self.private_keys.len())
            .field("public_keys", &self.compressed_public_keys())
            .finish()
    }
}

/// Holder for the process's authority keys
#[derive(Debug, Default)]
pub struct AuthorityRegistry {
    keys: Option<AuthorityKeys>,
}

impl AuthorityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install keys; fails if keys are already installed
    pub fn set_authority_private_keys(&mut self, keys: AuthorityKeys) -> Result<()> {
        if self.keys.is_some() {
            return Err(CurveError::Validation(
                "authority keys already set; clear them first".into(),
            ));
        }
        info!("installed {} authority keys", keys.len());
        self.keys = Some(keys);
        Ok(())
    }

    /// Remove installed keys, returning them
    pub fn clear_authority_private_keys(&mut self) -> Option<AuthorityKeys> {
        let keys = self.keys.take();
        if keys.is_some() {
            info!("cleared authority keys");
        }
        keys
    }

    pub fn keys(&self) -> Option<&AuthorityKeys> {
        self.keys.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.keys.is_some()
    }
}

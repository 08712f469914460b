//! Prover input encoding shared by every operation
//!
//! Each operation's ordered input vector is a compatibility contract with
//! its compiled circuit; the vectors themselves are assembled in
//! [`crate::operations`]. The pieces below are common to all of them.

use shieldkit_field::{Element, FieldElement, HashMode, sha_hash};
use shieldkit_privacy::SiblingPath;

use crate::error::Result;

/// Width of the public input hash and of the asset inside the circuit
pub const PUBLIC_INPUT_BITS: usize = 248;

/// Width of leaf indices and amounts
pub const INDEX_BITS: usize = 128;

/// Root encoding: one field element for MiMC trees, two 128-bit packets
/// for SHA trees (a SHA node does not fit a single field element inside
/// the circuit).
pub fn root_elements(mode: HashMode, root: &FieldElement) -> Result<Vec<Element>> {
    let element = Element::from(root);
    Ok(match mode {
        HashMode::Mimc => vec![element],
        HashMode::Sha => element.packets(2)?,
    })
}

/// SHA hash of `parts`, as the single 248-bit public input
pub fn public_input_hash(parts: &[Element]) -> Result<Element> {
    Ok(Element::from(sha_hash(parts)).truncated(PUBLIC_INPUT_BITS)?)
}

pub fn index_element(index: u64) -> Result<Element> {
    Ok(Element::from_u128(u128::from(index), INDEX_BITS)?)
}

/// Siblings (root excluded) followed by the leaf index
pub fn path_elements(path: &SiblingPath, index: u64) -> Result<Vec<Element>> {
    let mut elements = path.to_elements();
    elements.push(index_element(index)?);
    Ok(elements)
}

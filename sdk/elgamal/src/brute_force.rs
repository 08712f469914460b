//! Exhaustive search for ElGamal plaintexts in a known-small domain

use log::debug;
use shieldkit_field::FieldElement;

use crate::curve::{CurvePoint, point_add, scalar_mult};
use crate::error::{CurveError, Result};

fn parse_candidate(candidate: &str) -> Result<FieldElement> {
    let candidate = candidate.trim();
    let parsed = if candidate.starts_with("0x") || candidate.starts_with("0X") {
        FieldElement::from_hex(candidate)
    } else {
        FieldElement::from_decimal(candidate)
    };
    Ok(parsed?)
}

/// Find the candidate `m` with `m·G == point`.
///
/// Candidates are hex (`0x…`) or decimal strings, so a range of amounts
/// and a list of known public keys can be searched the same way.
pub fn brute_force<I>(point: &CurvePoint, candidates: I) -> Result<FieldElement>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let g = CurvePoint::generator();
    let mut tried = 0usize;
    for candidate in candidates {
        let m = parse_candidate(candidate.as_ref())?;
        tried += 1;
        if scalar_mult(&m, &g) == *point {
            debug!("brute force matched after {tried} candidates");
            return Ok(m);
        }
    }
    debug!("brute force exhausted {tried} candidates");
    Err(CurveError::NotFound)
}

/// Find `m` in `0..range.max()` with `m·G == point`.
///
/// Walks the multiples of G one addition at a time instead of running a
/// full scalar multiplication per candidate.
pub fn brute_force_range(point: &CurvePoint, range: &RangeGenerator) -> Result<FieldElement> {
    let g = CurvePoint::generator();
    let mut acc = CurvePoint::identity();
    for m in 0..range.max() {
        if acc == *point {
            debug!("range search matched at {m}");
            return Ok(FieldElement::from_u64(m));
        }
        acc = point_add(&acc, &g);
    }
    debug!("range search exhausted {} candidates", range.max());
    Err(CurveError::NotFound)
}

/// Lazy sequence of decimal strings `0..max`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeGenerator {
    max: u64,
    next: u64,
}

impl RangeGenerator {
    pub fn new(max: u64) -> Self {
        Self { max, next: 0 }
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    /// Start again from zero
    pub fn restart(&mut self) {
        self.next = 0;
    }
}

impl Iterator for RangeGenerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next >= self.max {
            return None;
        }
        let value = self.next;
        self.next += 1;
        Some(value.to_string())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.max - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RangeGenerator {}

pub fn range_generator(max: u64) -> RangeGenerator {
    RangeGenerator::new(max)
}

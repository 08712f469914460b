//! BabyJubJub twisted Edwards curve
//!
//! `a·x² + y² = 1 + d·x²·y²` over the BN254 scalar field with a = 168700
//! and d = 168696. Since `a` is a square and `d` is not, the addition law
//! is complete: it needs no special cases, and its denominators never
//! vanish for points on the curve.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use shieldkit_field::{FieldElement, hex_to_bytes, square_root_mod_prime};
use std::sync::LazyLock;

use crate::error::{CurveError, Result};

pub const COEFF_A: u64 = 168700;
pub const COEFF_D: u64 = 168696;

/// Number of scalar bits always processed by [`scalar_mult`]
pub const SCALAR_BITS: u64 = 256;

const GENERATOR_X: [u8; 32] = [
    0x24, 0x91, 0xab, 0xa8, 0xd3, 0xa1, 0x91, 0xa7, 0x6e, 0x35, 0xbc, 0x47, 0xbd, 0x9a, 0xfe, 0x6c,
    0xc8, 0x8f, 0xee, 0x14, 0xd6, 0x07, 0xcb, 0xe7, 0x79, 0xf2, 0x34, 0x90, 0x47, 0xd5, 0xc1, 0x57,
];
const GENERATOR_Y: [u8; 32] = [
    0x2e, 0x07, 0x29, 0x7f, 0x8d, 0x3c, 0x3d, 0x78, 0x18, 0xdb, 0xdd, 0xfd, 0x24, 0xc3, 0x55, 0x83,
    0xf9, 0xa9, 0xd4, 0xed, 0x0c, 0xb0, 0xc1, 0xd1, 0x34, 0x8d, 0xd8, 0xf7, 0xf9, 0x91, 0x52, 0xd7,
];
const SUBGROUP_ORDER: [u8; 32] = [
    0x06, 0x0c, 0x89, 0xce, 0x5c, 0x26, 0x34, 0x05, 0x37, 0x0a, 0x08, 0xb6, 0xd0, 0x30, 0x2b, 0x0b,
    0xab, 0x3e, 0xed, 0xb8, 0x39, 0x20, 0xee, 0x0a, 0x67, 0x72, 0x97, 0xdc, 0x39, 0x21, 0x26, 0xf1,
];

static GENERATOR: LazyLock<CurvePoint> = LazyLock::new(|| CurvePoint {
    x: FieldElement::from_biguint_reduced(&BigUint::from_bytes_be(&GENERATOR_X)),
    y: FieldElement::from_biguint_reduced(&BigUint::from_bytes_be(&GENERATOR_Y)),
});

static ORDER: LazyLock<BigUint> = LazyLock::new(|| BigUint::from_bytes_be(&SUBGROUP_ORDER));

fn coeff_a() -> FieldElement {
    FieldElement::from_u64(COEFF_A)
}

fn coeff_d() -> FieldElement {
    FieldElement::from_u64(COEFF_D)
}

/// Inverse of a denominator that completeness guarantees is nonzero
fn invert(value: FieldElement) -> FieldElement {
    value.inverse().unwrap_or_default()
}

/// Affine point on BabyJubJub
///
/// Deserialization goes through [`CurvePoint::new`], so off-curve
/// coordinates are rejected at the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPoint")]
pub struct CurvePoint {
    x: FieldElement,
    y: FieldElement,
}

#[derive(Deserialize)]
struct RawPoint {
    x: FieldElement,
    y: FieldElement,
}

impl TryFrom<RawPoint> for CurvePoint {
    type Error = CurveError;

    fn try_from(raw: RawPoint) -> Result<Self> {
        Self::new(raw.x, raw.y)
    }
}

impl CurvePoint {
    /// Validating constructor
    pub fn new(x: FieldElement, y: FieldElement) -> Result<Self> {
        let point = Self { x, y };
        if !point.is_on_curve() {
            return Err(CurveError::NotOnCurve {
                x: x.to_decimal(),
                y: y.to_decimal(),
            });
        }
        Ok(point)
    }

    /// Neutral element (0, 1)
    pub fn identity() -> Self {
        Self {
            x: FieldElement::zero(),
            y: FieldElement::one(),
        }
    }

    /// Generator of the prime-order subgroup
    pub fn generator() -> Self {
        *GENERATOR
    }

    /// Order of the subgroup generated by [`CurvePoint::generator`]
    pub fn subgroup_order() -> &'static BigUint {
        &ORDER
    }

    pub fn x(&self) -> FieldElement {
        self.x
    }

    pub fn y(&self) -> FieldElement {
        self.y
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn is_on_curve(&self) -> bool {
        let x2 = self.x.square();
        let y2 = self.y.square();
        coeff_a() * x2 + y2 == FieldElement::one() + coeff_d() * x2 * y2
    }

    pub fn neg(&self) -> Self {
        Self {
            x: -self.x,
            y: self.y,
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        point_add(self, other)
    }

    pub fn sub(&self, other: &Self) -> Self {
        point_add(self, &other.neg())
    }

    pub fn mul(&self, scalar: &FieldElement) -> Self {
        scalar_mult(scalar, self)
    }
}

impl Default for CurvePoint {
    fn default() -> Self {
        Self::identity()
    }
}

/// Twisted Edwards addition
///
/// ```text
/// x3 = (x1·y2 + y1·x2) / (1 + d·x1·x2·y1·y2)
/// y3 = (y1·y2 − a·x1·x2) / (1 − d·x1·x2·y1·y2)
/// ```
pub fn point_add(p: &CurvePoint, q: &CurvePoint) -> CurvePoint {
    let x1x2 = p.x * q.x;
    let y1y2 = p.y * q.y;
    let dxy = coeff_d() * x1x2 * y1y2;

    let x = (p.x * q.y + p.y * q.x) * invert(FieldElement::one() + dxy);
    let y = (y1y2 - coeff_a() * x1x2) * invert(FieldElement::one() - dxy);
    CurvePoint { x, y }
}

/// Extended coordinates (X : Y : Z : T) with x = X/Z, y = Y/Z, x·y = T/Z
#[derive(Clone, Copy)]
struct Extended {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
    t: FieldElement,
}

impl Extended {
    fn from_affine(p: &CurvePoint) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: FieldElement::one(),
            t: p.x * p.y,
        }
    }

    fn to_affine(self) -> CurvePoint {
        let z_inv = invert(self.z);
        CurvePoint {
            x: self.x * z_inv,
            y: self.y * z_inv,
        }
    }

    /// Unified addition (Hisil-Wong-Carter-Dawson), also used for doubling
    fn add(&self, other: &Self) -> Self {
        let a = self.x * other.x;
        let b = self.y * other.y;
        let c = self.t * coeff_d() * other.t;
        let d = self.z * other.z;
        let e = (self.x + self.y) * (other.x + other.y) - a - b;
        let f = d - c;
        let g = d + c;
        let h = b - coeff_a() * a;
        Self {
            x: e * f,
            y: g * h,
            t: e * h,
            z: f * g,
        }
    }

    /// `if bit { when_set } else { when_clear }` without branching on `bit`
    fn select(bit: bool, when_set: &Self, when_clear: &Self) -> Self {
        let b = FieldElement::from_u64(bit as u64);
        let pick = |s: FieldElement, c: FieldElement| c + b * (s - c);
        Self {
            x: pick(when_set.x, when_clear.x),
            y: pick(when_set.y, when_clear.y),
            z: pick(when_set.z, when_clear.z),
            t: pick(when_set.t, when_clear.t),
        }
    }
}

/// `k·P` by double-and-add-always over a fixed number of bits
pub fn scalar_mult(scalar: &FieldElement, point: &CurvePoint) -> CurvePoint {
    scalar_mult_biguint(&scalar.to_biguint(), point)
}

/// Same as [`scalar_mult`] for scalars outside the base field (e.g. sums of keys)
pub fn scalar_mult_biguint(scalar: &BigUint, point: &CurvePoint) -> CurvePoint {
    let base = Extended::from_affine(point);
    let mut acc = Extended::from_affine(&CurvePoint::identity());
    let bits = scalar.bits().max(SCALAR_BITS);

    for i in (0..bits).rev() {
        acc = acc.add(&acc);
        let with_base = acc.add(&base);
        acc = Extended::select(scalar.bit(i), &with_base, &acc);
    }
    acc.to_affine()
}

/// Compressed point: y in the low 255 bits, the parity of x in bit 255
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CompressedPoint(pub [u8; 32]);

impl CompressedPoint {
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        let bytes = hex_to_bytes(hex, 32)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

pub fn edwards_compress(point: &CurvePoint) -> CompressedPoint {
    let mut bytes = point.y.to_be_bytes();
    if point.x.is_odd() {
        bytes[0] |= 0x80;
    }
    CompressedPoint(bytes)
}

/// Recover x from `x² = (y² − 1) / (d·y² − a)` and the stored parity
pub fn edwards_decompress(compressed: &CompressedPoint) -> Result<CurvePoint> {
    let mut y_bytes = compressed.0;
    let sign = y_bytes[0] & 0x80 != 0;
    y_bytes[0] &= 0x7f;

    let y = FieldElement::from_be_bytes(&y_bytes)
        .map_err(|e| CurveError::Decompression(e.to_string()))?;
    let y2 = y.square();
    let denominator = coeff_d() * y2 - coeff_a();
    let inverse = denominator
        .inverse()
        .ok_or_else(|| CurveError::Decompression("y makes the denominator vanish".into()))?;
    let x2 = (y2 - FieldElement::one()) * inverse;

    let root = square_root_mod_prime(&x2.to_biguint(), FieldElement::modulus())
        .map_err(|e| CurveError::Decompression(e.to_string()))?;
    let mut x = FieldElement::from_biguint_reduced(&root);
    if x.is_odd() != sign {
        if x.is_zero() {
            return Err(CurveError::Decompression(
                "sign bit set for x = 0".into(),
            ));
        }
        x = -x;
    }
    CurvePoint::new(x, y).map_err(|e| CurveError::Decompression(e.to_string()))
}

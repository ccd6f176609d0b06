//! # Range-Checked 64-bit Integers
//!
//! The canonical statement encoding lives in BN254's scalar field, but
//! balances and amounts are 64-bit integers. These newtypes are the bridge:
//! they behave like machine integers (checked arithmetic, total ordering)
//! and convert to and from field elements with an explicit range assertion
//! at the conversion boundary.
//!
//! The range check happens at *construction from a field element*, not on
//! every operation — once a value is a `Uint64` or `Int64`, it is a plain
//! 64-bit integer and arithmetic goes through `checked_*` like everywhere
//! else in this crate. Signed values embed into the field the usual way:
//! a negative `v` maps to `p - |v|`, i.e. the additive inverse of its
//! magnitude.

use ark_bn254::Fr;
use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from field-to-integer conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NumError {
    /// The field element is not in `[0, 2^64)`.
    #[error("field element does not fit in an unsigned 64-bit integer")]
    UnsignedOutOfRange,

    /// The field element is not in `[-(2^63), 2^63)` under the signed
    /// embedding.
    #[error("field element does not fit in a signed 64-bit integer")]
    SignedOutOfRange,
}

/// Extracts the low 64 bits of a field element, provided every higher
/// limb is zero. BN254's scalar field uses four 64-bit limbs, so this is
/// exactly the `[0, 2^64)` membership test.
fn field_to_u64(element: &Fr) -> Option<u64> {
    let limbs = element.into_bigint().0;
    if limbs[1..].iter().all(|&limb| limb == 0) {
        Some(limbs[0])
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Uint64
// ---------------------------------------------------------------------------

/// An unsigned 64-bit integer with a checked field embedding.
///
/// Used for closing balances and timestamps. The smallest ledger
/// denomination is the unit; there are no fractional values anywhere.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Uint64(u64);

impl Uint64 {
    pub const ZERO: Self = Self(0);

    /// Wraps a native `u64`. Always in range by construction.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The underlying integer value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Embeds the value into the field. Total — every `u64` fits.
    pub fn to_field(self) -> Fr {
        Fr::from(self.0)
    }

    /// Range-checked inverse of [`to_field`](Self::to_field).
    pub fn from_field(element: &Fr) -> Result<Self, NumError> {
        field_to_u64(element)
            .map(Self)
            .ok_or(NumError::UnsignedOutOfRange)
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }
}

impl fmt::Display for Uint64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Uint64 {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

// ---------------------------------------------------------------------------
// Int64
// ---------------------------------------------------------------------------

/// A signed 64-bit integer with a checked field embedding.
///
/// Transaction amounts are signed: negative is a debit, positive a credit.
/// Negative values map to `p - |v|` in the field, which is what makes the
/// suffix-sum balance reconstruction work with plain field subtraction in
/// downstream proof systems.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Int64(i64);

impl Int64 {
    pub const ZERO: Self = Self(0);

    /// Wraps a native `i64`. Always in range by construction.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// The underlying integer value.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Embeds the value into the field: non-negative values directly,
    /// negative values as the additive inverse of their magnitude.
    pub fn to_field(self) -> Fr {
        if self.0 >= 0 {
            Fr::from(self.0 as u64)
        } else {
            -Fr::from(self.0.unsigned_abs())
        }
    }

    /// Range-checked inverse of [`to_field`](Self::to_field).
    ///
    /// An element decodes as non-negative if it lies in `[0, 2^63)`, and
    /// as negative if its additive inverse lies in `(0, 2^63]`. Everything
    /// else is rejected — the two windows cover disjoint slices of the
    /// field, so the decoding is unambiguous.
    pub fn from_field(element: &Fr) -> Result<Self, NumError> {
        if let Some(v) = field_to_u64(element) {
            if v <= i64::MAX as u64 {
                return Ok(Self(v as i64));
            }
        }
        let negated = -*element;
        if let Some(v) = field_to_u64(&negated) {
            if v <= i64::MIN.unsigned_abs() {
                // v = 2^63 maps to i64::MIN; wrapping_neg is exact there.
                return Ok(Self((v as i64).wrapping_neg()));
            }
        }
        Err(NumError::SignedOutOfRange)
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Integer division, truncating toward zero. `None` on a zero divisor
    /// or on the single overflowing case (`i64::MIN / -1`).
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        self.0.checked_div(rhs.0).map(Self)
    }
}

impl fmt::Display for Int64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Int64 {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

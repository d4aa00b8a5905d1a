/*
    Fixed-point numbers
*/

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Shl, Shr};

use crate::limb::{self, Limb};

mod arithmetic;
mod cast;
mod convert;
mod decimal;
mod format;

pub use format::FixedFormat;

/// A signed fixed-point value with a runtime bit layout.
///
/// The value is `data * 2^-frac_bits` where `data` is a two's-complement
/// integer of `format.bits()` bits, stored sign-extended to whole limbs.
///
/// Equality is bit-exact: two values with different formats are never
/// equal, even when they encode the same number (see `cmp_value`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fixed {
    format: FixedFormat,
    data: Vec<Limb>,
}

impl Fixed {
    // Wraps `data` into `format`, sign-extending from the top format bit.
    pub(crate) fn from_raw(data: Vec<Limb>, format: FixedFormat) -> Self {
        let data = limb::truncate(&data, format.bits());
        Self { format, data }
    }

    /// Returns zero in `format`.
    pub fn zero(format: FixedFormat) -> Self {
        Self {
            format,
            data: vec![0; format.limbs()],
        }
    }

    /// Builds a value from a raw two's-complement limb vector, wrapping
    /// it into `format`.
    pub fn from_limbs(limbs: &[Limb], format: FixedFormat) -> Self {
        Self::from_raw(limbs.to_vec(), format)
    }

    /// The format of this value.
    pub fn format(&self) -> FixedFormat {
        self.format
    }

    /// Total number of bits.
    pub fn bits(&self) -> usize {
        self.format.bits()
    }

    /// Number of integer bits.
    pub fn int_bits(&self) -> i64 {
        self.format.int_bits()
    }

    /// Number of fractional bits.
    pub fn frac_bits(&self) -> i64 {
        self.format.frac_bits()
    }

    /// The sign-extended limbs of this value.
    pub fn limbs(&self) -> &[Limb] {
        &self.data
    }

    /// Returns true if this value is zero.
    pub fn is_zero(&self) -> bool {
        limb::is_zero(&self.data)
    }

    /// Returns true if this value is negative.
    pub fn is_negative(&self) -> bool {
        limb::is_negative(&self.data)
    }

    /// Returns true if both the formats and the bits are the same.
    pub fn is_identical(&self, other: &Self) -> bool {
        self == other
    }

    /// Compares the numbers encoded by two values of any formats.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        let diff = self.sub_exact(other);
        if diff.is_zero() {
            Ordering::Equal
        } else if diff.is_negative() {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    // Copies the value into `format.limbs()` limbs with the binary point
    // moved to `format`; `format` must contain this value's format.
    fn aligned(&self, format: &FixedFormat) -> Vec<Limb> {
        debug_assert!(format.contains(&self.format));
        let mut data = limb::sign_extend(&self.data, format.limbs());
        limb::logical_shift_left(&mut data, (format.frac_bits() - self.frac_bits()) as usize);
        data
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_dec())
    }
}

// Shifts move the binary point, the stored bits never change.
impl Shl<i64> for Fixed {
    type Output = Fixed;

    fn shl(mut self, n: i64) -> Fixed {
        self.format = FixedFormat::raw(self.bits(), self.int_bits() + n);
        self
    }
}

impl Shr<i64> for Fixed {
    type Output = Fixed;

    fn shr(mut self, n: i64) -> Fixed {
        self.format = FixedFormat::raw(self.bits(), self.int_bits() - n);
        self
    }
}

impl Shl<i64> for &Fixed {
    type Output = Fixed;

    fn shl(self, n: i64) -> Fixed {
        self.clone() << n
    }
}

impl Shr<i64> for &Fixed {
    type Output = Fixed;

    fn shr(self, n: i64) -> Fixed {
        self.clone() >> n
    }
}

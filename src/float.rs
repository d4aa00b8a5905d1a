/*
    Floating-point numbers
*/

use std::cmp::Ordering;

mod arithmetic;
mod convert;
mod format;
mod round;

pub use format::FloatFormat;

/// Encoded fields of a floating-point value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatData {
    pub sign: bool,
    pub exp: u64,
    pub man: u64,
}

/// A floating-point value with a runtime exponent and mantissa width.
///
/// Encodings follow IEEE-754: an all-zero exponent field holds zeros and
/// subnormals, an all-ones exponent field holds infinities (zero
/// mantissa) and NaNs (non-zero mantissa).
///
/// `PartialEq` and `PartialOrd` compare numerically across formats: NaN is
/// unordered and `+0 == -0`. Use `is_identical` for a bitwise comparison.
#[derive(Copy, Clone, Debug)]
pub struct Float {
    data: FloatData,
    format: FloatFormat,
}

// Constructors
impl Float {
    /// Creates a value from its fields. Bits outside the field widths are dropped.
    pub fn new(sign: bool, exp: u64, man: u64, format: FloatFormat) -> Self {
        Self {
            data: FloatData {
                sign,
                exp: exp & format.max_exponent(),
                man: man & format.max_mantissa(),
            },
            format,
        }
    }

    /// Creates a value from encoded fields, masking them like `new`.
    pub fn from_data(data: FloatData, format: FloatFormat) -> Self {
        Self::new(data.sign, data.exp, data.man, format)
    }

    /// Signed zero.
    pub fn zero(sign: bool, format: FloatFormat) -> Self {
        Self::new(sign, 0, 0, format)
    }

    /// Signed infinity.
    pub fn infinity(sign: bool, format: FloatFormat) -> Self {
        Self::new(sign, format.max_exponent(), 0, format)
    }

    /// A quiet NaN.
    pub fn nan(format: FloatFormat) -> Self {
        Self::new(false, format.max_exponent(), 1 << (format.man_bits() - 1), format)
    }

    /// Largest finite magnitude with the given sign.
    pub fn max_finite(sign: bool, format: FloatFormat) -> Self {
        Self::new(sign, format.max_exponent() - 1, format.max_mantissa(), format)
    }
}

// Accessors and classification
impl Float {
    /// The format of this value.
    pub fn format(&self) -> FloatFormat {
        self.format
    }

    /// The encoded fields.
    pub fn data(&self) -> FloatData {
        self.data
    }

    /// The sign bit.
    pub fn sign(&self) -> bool {
        self.data.sign
    }

    /// The biased exponent field.
    pub fn exp(&self) -> u64 {
        self.data.exp
    }

    /// The mantissa field.
    pub fn man(&self) -> u64 {
        self.data.man
    }

    /// Returns true if this is a (signed) zero.
    pub fn is_zero(&self) -> bool {
        self.data.exp == 0 && self.data.man == 0
    }

    /// Returns true if this is a NaN.
    pub fn is_nan(&self) -> bool {
        self.data.exp == self.format.max_exponent() && self.data.man != 0
    }

    /// Returns true if this is an infinity.
    pub fn is_infinity(&self) -> bool {
        self.data.exp == self.format.max_exponent() && self.data.man == 0
    }

    /// Returns true if this is neither an infinity nor a NaN.
    pub fn is_finite(&self) -> bool {
        self.data.exp != self.format.max_exponent()
    }

    /// Returns true for finite non-zero values with an implicit leading one.
    pub fn is_normal(&self) -> bool {
        self.data.exp != 0 && self.is_finite()
    }

    /// Returns true for non-zero values with an all-zero exponent field.
    pub fn is_subnormal(&self) -> bool {
        self.data.exp == 0 && self.data.man != 0
    }

    /// Returns true if both the formats and the encodings are the same.
    pub fn is_identical(&self, other: &Self) -> bool {
        self.format == other.format && self.data == other.data
    }

    // Decomposes a finite value into `(sign, m, w)` with value `(-1)^sign * m * 2^w`.
    pub(crate) fn unpack(&self) -> (bool, u128, i64) {
        let man_bits = self.format.man_bits() as i64;
        let bias = self.format.bias();
        if self.data.exp == 0 {
            (self.data.sign, self.data.man as u128, 1 - bias - man_bits)
        } else {
            let m = (self.data.man | (1 << man_bits)) as u128;
            (self.data.sign, m, self.data.exp as i64 - bias - man_bits)
        }
    }

    // Exact ordering of the magnitudes of two non-NaN values.
    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        match (self.is_infinity(), other.is_infinity()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }

        let (_, mx, wx) = self.unpack();
        let (_, my, wy) = other.unpack();
        match (mx == 0, my == 0) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        let top_x = wx + (u128::BITS - mx.leading_zeros()) as i64;
        let top_y = wy + (u128::BITS - my.leading_zeros()) as i64;
        top_x.cmp(&top_y).then_with(|| {
            // same leading bit position, so the shift is at most a mantissa width
            let w = wx.min(wy);
            (mx << (wx - w)).cmp(&(my << (wy - w)))
        })
    }
}

impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Float {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        if self.is_zero() && other.is_zero() {
            return Some(Ordering::Equal);
        }
        let ord = match (self.sign(), other.sign()) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        };
        Some(ord)
    }
}

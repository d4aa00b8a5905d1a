/*
    Fixed-point formats
*/

use std::fmt;

use crate::limb;
use crate::{ArithmeticOperation, Error, Result};

/// Bit layout of a fixed-point value: `bits` total bits of which
/// `int_bits` are integer bits (sign included).
///
/// `int_bits` may be negative or exceed `bits`, in which case the
/// binary point sits outside the stored bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedFormat {
    bits: usize,
    int_bits: i64,
}

impl FixedFormat {
    /// Largest magnitude accepted for any bit specifier.
    pub const MAX_SPECIFIER: i64 = 1 << 32;

    /// Creates a format with `bits` total bits and `int_bits` integer bits.
    pub fn new(bits: usize, int_bits: i64) -> Result<Self> {
        if bits == 0 {
            return Err(Error::NonPositiveBits(0));
        }
        let bits = i64::try_from(bits).map_err(|_| Error::BitSpecifierRange(i64::MAX))?;
        Self::check_range(bits)?;
        Self::check_range(int_bits)?;
        Ok(Self {
            bits: bits as usize,
            int_bits,
        })
    }

    fn check_range(specifier: i64) -> Result<()> {
        if specifier.unsigned_abs() > Self::MAX_SPECIFIER as u64 {
            Err(Error::BitSpecifierRange(specifier))
        } else {
            Ok(())
        }
    }

    /// Creates a format from exactly two of the three bit specifiers,
    /// deriving the third.
    pub fn from_specifiers(
        int_bits: Option<i64>,
        frac_bits: Option<i64>,
        bits: Option<i64>,
    ) -> Result<Self> {
        for s in [int_bits, frac_bits, bits].into_iter().flatten() {
            Self::check_range(s)?;
        }
        let (bits, int_bits) = match (int_bits, frac_bits, bits) {
            (Some(i), Some(f), None) => (i + f, i),
            (Some(i), None, Some(b)) => (b, i),
            (None, Some(f), Some(b)) => (b, b - f),
            (i, f, b) => {
                let given = [i, f, b].iter().filter(|x| x.is_some()).count();
                return Err(Error::BitSpecifierCount(given));
            }
        };
        if bits < 1 {
            return Err(Error::NonPositiveBits(bits));
        }
        Self::new(bits as usize, int_bits)
    }

    // Internal constructor for widths computed from valid formats.
    pub(crate) fn raw(bits: usize, int_bits: i64) -> Self {
        debug_assert!(bits >= 1, "fixed-point format with zero bits");
        Self { bits, int_bits }
    }

    /// Total number of bits.
    #[inline]
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Number of integer bits.
    #[inline]
    pub fn int_bits(&self) -> i64 {
        self.int_bits
    }

    /// Number of fractional bits, `bits - int_bits`.
    #[inline]
    pub fn frac_bits(&self) -> i64 {
        self.bits as i64 - self.int_bits
    }

    /// Number of limbs a value of this format occupies.
    #[inline]
    pub fn limbs(&self) -> usize {
        limb::bits_to_limbs(self.bits)
    }

    /// Smallest format that holds the sum or difference of any two values
    /// of `self` and `other` exactly.
    pub fn add_format(&self, other: &Self) -> Self {
        let int_bits = self.int_bits.max(other.int_bits) + 1;
        let frac_bits = self.frac_bits().max(other.frac_bits());
        Self::raw((int_bits + frac_bits) as usize, int_bits)
    }

    /// Format that holds the product of any two values exactly.
    pub fn mul_format(&self, other: &Self) -> Self {
        Self::raw(self.bits + other.bits, self.int_bits + other.int_bits)
    }

    /// Default quotient format.
    pub fn div_format(&self, other: &Self) -> Self {
        let int_bits = self.int_bits + other.frac_bits() + 1;
        let frac_bits = self.frac_bits() + other.int_bits;
        Self::raw((int_bits + frac_bits) as usize, int_bits)
    }

    /// Format that holds the negation or absolute value of any value exactly.
    pub fn neg_format(&self) -> Self {
        Self::raw(self.bits + 1, self.int_bits + 1)
    }

    /// Format used for the result of `op` on values of `lhs` and `rhs`.
    pub fn for_operation(op: ArithmeticOperation, lhs: &Self, rhs: &Self) -> Self {
        match op {
            ArithmeticOperation::Add | ArithmeticOperation::Sub => lhs.add_format(rhs),
            ArithmeticOperation::Mul => lhs.mul_format(rhs),
            ArithmeticOperation::Div => lhs.div_format(rhs),
        }
    }

    /// Returns true if every value of `other` is exactly representable here.
    pub fn contains(&self, other: &Self) -> bool {
        self.int_bits >= other.int_bits && self.frac_bits() >= other.frac_bits()
    }
}

impl fmt::Display for FixedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fx<{}, {}>", self.bits, self.int_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specifiers() {
        let a = FixedFormat::from_specifiers(Some(4), Some(4), None).unwrap();
        let b = FixedFormat::from_specifiers(Some(4), None, Some(8)).unwrap();
        let c = FixedFormat::from_specifiers(None, Some(4), Some(8)).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(
            FixedFormat::from_specifiers(Some(1), Some(1), Some(2)),
            Err(Error::BitSpecifierCount(3))
        );
        assert_eq!(
            FixedFormat::from_specifiers(Some(3), Some(-3), None),
            Err(Error::NonPositiveBits(0))
        );
    }

    #[test]
    fn out_of_range_specifiers_are_rejected() {
        assert_eq!(
            FixedFormat::from_specifiers(Some(i64::MAX), Some(1), None),
            Err(Error::BitSpecifierRange(i64::MAX))
        );
        assert_eq!(
            FixedFormat::from_specifiers(None, Some(i64::MIN), Some(8)),
            Err(Error::BitSpecifierRange(i64::MIN))
        );
        let limit = FixedFormat::MAX_SPECIFIER;
        assert_eq!(
            FixedFormat::from_specifiers(Some(limit), Some(limit), None),
            Err(Error::BitSpecifierRange(2 * limit))
        );
        assert_eq!(
            FixedFormat::new(8, -limit - 1),
            Err(Error::BitSpecifierRange(-limit - 1))
        );
        assert!(FixedFormat::from_specifiers(Some(-limit), None, Some(limit)).is_ok());
    }

    #[test]
    fn promotion_holds_both_operands() {
        let a = FixedFormat::new(8, 4).unwrap();
        let b = FixedFormat::new(10, -2).unwrap();
        let sum = a.add_format(&b);
        assert!(sum.contains(&a) && sum.contains(&b));
        assert!(sum.bits() >= a.bits().max(b.bits()));
        assert_eq!(a.mul_format(&b), FixedFormat::new(18, 2).unwrap());
    }
}

/*
    Floating-point formats
*/

use std::fmt;

use crate::{Error, Result};

/// Bit layout of a floating-point value: a sign bit, `exp_bits` exponent
/// bits stored with a `bias`, and `man_bits` explicit mantissa bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatFormat {
    exp_bits: u8,
    man_bits: u8,
    bias: i64,
}

impl FloatFormat {
    /// Largest supported exponent field.
    pub const MAX_EXP_BITS: u8 = 30;

    /// Largest supported mantissa field.
    pub const MAX_MAN_BITS: u8 = 61;

    /// Largest magnitude accepted for an explicit exponent bias.
    pub const MAX_BIAS: i64 = 1 << 60;

    /// IEEE-754 binary64.
    pub const DOUBLE: FloatFormat = FloatFormat {
        exp_bits: 11,
        man_bits: 52,
        bias: 1023,
    };

    /// IEEE-754 binary32.
    pub const SINGLE: FloatFormat = FloatFormat {
        exp_bits: 8,
        man_bits: 23,
        bias: 127,
    };

    /// IEEE-754 binary16.
    pub const HALF: FloatFormat = FloatFormat {
        exp_bits: 5,
        man_bits: 10,
        bias: 15,
    };

    /// Creates a format with the IEEE-like bias `2^(exp_bits-1) - 1`.
    pub fn new(exp_bits: u8, man_bits: u8) -> Result<Self> {
        Self::check(exp_bits, man_bits)?;
        Ok(Self {
            exp_bits,
            man_bits,
            bias: Self::ieee_bias(exp_bits),
        })
    }

    /// Creates a format with an explicit exponent bias.
    pub fn with_bias(exp_bits: u8, man_bits: u8, bias: i64) -> Result<Self> {
        Self::check(exp_bits, man_bits)?;
        if bias.unsigned_abs() > Self::MAX_BIAS as u64 {
            return Err(Error::InvalidBias(bias));
        }
        Ok(Self {
            exp_bits,
            man_bits,
            bias,
        })
    }

    fn check(exp_bits: u8, man_bits: u8) -> Result<()> {
        if (2..=Self::MAX_EXP_BITS).contains(&exp_bits) && (1..=Self::MAX_MAN_BITS).contains(&man_bits) {
            Ok(())
        } else {
            Err(Error::InvalidFloatFormat { exp_bits, man_bits })
        }
    }

    /// The IEEE-like bias of an exponent field.
    #[inline]
    pub fn ieee_bias(exp_bits: u8) -> i64 {
        (1 << (exp_bits - 1)) - 1
    }

    /// Width of the exponent field.
    #[inline]
    pub fn exp_bits(&self) -> u8 {
        self.exp_bits
    }

    /// Width of the mantissa field, hidden bit excluded.
    #[inline]
    pub fn man_bits(&self) -> u8 {
        self.man_bits
    }

    /// Exponent bias.
    #[inline]
    pub fn bias(&self) -> i64 {
        self.bias
    }

    /// Total width of an encoded value.
    #[inline]
    pub fn total_bits(&self) -> usize {
        1 + self.exp_bits as usize + self.man_bits as usize
    }

    /// The all-ones exponent field that encodes infinities and NaNs.
    #[inline]
    pub fn max_exponent(&self) -> u64 {
        (1 << self.exp_bits) - 1
    }

    /// The mantissa field with every bit set.
    #[inline]
    pub fn max_mantissa(&self) -> u64 {
        (1 << self.man_bits) - 1
    }

    /// Widest of two formats, with the bias recomputed for its exponent field.
    pub fn promote(&self, other: &Self) -> Self {
        let exp_bits = self.exp_bits.max(other.exp_bits);
        Self {
            exp_bits,
            man_bits: self.man_bits.max(other.man_bits),
            bias: Self::ieee_bias(exp_bits),
        }
    }
}

impl fmt::Display for FloatFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fp<{}, {}, {}>", self.exp_bits, self.man_bits, self.bias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_range() {
        let limit = FloatFormat::MAX_BIAS;
        assert_eq!(FloatFormat::with_bias(4, 3, i64::MIN), Err(Error::InvalidBias(i64::MIN)));
        assert_eq!(FloatFormat::with_bias(4, 3, limit + 1), Err(Error::InvalidBias(limit + 1)));
        assert!(FloatFormat::with_bias(4, 3, -limit).is_ok());
        assert_eq!(
            FloatFormat::with_bias(1, 3, 0),
            Err(Error::InvalidFloatFormat { exp_bits: 1, man_bits: 3 })
        );
    }
}

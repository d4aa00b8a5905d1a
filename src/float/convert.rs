/*
    Floating-point conversions
*/

use std::fmt;

use super::*;
use crate::fixed::{Fixed, FixedFormat};
use crate::limb;
use crate::{Context, Error, FloatContext, OperationRng, QuantizationMode, Result};

impl Float {
    /// Decodes a packed `sign | exponent | mantissa` bit pattern.
    pub fn from_bits(bits: u128, format: FloatFormat) -> Self {
        let man_bits = format.man_bits() as u32;
        let exp_bits = format.exp_bits() as u32;
        let man = (bits as u64) & format.max_mantissa();
        let exp = ((bits >> man_bits) as u64) & format.max_exponent();
        let sign = (bits >> (man_bits + exp_bits)) & 1 != 0;
        Self::new(sign, exp, man, format)
    }

    /// Encodes this value as a packed `sign | exponent | mantissa` bit pattern.
    pub fn to_bits(&self) -> u128 {
        let man_bits = self.format.man_bits() as u32;
        let exp_bits = self.format.exp_bits() as u32;
        ((self.data.sign as u128) << (man_bits + exp_bits))
            | ((self.data.exp as u128) << man_bits)
            | self.data.man as u128
    }

    /// Converts a double into `format`, rounding according to `ctx`.
    pub fn from_f64(value: f64, format: FloatFormat, ctx: &FloatContext) -> Self {
        let exact = Self::from_bits(value.to_bits() as u128, FloatFormat::DOUBLE);
        exact.cast_with(format, ctx.quantization, &mut ctx.rng())
    }

    /// Converts to the nearest double, ties to even.
    pub fn to_f64(&self) -> f64 {
        let mut rng = OperationRng::new(None);
        let double = self.cast_with(FloatFormat::DOUBLE, QuantizationMode::TiesEven, &mut rng);
        f64::from_bits(double.to_bits() as u64)
    }

    /// Rounds a fixed-point value into `format`.
    pub fn from_fixed(value: &Fixed, format: FloatFormat, ctx: &FloatContext) -> Self {
        let magnitude = limb::abs(value.limbs());
        let (m, shift) = limb::leading_u128(&magnitude);
        let w = shift as i64 - value.frac_bits();
        Self::round_finite(value.is_negative(), m, w, format, ctx.quantization, &mut ctx.rng())
    }

    /// Converts a finite value to an exactly equal fixed-point value.
    /// Signed zeros both become zero.
    pub fn to_fixed(&self) -> Result<Fixed> {
        if !self.is_finite() {
            return Err(Error::NonFinite(self.to_f64()));
        }

        // mantissas are at most 62 bits, so 64 bits hold the signed value
        let (sign, m, w) = self.unpack();
        let mut data = vec![m as limb::Limb];
        if sign {
            limb::negate_in_place(&mut data);
        }
        let format = FixedFormat::raw(limb::LIMB_BITS, limb::LIMB_BITS as i64 + w);
        Ok(Fixed::from_limbs(&data, format))
    }
}

/// Renders the exact decimal value.
///
/// Finite values go through an exact fixed-point conversion, so the cost
/// grows quadratically with the distance of the exponent from zero. Wide
/// exponent fields or extreme biases make tiny and huge values expensive
/// to print; use `to_f64` for a quick approximation.
impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nan() {
            f.write_str("nan")
        } else if self.is_infinity() {
            f.write_str(if self.sign() { "-inf" } else { "inf" })
        } else if self.is_zero() {
            f.write_str(if self.sign() { "-0" } else { "0" })
        } else {
            match self.to_fixed() {
                Ok(fixed) => f.write_str(&fixed.to_string_dec()),
                Err(_) => Err(fmt::Error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_round_trip() {
        for x in [0.0, -0.0, 1.0, -2.5, f64::MIN_POSITIVE, 5e-324, f64::MAX, f64::INFINITY] {
            let fp = Float::from_f64(x, FloatFormat::DOUBLE, &FloatContext::new());
            assert_eq!(fp.to_f64().to_bits(), x.to_bits(), "round trip failed for {:e}", x);
        }
        assert!(Float::from_f64(f64::NAN, FloatFormat::SINGLE, &FloatContext::new()).is_nan());
    }

    #[test]
    fn renders_exact_decimals() {
        let f = FloatFormat::new(4, 3).unwrap();
        assert_eq!(Float::max_finite(true, f).to_string(), "-240");
        assert_eq!(Float::new(false, 0, 1, f).to_string(), "0.001953125");
        assert_eq!(Float::infinity(true, f).to_string(), "-inf");
    }
}

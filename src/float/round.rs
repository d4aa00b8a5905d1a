/*
    Floating-point rounding
*/

use rand::RngCore;
use tracing::debug;

use super::*;
use crate::quantize::{do_infinity, quantize_mantissa};
use crate::{Context, FloatContext, QuantizationMode};

// Widest mantissa handed to the quantization engine.
const MAX_WORKING_BITS: i64 = 126;

impl Float {
    // Rounds the finite value `(-1)^sign * m * 2^w` into `format`.
    pub(crate) fn round_finite<R: RngCore + ?Sized>(
        sign: bool,
        m: u128,
        w: i64,
        format: FloatFormat,
        mode: QuantizationMode,
        rng: &mut R,
    ) -> Self {
        if m == 0 {
            return Self::zero(sign, format);
        }

        let man_bits = format.man_bits() as i64;
        let bias = format.bias();
        let h = (u128::BITS - 1 - m.leading_zeros()) as i64;

        // normal results drop the leading one, subnormals keep every bit
        let (mut exp, mut man, discard) = if w + h + bias >= 1 {
            (w + h + bias, m ^ (1 << h), h - man_bits)
        } else {
            (0, m, (1 - bias - man_bits) - w)
        };

        if discard <= 0 {
            man <<= -discard;
        } else {
            let mut n = discard;
            if n > MAX_WORKING_BITS {
                // keep guard and sticky intact while narrowing the window
                let s = n - MAX_WORKING_BITS;
                man = if s >= u128::BITS as i64 {
                    (man != 0) as u128
                } else {
                    (man >> s) | (man & ((1 << s) - 1) != 0) as u128
                };
                n = MAX_WORKING_BITS;
            }
            quantize_mantissa(&mut man, &mut exp, n as u32, sign, 1 << man_bits, mode, rng);
        }

        if exp >= format.max_exponent() as i64 {
            let to_infinity = do_infinity(mode, sign);
            debug!(%format, sign, ?mode, to_infinity, "floating-point overflow");
            return if to_infinity {
                Self::infinity(sign, format)
            } else {
                Self::max_finite(sign, format)
            };
        }

        Self::new(sign, exp as u64, man as u64, format)
    }

    /// Rounds this value into `format` using the quantization mode of `ctx`.
    /// The context format is ignored.
    pub fn cast(&self, format: FloatFormat, ctx: &FloatContext) -> Self {
        self.cast_with(format, ctx.quantization, &mut ctx.rng())
    }

    pub(crate) fn cast_with<R: RngCore + ?Sized>(
        &self,
        format: FloatFormat,
        mode: QuantizationMode,
        rng: &mut R,
    ) -> Self {
        if self.is_nan() {
            Self::nan(format)
        } else if self.is_infinity() {
            Self::infinity(self.sign(), format)
        } else {
            let (sign, m, w) = self.unpack();
            Self::round_finite(sign, m, w, format, mode, rng)
        }
    }
}

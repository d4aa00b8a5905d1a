/*
    Floating-point arithmetic
*/

use rand::RngCore;
use tracing::trace;

use super::*;
use crate::{ArithmeticOperation, Context, FloatContext, Number, QuantizationMode, Result};

// Headroom kept below bit 127 when aligning addends.
const ADD_WINDOW: i64 = 124;

#[inline]
fn width(m: u128) -> i64 {
    (u128::BITS - m.leading_zeros()) as i64
}

// Aligns `m * 2^w` to `2^base`, folding shifted-out bits into bit 0.
fn align(m: u128, w: i64, base: i64) -> u128 {
    if w >= base {
        m << (w - base)
    } else {
        let s = base - w;
        if s >= u128::BITS as i64 {
            (m != 0) as u128
        } else {
            (m >> s) | (m & ((1 << s) - 1) != 0) as u128
        }
    }
}

impl Float {
    // Result format of a binary operation.
    fn result_format(&self, other: &Self, ctx: &FloatContext) -> FloatFormat {
        let format = ctx
            .format
            .unwrap_or_else(|| self.format.promote(&other.format));
        trace!(lhs = %self.format, rhs = %other.format, result = %format, "floating-point format");
        format
    }

    fn add_with<R: RngCore + ?Sized>(
        &self,
        other: &Self,
        subtract: bool,
        format: FloatFormat,
        mode: QuantizationMode,
        rng: &mut R,
    ) -> Self {
        let other_sign = other.sign() != subtract;
        if self.is_nan() || other.is_nan() {
            return Self::nan(format);
        }
        if self.is_infinity() && other.is_infinity() {
            return if self.sign() == other_sign {
                Self::infinity(other_sign, format)
            } else {
                Self::nan(format)
            };
        }
        if self.is_infinity() {
            return Self::infinity(self.sign(), format);
        }
        if other.is_infinity() {
            return Self::infinity(other_sign, format);
        }

        let (sx, mx, wx) = self.unpack();
        let (_, my, wy) = other.unpack();
        let sy = other_sign;
        match (mx == 0, my == 0) {
            (true, true) => {
                let sign = if sx == sy { sx } else { mode == QuantizationMode::ToNeg };
                return Self::zero(sign, format);
            }
            (true, false) => return Self::round_finite(sy, my, wy, format, mode, rng),
            (false, true) => return Self::round_finite(sx, mx, wx, format, mode, rng),
            (false, false) => {}
        }

        let top = (wx + width(mx)).max(wy + width(my));
        let base = wx.min(wy).max(top - ADD_WINDOW);
        let ax = align(mx, wx, base);
        let ay = align(my, wy, base);

        let (sign, m) = if sx == sy {
            (sx, ax + ay)
        } else if ax >= ay {
            (sx, ax - ay)
        } else {
            (sy, ay - ax)
        };

        if m == 0 {
            // exact cancellation
            return Self::zero(mode == QuantizationMode::ToNeg, format);
        }
        Self::round_finite(sign, m, base, format, mode, rng)
    }

    fn mul_with<R: RngCore + ?Sized>(
        &self,
        other: &Self,
        format: FloatFormat,
        mode: QuantizationMode,
        rng: &mut R,
    ) -> Self {
        let sign = self.sign() != other.sign();
        if self.is_nan() || other.is_nan() {
            Self::nan(format)
        } else if self.is_infinity() || other.is_infinity() {
            if self.is_zero() || other.is_zero() {
                Self::nan(format)
            } else {
                Self::infinity(sign, format)
            }
        } else {
            let (_, mx, wx) = self.unpack();
            let (_, my, wy) = other.unpack();
            Self::round_finite(sign, mx * my, wx + wy, format, mode, rng)
        }
    }

    fn div_with<R: RngCore + ?Sized>(
        &self,
        other: &Self,
        format: FloatFormat,
        mode: QuantizationMode,
        rng: &mut R,
    ) -> Self {
        let sign = self.sign() != other.sign();
        if self.is_nan() || other.is_nan() {
            return Self::nan(format);
        }
        match (self.is_infinity(), other.is_infinity()) {
            (true, true) => return Self::nan(format),
            (true, false) => return Self::infinity(sign, format),
            (false, true) => return Self::zero(sign, format),
            (false, false) => {}
        }
        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Self::nan(format),
            (true, false) => return Self::zero(sign, format),
            (false, true) => return Self::infinity(sign, format),
            (false, false) => {}
        }

        // scale the dividend so the quotient keeps three bits below
        // the target mantissa, then fold the remainder into a sticky bit
        let (_, mx, wx) = self.unpack();
        let (_, my, wy) = other.unpack();
        let s = (format.man_bits() as i64 + 4 + width(my) - width(mx)).max(0);
        let num = mx << s;
        let (q, r) = (num / my, num % my);
        let m = (q << 1) | (r != 0) as u128;
        Self::round_finite(sign, m, wx - wy - s - 1, format, mode, rng)
    }

    pub(crate) fn apply_with<R: RngCore + ?Sized>(
        &self,
        op: ArithmeticOperation,
        other: &Self,
        ctx: &FloatContext,
        rng: &mut R,
    ) -> Self {
        let format = self.result_format(other, ctx);
        let mode = ctx.quantization;
        match op {
            ArithmeticOperation::Add => self.add_with(other, false, format, mode, rng),
            ArithmeticOperation::Sub => self.add_with(other, true, format, mode, rng),
            ArithmeticOperation::Mul => self.mul_with(other, format, mode, rng),
            ArithmeticOperation::Div => self.div_with(other, format, mode, rng),
        }
    }

    /// Adds two values, rounding into the context format (or the promoted
    /// operand format).
    pub fn add(&self, other: &Self, ctx: &FloatContext) -> Self {
        self.apply_with(ArithmeticOperation::Add, other, ctx, &mut ctx.rng())
    }

    /// Subtracts `other` from this value.
    pub fn sub(&self, other: &Self, ctx: &FloatContext) -> Self {
        self.apply_with(ArithmeticOperation::Sub, other, ctx, &mut ctx.rng())
    }

    /// Multiplies two values.
    pub fn mul(&self, other: &Self, ctx: &FloatContext) -> Self {
        self.apply_with(ArithmeticOperation::Mul, other, ctx, &mut ctx.rng())
    }

    /// Divides this value by `other`. Division by zero gives a signed
    /// infinity, or NaN for `0/0`.
    pub fn div(&self, other: &Self, ctx: &FloatContext) -> Self {
        self.apply_with(ArithmeticOperation::Div, other, ctx, &mut ctx.rng())
    }

    /// Flips the sign, rounding into the context format if one is set.
    pub fn neg(&self, ctx: &FloatContext) -> Self {
        let negated = Self { data: FloatData { sign: !self.sign(), ..self.data }, ..*self };
        match ctx.format {
            Some(format) => negated.cast_with(format, ctx.quantization, &mut ctx.rng()),
            None => negated,
        }
    }

    /// Clears the sign, rounding into the context format if one is set.
    pub fn abs(&self, ctx: &FloatContext) -> Self {
        let positive = Self { data: FloatData { sign: false, ..self.data }, ..*self };
        match ctx.format {
            Some(format) => positive.cast_with(format, ctx.quantization, &mut ctx.rng()),
            None => positive,
        }
    }
}

impl Number for Float {
    type Ctx = FloatContext;

    fn is_zero(&self) -> bool {
        Float::is_zero(self)
    }

    fn is_infinity(&self) -> bool {
        Float::is_infinity(self)
    }

    fn is_nan(&self) -> bool {
        Float::is_nan(self)
    }

    fn is_finite(&self) -> bool {
        Float::is_finite(self)
    }

    fn neg(&self, ctx: &Self::Ctx) -> Self {
        Float::neg(self, ctx)
    }

    fn abs(&self, ctx: &Self::Ctx) -> Self {
        Float::abs(self, ctx)
    }

    fn add(&self, other: &Self, ctx: &Self::Ctx) -> Self {
        Float::add(self, other, ctx)
    }

    fn sub(&self, other: &Self, ctx: &Self::Ctx) -> Self {
        Float::sub(self, other, ctx)
    }

    fn mul(&self, other: &Self, ctx: &Self::Ctx) -> Self {
        Float::mul(self, other, ctx)
    }

    fn div(&self, other: &Self, ctx: &Self::Ctx) -> Result<Self> {
        Ok(Float::div(self, other, ctx))
    }

    fn apply<R: RngCore + ?Sized>(
        &self,
        op: ArithmeticOperation,
        other: &Self,
        ctx: &Self::Ctx,
        rng: &mut R,
    ) -> Result<Self> {
        Ok(self.apply_with(op, other, ctx, rng))
    }

    fn to_f64(&self) -> f64 {
        Float::to_f64(self)
    }
}

/*
    Fixed-point arithmetic
*/

use rand::RngCore;

use super::*;
use crate::{ArithmeticOperation, Context, Error, FixedContext, Number, OverflowMode, QuantizationMode, Result};

// Exact operations
impl Fixed {
    pub(crate) fn add_exact(&self, other: &Self) -> Self {
        self.add_sub_exact(other, false)
    }

    pub(crate) fn sub_exact(&self, other: &Self) -> Self {
        self.add_sub_exact(other, true)
    }

    fn add_sub_exact(&self, other: &Self, subtract: bool) -> Self {
        let format = self.format.add_format(&other.format);
        let mut lhs = self.aligned(&format);
        let rhs = other.aligned(&format);
        if subtract {
            limb::sub_assign(&mut lhs, &rhs);
        } else {
            limb::add_assign(&mut lhs, &rhs);
        }
        Self::from_raw(lhs, format)
    }

    pub(crate) fn mul_exact(&self, other: &Self) -> Self {
        let format = self.format.mul_format(&other.format);
        let mut product = limb::mul(&limb::abs(&self.data), &limb::abs(&other.data));
        if self.is_negative() != other.is_negative() {
            limb::negate_in_place(&mut product);
        }
        Self::from_raw(product, format)
    }

    pub(crate) fn neg_exact(&self) -> Self {
        let format = self.format.neg_format();
        let mut data = limb::sign_extend(&self.data, format.limbs());
        limb::negate_in_place(&mut data);
        Self::from_raw(data, format)
    }

    pub(crate) fn abs_exact(&self) -> Self {
        let format = self.format.neg_format();
        let data = limb::sign_extend(&self.data, format.limbs());
        Self::from_raw(limb::abs(&data), format)
    }

    // Quotient rounded into `target`. The magnitude quotient is computed
    // with two bits below the target precision plus a sticky bit for the
    // remainder, then the signed result is requantized.
    pub(crate) fn div_with<R: RngCore + ?Sized>(
        &self,
        other: &Self,
        target: FixedFormat,
        mode: QuantizationMode,
        overflow: OverflowMode,
        rng: &mut R,
    ) -> Result<Self> {
        if other.is_zero() {
            return Err(Error::DivisionByZero);
        }

        let (fa, fb, f) = (self.frac_bits(), other.frac_bits(), target.frac_bits());
        let extra = (fa - fb - f).max(2);
        let shift = (f + extra + fb - fa) as usize;

        let num = limb::abs(&self.data);
        let den = limb::abs(&other.data);
        let width = limb::unsigned_width(&num) + shift + 2;
        let mut shifted = num;
        shifted.resize(limb::bits_to_limbs(width), 0);
        limb::logical_shift_left(&mut shifted, shift);

        let (mut quotient, rem) = limb::divrem(&shifted, &den);
        limb::logical_shift_left(&mut quotient, 1);
        quotient[0] |= !limb::is_zero(&rem) as Limb;
        if self.is_negative() != other.is_negative() {
            limb::negate_in_place(&mut quotient);
        }

        let bits = limb::LIMB_BITS * quotient.len();
        let format = FixedFormat::raw(bits, bits as i64 - (f + extra + 1));
        let exact = Self::from_raw(quotient, format);
        Ok(exact.cast_with(target, mode, overflow, rng))
    }

    // Fits an exact result into the context format, if there is one.
    fn fit<R: RngCore + ?Sized>(exact: Self, ctx: &FixedContext, rng: &mut R) -> Self {
        match ctx.format {
            Some(format) => exact.cast_with(format, ctx.quantization, ctx.overflow, rng),
            None => exact,
        }
    }

    pub(crate) fn apply_with<R: RngCore + ?Sized>(
        &self,
        op: ArithmeticOperation,
        other: &Self,
        ctx: &FixedContext,
        rng: &mut R,
    ) -> Result<Self> {
        let exact = match op {
            ArithmeticOperation::Add => self.add_exact(other),
            ArithmeticOperation::Sub => self.sub_exact(other),
            ArithmeticOperation::Mul => self.mul_exact(other),
            ArithmeticOperation::Div => {
                let target = ctx
                    .format
                    .unwrap_or_else(|| self.format.div_format(&other.format));
                return self.div_with(other, target, ctx.quantization, ctx.overflow, rng);
            }
        };
        Ok(Self::fit(exact, ctx, rng))
    }
}

// Rounded operations
impl Fixed {
    /// Adds two values. The sum is exact unless the context forces a format.
    pub fn add(&self, other: &Self, ctx: &FixedContext) -> Self {
        Self::fit(self.add_exact(other), ctx, &mut ctx.rng())
    }

    /// Subtracts `other` from this value. Exact unless the context forces a format.
    pub fn sub(&self, other: &Self, ctx: &FixedContext) -> Self {
        Self::fit(self.sub_exact(other), ctx, &mut ctx.rng())
    }

    /// Multiplies two values. Exact unless the context forces a format.
    pub fn mul(&self, other: &Self, ctx: &FixedContext) -> Self {
        Self::fit(self.mul_exact(other), ctx, &mut ctx.rng())
    }

    /// Divides this value by `other`.
    ///
    /// The quotient is always quantized, into the context format if there
    /// is one and into `div_format` otherwise.
    pub fn div(&self, other: &Self, ctx: &FixedContext) -> Result<Self> {
        self.apply_with(ArithmeticOperation::Div, other, ctx, &mut ctx.rng())
    }

    /// Negates this value, widening by one integer bit.
    pub fn neg(&self, ctx: &FixedContext) -> Self {
        Self::fit(self.neg_exact(), ctx, &mut ctx.rng())
    }

    /// Absolute value, widening by one integer bit.
    pub fn abs(&self, ctx: &FixedContext) -> Self {
        Self::fit(self.abs_exact(), ctx, &mut ctx.rng())
    }
}

impl Number for Fixed {
    type Ctx = FixedContext;

    fn is_zero(&self) -> bool {
        Fixed::is_zero(self)
    }

    fn is_infinity(&self) -> bool {
        false
    }

    fn is_nan(&self) -> bool {
        false
    }

    fn is_finite(&self) -> bool {
        true
    }

    fn neg(&self, ctx: &Self::Ctx) -> Self {
        Fixed::neg(self, ctx)
    }

    fn abs(&self, ctx: &Self::Ctx) -> Self {
        Fixed::abs(self, ctx)
    }

    fn add(&self, other: &Self, ctx: &Self::Ctx) -> Self {
        Fixed::add(self, other, ctx)
    }

    fn sub(&self, other: &Self, ctx: &Self::Ctx) -> Self {
        Fixed::sub(self, other, ctx)
    }

    fn mul(&self, other: &Self, ctx: &Self::Ctx) -> Self {
        Fixed::mul(self, other, ctx)
    }

    fn div(&self, other: &Self, ctx: &Self::Ctx) -> Result<Self> {
        Fixed::div(self, other, ctx)
    }

    fn apply<R: RngCore + ?Sized>(
        &self,
        op: ArithmeticOperation,
        other: &Self,
        ctx: &Self::Ctx,
        rng: &mut R,
    ) -> Result<Self> {
        self.apply_with(op, other, ctx, rng)
    }

    fn to_f64(&self) -> f64 {
        Fixed::to_f64(self)
    }
}

/*
    Scalar number interface
*/

use rand::RngCore;

use crate::{ArithmeticOperation, Context, Result};

/// A custom-precision scalar.
///
/// Implemented by `Fixed` and `Float` so that the array layer can drive
/// either one element at a time. Every operation takes an explicit
/// rounding context; no operation reads ambient state.
pub trait Number: Clone {
    /// Rounding configuration for this scalar type.
    type Ctx: Context;

    /// True for a (signed) zero.
    fn is_zero(&self) -> bool;

    /// True for a signed infinity. Always false for fixed-point.
    fn is_infinity(&self) -> bool;

    /// True for a NaN. Always false for fixed-point.
    fn is_nan(&self) -> bool;

    /// True unless the value is an infinity or a NaN.
    fn is_finite(&self) -> bool;

    /// The negated value, fitted to `ctx`.
    fn neg(&self, ctx: &Self::Ctx) -> Self;

    /// The magnitude, fitted to `ctx`.
    fn abs(&self, ctx: &Self::Ctx) -> Self;

    /// Sum of two scalars, fitted to `ctx`.
    fn add(&self, other: &Self, ctx: &Self::Ctx) -> Self;

    /// Difference `self - other`, fitted to `ctx`.
    fn sub(&self, other: &Self, ctx: &Self::Ctx) -> Self;

    /// Product of two scalars, fitted to `ctx`.
    fn mul(&self, other: &Self, ctx: &Self::Ctx) -> Self;

    /// Quotient `self / other`, fitted to `ctx`. Fails for a zero
    /// fixed-point divisor.
    fn div(&self, other: &Self, ctx: &Self::Ctx) -> Result<Self>;

    /// Applies `op`, drawing any stochastic rounding decisions from `rng`
    /// so that a caller can share one random source across many operations.
    fn apply<R: RngCore + ?Sized>(
        &self,
        op: ArithmeticOperation,
        other: &Self,
        ctx: &Self::Ctx,
        rng: &mut R,
    ) -> Result<Self>;

    /// Converts to the nearest `f64`, ties to even.
    fn to_f64(&self) -> f64;
}

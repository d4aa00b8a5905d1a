/*
    Fixed-point conversions
*/

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::One;

use super::*;
use crate::float::{Float, FloatFormat};
use crate::{FixedContext, FloatContext, Result};

impl Fixed {
    /// Builds a value from its two's-complement bit pattern, read as an
    /// integer scaled by `2^-frac_bits`. Bits above `format.bits()` wrap.
    pub fn from_bits(value: &BigInt, format: FixedFormat) -> Self {
        let fill = if value.sign() == Sign::Minus { 0xFF } else { 0 };
        let mut bytes = value.to_signed_bytes_le();
        bytes.resize(format.limbs() * 8, fill);
        let data = bytes
            .chunks_exact(8)
            .map(|chunk| {
                let mut word = [0; 8];
                word.copy_from_slice(chunk);
                Limb::from_le_bytes(word)
            })
            .collect();
        Self::from_raw(data, format)
    }

    /// The stored bits as an unsigned integer of `bits()` bits.
    pub fn to_bits(&self) -> BigUint {
        let mask = (BigUint::one() << self.bits()) - 1u32;
        BigUint::from_bytes_le(&self.le_bytes()) & mask
    }

    /// The stored bits as a signed integer, i.e. the value times `2^frac_bits`.
    pub fn to_bigint(&self) -> BigInt {
        BigInt::from_signed_bytes_le(&self.le_bytes())
    }

    fn le_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|l| l.to_le_bytes()).collect()
    }

    /// Converts a double into `format`, quantizing and handling overflow
    /// according to `ctx`. NaN and infinities are rejected.
    pub fn from_f64(value: f64, format: FixedFormat, ctx: &FixedContext) -> Result<Self> {
        let exact = Float::from_f64(value, FloatFormat::DOUBLE, &FloatContext::new()).to_fixed()?;
        Ok(exact.cast(format, ctx))
    }

    /// Converts to the nearest double, ties to even.
    pub fn to_f64(&self) -> f64 {
        Float::from_fixed(self, FloatFormat::DOUBLE, &FloatContext::new()).to_f64()
    }
}

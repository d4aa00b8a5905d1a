/*
    Fixed-point casting
*/

use bitvec::prelude::Lsb0;
use bitvec::view::BitView;
use rand::RngCore;
use tracing::debug;

use super::*;
use crate::quantize::quantize_limbs;
use crate::{Context, FixedContext, OverflowMode, QuantizationMode};

impl Fixed {
    /// Requantizes this value into `format` using the quantization and
    /// overflow modes of `ctx`. The context format is ignored.
    pub fn cast(&self, format: FixedFormat, ctx: &FixedContext) -> Self {
        self.cast_with(format, ctx.quantization, ctx.overflow, &mut ctx.rng())
    }

    pub(crate) fn cast_with<R: RngCore + ?Sized>(
        &self,
        format: FixedFormat,
        mode: QuantizationMode,
        overflow: OverflowMode,
        rng: &mut R,
    ) -> Self {
        if format == self.format {
            return self.clone();
        }

        // move the binary point to the target position
        let shift = format.frac_bits() - self.frac_bits();
        let data = if shift >= 0 {
            let shift = shift as usize;
            let mut data = limb::sign_extend(&self.data, limb::bits_to_limbs(self.bits() + shift + 1));
            limb::logical_shift_left(&mut data, shift);
            data
        } else {
            let mut data = self.data.clone();
            quantize_limbs(&mut data, shift.unsigned_abs() as usize, mode, rng);
            data
        };

        Self {
            format,
            data: Self::overflow(data, format.bits(), overflow),
        }
    }

    // Fits a two's-complement vector into `bits` bits under `mode`.
    fn overflow(data: Vec<Limb>, bits: usize, mode: OverflowMode) -> Vec<Limb> {
        if limb::fits_in_bits(&data, bits) {
            return limb::truncate(&data, bits);
        }

        let negative = limb::is_negative(&data);
        debug!(bits, negative, ?mode, "fixed-point overflow");
        match mode {
            OverflowMode::Wrap => limb::truncate(&data, bits),
            OverflowMode::Saturate if negative => limb::min_value(bits),
            OverflowMode::Saturate => limb::max_value(bits),
            OverflowMode::NumericStd => {
                let mut result = limb::truncate(&data, bits);
                result.view_bits_mut::<Lsb0>().set(bits - 1, negative);
                limb::normalize(&mut result, bits);
                result
            }
        }
    }
}

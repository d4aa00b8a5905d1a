/*
    Rounding configuration
*/

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::fixed::FixedFormat;
use crate::float::FloatFormat;

/// Quantization (rounding) modes applied when bits are discarded.
///
/// `Ties*` modes round to nearest and differ only on exact ties,
/// `To*` modes are directed truncations, the `Jam` modes force the least
/// significant kept bit to one, and the `Stoch*` modes round randomly.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuantizationMode {
    /// Round to nearest, ties to even.
    #[default]
    TiesEven,
    /// Round to nearest, ties to odd.
    TiesOdd,
    /// Round to nearest, ties away from zero.
    TiesAway,
    /// Round to nearest, ties toward zero.
    TiesZero,
    /// Round to nearest, ties toward positive infinity.
    TiesPos,
    /// Round to nearest, ties toward negative infinity.
    TiesNeg,
    /// Truncate toward zero.
    ToZero,
    /// Truncate toward negative infinity.
    ToNeg,
    /// Truncate toward positive infinity.
    ToPos,
    /// Truncate away from zero.
    ToAway,
    /// Magnitude truncation: add the sign bit to the least significant bit.
    TrnMag,
    /// Force the least significant kept bit to one.
    Jam,
    /// Force the least significant kept bit to one, unless the value is exact.
    JamUnbiased,
    /// Round up with probability equal to the discarded fraction.
    StochWeighted,
    /// Round up with probability one half, unless the value is exact.
    StochEqual,
}

impl QuantizationMode {
    /// Every mode, in declaration order.
    pub const ALL: [QuantizationMode; 15] = [
        QuantizationMode::TiesEven,
        QuantizationMode::TiesOdd,
        QuantizationMode::TiesAway,
        QuantizationMode::TiesZero,
        QuantizationMode::TiesPos,
        QuantizationMode::TiesNeg,
        QuantizationMode::ToZero,
        QuantizationMode::ToNeg,
        QuantizationMode::ToPos,
        QuantizationMode::ToAway,
        QuantizationMode::TrnMag,
        QuantizationMode::Jam,
        QuantizationMode::JamUnbiased,
        QuantizationMode::StochWeighted,
        QuantizationMode::StochEqual,
    ];

    /// Returns true for the two randomized modes.
    pub fn is_stochastic(&self) -> bool {
        matches!(
            self,
            QuantizationMode::StochWeighted | QuantizationMode::StochEqual
        )
    }
}

/// Policy applied when a fixed-point result does not fit its format.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverflowMode {
    /// Two's-complement wrap-around.
    #[default]
    Wrap,
    /// Clamp to the most positive or most negative value.
    Saturate,
    /// Keep the sign bit and wrap the remaining bits.
    NumericStd,
}

/// Rounding configuration passed explicitly to every arithmetic entry point.
///
/// Each operation computes an exact (or sticky-widened) intermediate and
/// then quantizes it into the result format; a `Context` says how that
/// last step discards bits.
pub trait Context: Sized {
    /// The quantization mode used when bits are discarded.
    fn quantization(&self) -> QuantizationMode;

    /// Seed for the stochastic modes, if reproducibility is wanted.
    fn seed(&self) -> Option<u64>;

    /// A fresh random source for one operation.
    fn rng(&self) -> OperationRng {
        OperationRng::new(self.seed())
    }
}

/// Rounding context for fixed-point operations.
///
/// Without an explicit `format`, arithmetic returns its exact result
/// (except division, which always quantizes).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedContext {
    pub(crate) quantization: QuantizationMode,
    pub(crate) overflow: OverflowMode,
    pub(crate) format: Option<FixedFormat>,
    pub(crate) seed: Option<u64>,
}

impl FixedContext {
    /// Creates a context that truncates (toward negative infinity),
    /// wraps on overflow and keeps exact result formats.
    pub fn new() -> Self {
        Self {
            quantization: QuantizationMode::ToNeg,
            overflow: OverflowMode::Wrap,
            format: None,
            seed: None,
        }
    }

    /// Sets the quantization mode.
    pub fn quantization_mode(mut self, quantization: QuantizationMode) -> Self {
        self.quantization = quantization;
        self
    }

    /// Sets the overflow mode.
    pub fn overflow_mode(mut self, overflow: OverflowMode) -> Self {
        self.overflow = overflow;
        self
    }

    /// Forces every result into `format`.
    pub fn format(mut self, format: FixedFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Seeds the random source of the stochastic modes.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the overflow mode.
    pub fn overflow(&self) -> OverflowMode {
        self.overflow
    }

    /// Returns the forced result format, if any.
    pub fn result_format(&self) -> Option<FixedFormat> {
        self.format
    }
}

impl Context for FixedContext {
    fn quantization(&self) -> QuantizationMode {
        self.quantization
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for FixedContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Rounding context for floating-point operations.
///
/// Without an explicit `format`, results use the widest exponent and
/// mantissa of the operands with an IEEE-like bias.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatContext {
    pub(crate) quantization: QuantizationMode,
    pub(crate) format: Option<FloatFormat>,
    pub(crate) seed: Option<u64>,
}

impl FloatContext {
    /// Creates a context rounding to nearest, ties to even.
    pub fn new() -> Self {
        Self {
            quantization: QuantizationMode::TiesEven,
            format: None,
            seed: None,
        }
    }

    /// Sets the quantization mode.
    pub fn quantization_mode(mut self, quantization: QuantizationMode) -> Self {
        self.quantization = quantization;
        self
    }

    /// Forces every result into `format`.
    pub fn format(mut self, format: FloatFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Seeds the random source of the stochastic modes.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the forced result format, if any.
    pub fn result_format(&self) -> Option<FloatFormat> {
        self.format
    }
}

impl Context for FloatContext {
    fn quantization(&self) -> QuantizationMode {
        self.quantization
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for FloatContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Random source owned by a single operation.
///
/// The generator is only created on first use, so deterministic modes
/// never touch the entropy source.
#[derive(Debug)]
pub struct OperationRng {
    seed: Option<u64>,
    rng: Option<StdRng>,
}

impl OperationRng {
    /// Creates a random source, seeded when `seed` is given.
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed, rng: None }
    }

    fn inner(&mut self) -> &mut StdRng {
        let seed = self.seed;
        self.rng.get_or_insert_with(|| match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        })
    }
}

impl RngCore for OperationRng {
    fn next_u32(&mut self) -> u32 {
        self.inner().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner().next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner().fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner().try_fill_bytes(dest)
    }
}

/*
    Quantization engine

    Decides the round-increment bit from the guard bit, the sticky bit and
    a `QuantizationMode`, then applies it to either a sign-magnitude
    mantissa (floating-point) or a two's-complement limb vector
    (fixed-point).
*/

use bitvec::prelude::Lsb0;
use bitvec::view::BitView;
use rand::{Rng, RngCore};

use crate::limb::{self, Limb};
use crate::QuantizationMode;

// What to do with the kept bits once the discarded bits are known.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Rule {
    Increment(bool),
    Jam,
    StochasticWeighted,
    StochasticEqual,
}

// Rounding rule for a magnitude `|x|` with a separate sign.
fn sign_magnitude_rule(
    mode: QuantizationMode,
    sign: bool,
    lsb: bool,
    guard: bool,
    sticky: bool,
) -> Rule {
    let inexact = guard || sticky;
    match mode {
        QuantizationMode::TiesEven => Rule::Increment(guard && (lsb || sticky)),
        QuantizationMode::TiesOdd => Rule::Increment(guard && (!lsb || sticky)),
        QuantizationMode::TiesAway => Rule::Increment(guard),
        QuantizationMode::TiesZero => Rule::Increment(guard && sticky),
        QuantizationMode::TiesPos => Rule::Increment(guard && (sticky || !sign)),
        QuantizationMode::TiesNeg => Rule::Increment(guard && (sticky || sign)),
        QuantizationMode::ToZero => Rule::Increment(false),
        QuantizationMode::ToNeg => Rule::Increment(sign && inexact),
        QuantizationMode::ToPos => Rule::Increment(!sign && inexact),
        QuantizationMode::ToAway => Rule::Increment(inexact),
        QuantizationMode::TrnMag => Rule::Increment(sign),
        QuantizationMode::Jam => Rule::Jam,
        QuantizationMode::JamUnbiased if inexact => Rule::Jam,
        QuantizationMode::JamUnbiased => Rule::Increment(false),
        QuantizationMode::StochWeighted => Rule::StochasticWeighted,
        QuantizationMode::StochEqual if inexact => Rule::StochasticEqual,
        QuantizationMode::StochEqual => Rule::Increment(false),
    }
}

// Rounding rule for a two's-complement value whose kept part is
// `floor(x / 2^n)`; an increment moves toward positive infinity.
fn twos_complement_rule(
    mode: QuantizationMode,
    sign: bool,
    lsb: bool,
    guard: bool,
    sticky: bool,
) -> Rule {
    let inexact = guard || sticky;
    match mode {
        QuantizationMode::TiesEven => Rule::Increment(guard && (lsb || sticky)),
        QuantizationMode::TiesOdd => Rule::Increment(guard && (!lsb || sticky)),
        QuantizationMode::TiesAway => Rule::Increment(guard && (sticky || !sign)),
        QuantizationMode::TiesZero => Rule::Increment(guard && (sticky || sign)),
        QuantizationMode::TiesPos => Rule::Increment(guard),
        QuantizationMode::TiesNeg => Rule::Increment(guard && sticky),
        QuantizationMode::ToZero => Rule::Increment(sign && inexact),
        QuantizationMode::ToNeg => Rule::Increment(false),
        QuantizationMode::ToPos => Rule::Increment(inexact),
        QuantizationMode::ToAway => Rule::Increment(!sign && inexact),
        QuantizationMode::TrnMag => Rule::Increment(sign),
        QuantizationMode::Jam => Rule::Jam,
        QuantizationMode::JamUnbiased if inexact => Rule::Jam,
        QuantizationMode::JamUnbiased => Rule::Increment(false),
        QuantizationMode::StochWeighted => Rule::StochasticWeighted,
        QuantizationMode::StochEqual if inexact => Rule::StochasticEqual,
        QuantizationMode::StochEqual => Rule::Increment(false),
    }
}

/// Quantizes a floating-point mantissa (without its hidden bit) by
/// discarding its `bits_to_quantize` least significant bits.
///
/// If rounding carries into `man_msb`, the mantissa becomes zero and
/// `exp` is incremented: the result is the next power of two.
/// Nothing happens when no bits are discarded.
pub fn quantize_mantissa<R: RngCore + ?Sized>(
    man: &mut u128,
    exp: &mut i64,
    bits_to_quantize: u32,
    sign: bool,
    man_msb: u128,
    mode: QuantizationMode,
    rng: &mut R,
) {
    let n = bits_to_quantize;
    if n == 0 {
        return;
    }
    debug_assert!(n < u128::BITS, "cannot discard {} mantissa bits", n);

    let guard = (*man >> (n - 1)) & 1 != 0;
    let sticky = *man & ((1 << (n - 1)) - 1) != 0;
    let mut res = *man >> n;

    let increment = match sign_magnitude_rule(mode, sign, res & 1 != 0, guard, sticky) {
        Rule::Increment(b) => b,
        Rule::Jam => {
            res |= 1;
            false
        }
        Rule::StochasticWeighted => {
            // discarded + weight < 2^(n+1) never overflows for n < 128
            let mask = (1 << n) - 1;
            let weight = rng.gen::<u128>() & mask;
            ((*man & mask) + weight) >> n != 0
        }
        Rule::StochasticEqual => rng.gen::<bool>(),
    };

    res += increment as u128;
    if res & man_msb != 0 {
        *exp += 1;
        res = 0;
    }
    *man = res;
}

/// Quantizes a two's-complement limb vector by discarding its `n` least
/// significant bits, leaving the result right-aligned in the same vector.
///
/// The result is `floor(x / 2^n) + B` (or the jammed floor), which always
/// fits in the vector when `n >= 1`.
pub fn quantize_limbs<R: RngCore + ?Sized>(
    limbs: &mut [Limb],
    n: usize,
    mode: QuantizationMode,
    rng: &mut R,
) {
    if n == 0 || limbs.is_empty() {
        return;
    }

    let sign = limb::is_negative(limbs);
    let view = limb::bits(limbs);
    let width = view.len();
    let bit = |i: usize| if i < width { view[i] } else { sign };
    let guard = bit(n - 1);
    let sticky = view[..(n - 1).min(width)].any() || (n - 1 > width && sign);
    let rule = twos_complement_rule(mode, sign, bit(n), guard, sticky);

    let increment = match rule {
        Rule::Increment(b) => b,
        Rule::Jam => false,
        Rule::StochasticWeighted => stochastic_carry(limbs, n, rng),
        Rule::StochasticEqual => rng.gen::<bool>(),
    };

    limb::arithmetic_shift_right(limbs, n);
    if rule == Rule::Jam {
        limbs[0] |= 1;
    }
    if increment {
        limb::add_pow2(limbs, 0);
    }
}

// Carry out of the low `n` bits when a uniform `n`-bit sample is added.
fn stochastic_carry<R: RngCore + ?Sized>(limbs: &[Limb], n: usize, rng: &mut R) -> bool {
    let len = limb::bits_to_limbs(n + 1);
    let mut discarded = limb::sign_extend(limbs, len);
    let mut weight: Vec<Limb> = (0..len).map(|_| rng.next_u64()).collect();
    discarded.view_bits_mut::<Lsb0>()[n..].fill(false);
    weight.view_bits_mut::<Lsb0>()[n..].fill(false);
    limb::add_assign(&mut discarded, &weight);
    limb::bits(&discarded)[n]
}

/// Returns true if a floating-point overflow under `mode` should produce
/// an infinity, and false if it should saturate to the largest finite value.
pub fn do_infinity(mode: QuantizationMode, sign: bool) -> bool {
    match mode {
        QuantizationMode::ToZero | QuantizationMode::Jam | QuantizationMode::JamUnbiased => false,
        QuantizationMode::ToNeg => sign,
        QuantizationMode::ToPos => !sign,
        QuantizationMode::TiesEven
        | QuantizationMode::TiesOdd
        | QuantizationMode::TiesAway
        | QuantizationMode::TiesZero
        | QuantizationMode::TiesPos
        | QuantizationMode::TiesNeg
        | QuantizationMode::ToAway
        | QuantizationMode::TrnMag
        | QuantizationMode::StochWeighted
        | QuantizationMode::StochEqual => true,
    }
}

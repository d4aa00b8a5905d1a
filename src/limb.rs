/*
    Limb vectors

    Arbitrary-width two's-complement integers stored as little-limb-first
    sequences of machine words. The vector is not self-describing: callers
    track the intended bit-width themselves.
*/

use std::cmp::Ordering;

use bitvec::prelude::{BitSlice, Lsb0};
use bitvec::view::BitView;
use num_integer::Integer;

mod shift;

pub use shift::*;

/// A single storage word of an arbitrary-width integer.
pub type Limb = u64;

/// Bitwidth of a `Limb`.
pub const LIMB_BITS: usize = Limb::BITS as usize;

/// Number of packed BCD digits held by one `Limb`.
pub const NIBBLES_PER_LIMB: usize = LIMB_BITS / 4;

/// Returns the number of limbs required to store `bits` bits.
#[inline]
pub fn bits_to_limbs(bits: usize) -> usize {
    Integer::div_ceil(&bits, &LIMB_BITS)
}

/// Returns a bit-level view of a limb vector, least significant bit first.
#[inline]
pub fn bits(vec: &[Limb]) -> &BitSlice<Limb, Lsb0> {
    vec.view_bits::<Lsb0>()
}

/// Returns `1 + floor(log2(x))` for a non-zero `x`, and zero otherwise.
#[inline]
pub fn bit_width(x: Limb) -> usize {
    LIMB_BITS - x.leading_zeros() as usize
}

/// Returns the number of nibbles needed to hold the significant bits of `x`.
#[inline]
pub fn nibble_width(x: Limb) -> usize {
    Integer::div_ceil(&bit_width(x), &4)
}

/// Returns the index one past the most significant non-zero limb.
pub fn significant_limbs(vec: &[Limb]) -> usize {
    vec.iter().rposition(|&l| l != 0).map_or(0, |i| i + 1)
}

/// Counts the zero bits above the most significant set bit.
/// An all-zero vector reports `LIMB_BITS * vec.len()`.
pub fn leading_zeros(vec: &[Limb]) -> usize {
    match vec.iter().rposition(|&l| l != 0) {
        Some(i) => LIMB_BITS * (vec.len() - i) - bit_width(vec[i]),
        None => LIMB_BITS * vec.len(),
    }
}

/// Number of significant bits when `vec` is read as an unsigned integer.
#[inline]
pub fn unsigned_width(vec: &[Limb]) -> usize {
    LIMB_BITS * vec.len() - leading_zeros(vec)
}

/// Returns true if every limb is zero.
#[inline]
pub fn is_zero(vec: &[Limb]) -> bool {
    vec.iter().all(|&l| l == 0)
}

/// Returns true if the top bit of the last limb is set.
#[inline]
pub fn is_negative(vec: &[Limb]) -> bool {
    vec.last().map_or(false, |&l| l >> (LIMB_BITS - 1) != 0)
}

/// Two's-complement negation. `result.len() == src.len()`.
pub fn negate(src: &[Limb]) -> Vec<Limb> {
    let mut result = src.to_vec();
    negate_in_place(&mut result);
    result
}

/// Two's-complement negation in place; the most negative value wraps onto itself.
pub fn negate_in_place(vec: &mut [Limb]) {
    let mut carry = true;
    for limb in vec.iter_mut() {
        let (sum, c) = (!*limb).overflowing_add(carry as Limb);
        *limb = sum;
        carry = c;
    }
}

/// Two's-complement absolute value. `result.len() == src.len()`.
///
/// The most negative representable value is returned unchanged, which is
/// still its correct magnitude when the result is read as unsigned.
pub fn abs(src: &[Limb]) -> Vec<Limb> {
    if is_negative(src) {
        negate(src)
    } else {
        src.to_vec()
    }
}

/// Adds `2^n` to `vec` in place and returns the carry out of the top limb.
pub fn add_pow2(vec: &mut [Limb], n: usize) -> bool {
    assert!(
        n < LIMB_BITS * vec.len(),
        "power-of-two {} outside of a {}-bit limb vector",
        n,
        LIMB_BITS * vec.len()
    );
    let mut carry = 1 << (n % LIMB_BITS);
    for limb in vec[n / LIMB_BITS..].iter_mut() {
        let (sum, c) = limb.overflowing_add(carry);
        *limb = sum;
        if !c {
            return false;
        }
        carry = 1;
    }
    true
}

/// `a += b` over `a.len()` limbs, returning the carry out.
/// Requires `a.len() >= b.len()`.
pub fn add_assign(a: &mut [Limb], b: &[Limb]) -> bool {
    debug_assert!(a.len() >= b.len());
    let mut carry = false;
    for (i, limb) in a.iter_mut().enumerate() {
        let rhs = b.get(i).copied().unwrap_or(0);
        if rhs == 0 && !carry && i >= b.len() {
            break;
        }
        let (s1, c1) = limb.overflowing_add(rhs);
        let (s2, c2) = s1.overflowing_add(carry as Limb);
        *limb = s2;
        carry = c1 || c2;
    }
    carry
}

/// `a -= b` over `a.len()` limbs, returning the borrow out.
/// Requires `a.len() >= b.len()`.
pub fn sub_assign(a: &mut [Limb], b: &[Limb]) -> bool {
    debug_assert!(a.len() >= b.len());
    let mut borrow = false;
    for (i, limb) in a.iter_mut().enumerate() {
        let rhs = b.get(i).copied().unwrap_or(0);
        let (d1, b1) = limb.overflowing_sub(rhs);
        let (d2, b2) = d1.overflowing_sub(borrow as Limb);
        *limb = d2;
        borrow = b1 || b2;
    }
    borrow
}

/// Unsigned schoolbook multiplication; the product has `a.len() + b.len()` limbs.
pub fn mul(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    let mut result = vec![0; a.len() + b.len()];
    for (i, &x) in a.iter().enumerate() {
        if x == 0 {
            continue;
        }
        let mut carry: u128 = 0;
        for (j, &y) in b.iter().enumerate() {
            let t = (x as u128) * (y as u128) + (result[i + j] as u128) + carry;
            result[i + j] = t as Limb;
            carry = t >> LIMB_BITS;
        }
        result[i + b.len()] = carry as Limb;
    }
    result
}

/// Multiplies the unsigned vector by a single limb in place, returning the high limb.
pub fn mul_small(vec: &mut [Limb], m: Limb) -> Limb {
    let mut carry: u128 = 0;
    for limb in vec.iter_mut() {
        let t = (*limb as u128) * (m as u128) + carry;
        *limb = t as Limb;
        carry = t >> LIMB_BITS;
    }
    carry as Limb
}

/// Compares two vectors as unsigned integers, regardless of their lengths.
pub fn cmp_unsigned(a: &[Limb], b: &[Limb]) -> Ordering {
    let (la, lb) = (significant_limbs(a), significant_limbs(b));
    la.cmp(&lb)
        .then_with(|| a[..la].iter().rev().cmp(b[..lb].iter().rev()))
}

/// Unsigned long division. Returns `(quotient, remainder)` with
/// `quotient.len() == num.len()` and `remainder.len() == den.len()`.
pub fn divrem(num: &[Limb], den: &[Limb]) -> (Vec<Limb>, Vec<Limb>) {
    assert!(!is_zero(den), "limb vector division by zero");
    let mut quotient = vec![0; num.len()];
    let mut rem = vec![0; den.len() + 1];
    let num_bits = bits(num);
    for i in (0..unsigned_width(num)).rev() {
        logical_shift_left(&mut rem, 1);
        rem[0] |= num_bits[i] as Limb;
        if cmp_unsigned(&rem, den) != Ordering::Less {
            sub_assign(&mut rem, den);
            quotient[i / LIMB_BITS] |= 1 << (i % LIMB_BITS);
        }
    }
    rem.truncate(den.len());
    (quotient, rem)
}

/// Copies `src` into `limbs` limbs, sign-extending or truncating as needed.
pub fn sign_extend(src: &[Limb], limbs: usize) -> Vec<Limb> {
    let fill = if is_negative(src) { Limb::MAX } else { 0 };
    let mut result: Vec<Limb> = src.iter().copied().take(limbs).collect();
    result.resize(limbs, fill);
    result
}

/// Sign-extends bit `bits - 1` through the rest of the vector.
pub fn normalize(vec: &mut [Limb], bits: usize) {
    debug_assert!(bits >= 1 && bits <= LIMB_BITS * vec.len());
    let top = (bits - 1) / LIMB_BITS;
    let spare = LIMB_BITS * (top + 1) - bits;
    vec[top] = (((vec[top] << spare) as i64) >> spare) as Limb;
    let fill = if is_negative(&vec[..=top]) { Limb::MAX } else { 0 };
    vec[top + 1..].fill(fill);
}

/// Wraps the value to `bits` bits, returning `bits_to_limbs(bits)` limbs.
pub fn truncate(src: &[Limb], bits: usize) -> Vec<Limb> {
    let mut result = sign_extend(src, bits_to_limbs(bits));
    normalize(&mut result, bits);
    result
}

/// Returns true if the two's-complement value fits in `bits` bits.
pub fn fits_in_bits(vec: &[Limb], bits: usize) -> bool {
    if bits >= LIMB_BITS * vec.len() {
        return true;
    }
    sign_extend(&truncate(vec, bits), vec.len()) == vec
}

/// Largest two's-complement value of a `bits`-bit integer.
pub fn max_value(bits: usize) -> Vec<Limb> {
    let limbs = bits_to_limbs(bits);
    let mut result = vec![Limb::MAX; limbs];
    logical_shift_right(&mut result, LIMB_BITS * limbs - (bits - 1));
    result
}

/// Smallest two's-complement value of a `bits`-bit integer.
pub fn min_value(bits: usize) -> Vec<Limb> {
    max_value(bits).into_iter().map(|l| !l).collect()
}

/// Reads the magnitude as `m * 2^shift` where `m` keeps the 126 most
/// significant bits and ORs everything below into its lowest bit.
pub fn leading_u128(vec: &[Limb]) -> (u128, usize) {
    let width = unsigned_width(vec);
    let shift = width.saturating_sub(126);
    let mut top = vec.to_vec();
    let sticky = shift > 0 && bits(vec)[..shift].any();
    logical_shift_right(&mut top, shift);
    let lo = top.first().copied().unwrap_or(0) as u128;
    let hi = top.get(1).copied().unwrap_or(0) as u128;
    ((hi << LIMB_BITS) | lo | sticky as u128, shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_sign_extends_within_and_across_limbs() {
        let mut v = vec![0b1000, 0];
        normalize(&mut v, 4);
        assert_eq!(v, vec![!0b111, Limb::MAX]);

        let mut v = vec![0b0111, Limb::MAX];
        normalize(&mut v, 4);
        assert_eq!(v, vec![0b0111, 0]);
    }

    #[test]
    fn extremes() {
        assert_eq!(max_value(8), vec![127]);
        assert_eq!(min_value(8), vec![!127]);
        assert_eq!(max_value(65), vec![Limb::MAX, 0]);
        assert_eq!(min_value(65), vec![0, Limb::MAX]);
    }

    #[test]
    fn leading_u128_keeps_sticky() {
        let v = vec![1, 0, 1 << 10];
        let (m, shift) = leading_u128(&v);
        assert_eq!(shift, 139 - 126);
        assert_eq!(m & 1, 1);
        assert_eq!(m >> 125, 1);
    }
}

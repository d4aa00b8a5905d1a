/*
    Limb vector shifts

    All shifts preserve the vector length. Shifting by the full width or
    more fills with the sign (arithmetic) or with zeros (logical).
*/

use super::*;

/// Arithmetic right shift by `n` bits.
pub fn arithmetic_shift_right(vec: &mut [Limb], n: usize) {
    let fill = if is_negative(vec) { Limb::MAX } else { 0 };
    shift_right_fill(vec, n, fill);
}

/// Logical right shift by `n` bits.
pub fn logical_shift_right(vec: &mut [Limb], n: usize) {
    shift_right_fill(vec, n, 0);
}

/// Logical left shift by `n` bits.
pub fn logical_shift_left(vec: &mut [Limb], n: usize) {
    if vec.is_empty() || n == 0 {
        return;
    }

    let len = vec.len();
    let skip = n / LIMB_BITS;
    if skip >= len {
        vec.fill(0);
        return;
    } else if skip > 0 {
        vec.copy_within(..len - skip, skip);
        vec[..skip].fill(0);
    }

    let shift = n % LIMB_BITS;
    if shift > 0 {
        let mut carry = 0;
        for limb in vec.iter_mut() {
            let out = *limb >> (LIMB_BITS - shift);
            *limb = (*limb << shift) | carry;
            carry = out;
        }
    }
}

// Right shift where vacated high bits take the bits of `fill`.
fn shift_right_fill(vec: &mut [Limb], n: usize, fill: Limb) {
    if vec.is_empty() || n == 0 {
        return;
    }

    let len = vec.len();
    let skip = n / LIMB_BITS;
    if skip >= len {
        vec.fill(fill);
        return;
    } else if skip > 0 {
        vec.copy_within(skip.., 0);
        vec[len - skip..].fill(fill);
    }

    let shift = n % LIMB_BITS;
    if shift > 0 {
        let mut carry = fill << (LIMB_BITS - shift);
        for limb in vec.iter_mut().rev() {
            let out = *limb << (LIMB_BITS - shift);
            *limb = (*limb >> shift) | carry;
            carry = out;
        }
    }
}

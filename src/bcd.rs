/*
    Binary-coded decimal

    Binary <-> packed-BCD conversion over limb vectors using the
    double-dabble algorithm and its inverse, plus the nibble-list helpers
    used for incremental decimal parsing. Every conversion owns its
    scratch register.
*/

use bitvec::prelude::Lsb0;
use bitvec::view::BitView;

use crate::limb::{self, Limb, LIMB_BITS, NIBBLES_PER_LIMB};

// A one in the lowest bit of every nibble.
const NIBBLE_MASK: Limb = 0x1111_1111_1111_1111;

// Packed-BCD working register of the (reverse) double-dabble algorithm.
struct DoubleDabbleList {
    data: Vec<Limb>,
}

impl DoubleDabbleList {
    fn new() -> Self {
        Self { data: vec![0] }
    }

    // Shift left once, injecting `new_bit` at the bottom.
    fn double(&mut self, new_bit: bool) {
        let carry = limb::is_negative(&self.data);
        limb::logical_shift_left(&mut self.data, 1);
        if carry {
            self.data.push(1);
        }
        self.data[0] |= new_bit as Limb;
    }

    // Add three to every nibble >= 5.
    fn dabble(&mut self) {
        dabble(&mut self.data);
    }

    // Shift right once, returning the bit shifted out.
    fn reverse_double(&mut self) -> bool {
        let out = self.data[0] & 1 != 0;
        limb::logical_shift_right(&mut self.data, 1);
        out
    }

    // Subtract three from every nibble >= 8.
    fn reverse_dabble(&mut self) {
        reverse_dabble(&mut self.data);
    }
}

fn dabble(data: &mut [Limb]) {
    for l in data.iter_mut() {
        let mask = (((*l | *l >> 1) & (*l >> 2)) | (*l >> 3)) & NIBBLE_MASK;
        *l += (mask << 1) | mask;
    }
}

fn reverse_dabble(data: &mut [Limb]) {
    for l in data.iter_mut() {
        let mask = (*l >> 3) & NIBBLE_MASK;
        *l -= (mask << 1) | mask;
    }
}

/// Converts an unsigned binary magnitude to packed BCD, four bits per
/// decimal digit, least significant digit first.
///
/// An empty input gives an empty output; zero gives a single zero limb.
pub fn double_dabble(value: &[Limb]) -> Vec<Limb> {
    if value.is_empty() {
        return Vec::new();
    }

    let input = limb::bits(value);
    let mut bcd = DoubleDabbleList::new();
    for i in (0..limb::unsigned_width(value)).rev() {
        bcd.dabble();
        bcd.double(input[i]);
    }
    bcd.data
}

/// Converts a nibble list (least significant digit first) back to an
/// unsigned binary limb vector.
pub fn reverse_double_dabble(bcd_list: &[u8]) -> Vec<Limb> {
    if bcd_list.is_empty() {
        return Vec::new();
    }

    let mut bcd = DoubleDabbleList {
        data: from_nibble_list(bcd_list),
    };
    let mut out = Vec::new();
    while !limb::is_zero(&bcd.data) {
        out.push(bcd.reverse_double());
        bcd.reverse_dabble();
    }

    let mut result = vec![0; limb::bits_to_limbs(out.len()).max(1)];
    let view = result.view_bits_mut::<Lsb0>();
    for (i, b) in out.into_iter().enumerate() {
        view.set(i, b);
    }
    result
}

/// Unpacks a limb vector into nibbles, least significant first.
///
/// Trailing (most significant) zero nibbles are removed, but the result
/// keeps at least `len` nibbles, and at least one.
pub fn to_nibble_list(data: &[Limb], len: usize) -> Vec<u8> {
    let mut result: Vec<u8> = data
        .iter()
        .flat_map(|&l| (0..NIBBLES_PER_LIMB).map(move |i| ((l >> (4 * i)) & 0xF) as u8))
        .collect();

    let keep = result
        .iter()
        .rposition(|&n| n != 0)
        .map_or(0, |i| i + 1)
        .max(len);
    result.resize(keep, 0);

    if result.is_empty() {
        result.push(0);
    }
    result
}

/// Packs a nibble list (least significant first) into a limb vector.
pub fn from_nibble_list(nibble_list: &[u8]) -> Vec<Limb> {
    nibble_list
        .chunks(NIBBLES_PER_LIMB)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0, |acc, (i, &n)| acc | ((n as Limb & 0xF) << (4 * i)))
        })
        .collect()
}

/// Shifts a nibble list one bit to the left, returning the bit shifted out
/// of the most significant nibble.
pub fn nibble_list_shift_left_once(nibble_list: &mut [u8]) -> bool {
    let Some(&top) = nibble_list.last() else {
        return false;
    };

    for i in (1..nibble_list.len()).rev() {
        nibble_list[i] = ((nibble_list[i] << 1) & 0xF) | (nibble_list[i - 1] >= 8) as u8;
    }
    nibble_list[0] = (nibble_list[0] << 1) & 0xF;
    top >= 8
}

/// Multiplies a BCD nibble list by two, growing it by one digit on carry.
pub fn bcd_mul2(bcd_list: &mut Vec<u8>) {
    for n in bcd_list.iter_mut() {
        if *n >= 5 {
            *n += 3;
        }
    }
    if nibble_list_shift_left_once(bcd_list) {
        bcd_list.push(1);
    }
}

/// Multiplies a packed-BCD limb vector by two, growing it on carry.
pub fn bcd_limb_vec_mul2(bcd: &mut Vec<Limb>) {
    if bcd.is_empty() {
        return;
    }

    dabble(bcd);
    let carry = limb::is_negative(bcd);
    limb::logical_shift_left(bcd, 1);
    if carry {
        bcd.push(1);
    }
}

/// Divides a packed-BCD limb vector by two.
///
/// When a one is shifted out of the bottom, a new limb of fraction digits
/// is prepended and `true` is returned, so the caller can track how many
/// nibbles now sit after the decimal point.
pub fn bcd_limb_vec_div2(bcd: &mut Vec<Limb>) -> bool {
    if bcd.is_empty() {
        return false;
    }

    let out = bcd[0] << (LIMB_BITS - 1);
    limb::logical_shift_right(bcd, 1);
    let grew = out != 0;
    if grew {
        bcd.insert(0, out);
    }
    reverse_dabble(bcd);
    grew
}

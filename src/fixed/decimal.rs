/*
    Decimal strings

    Rendering runs double-dabble on the magnitude and then halves (or
    doubles) the packed BCD once per fractional bit. Parsing converts the
    integer digits with reverse double-dabble and extracts binary fraction
    bits by repeatedly doubling the fraction digits.
*/

use bitvec::prelude::Lsb0;
use bitvec::view::BitView;

use super::*;
use crate::bcd;
use crate::limb::NIBBLES_PER_LIMB;
use crate::{Context, Error, FixedContext, Result};

impl Fixed {
    /// Renders the exact decimal value, without trailing fraction zeros.
    pub fn to_string_dec(&self) -> String {
        let magnitude = limb::abs(&self.data);
        let mut bcd = bcd::double_dabble(&magnitude);

        // number of packed digits after the decimal point
        let mut point = 0;
        let frac_bits = self.frac_bits();
        if frac_bits >= 0 {
            for _ in 0..frac_bits {
                if bcd::bcd_limb_vec_div2(&mut bcd) {
                    point += NIBBLES_PER_LIMB;
                }
            }
        } else {
            for _ in 0..frac_bits.unsigned_abs() {
                bcd::bcd_limb_vec_mul2(&mut bcd);
            }
        }

        let nibbles = bcd::to_nibble_list(&bcd, point + 1);
        let (fraction, integer) = nibbles.split_at(point);
        let fraction = match fraction.iter().position(|&d| d != 0) {
            Some(i) => &fraction[i..],
            None => &[],
        };

        let mut s = String::with_capacity(nibbles.len() + 2);
        if self.is_negative() {
            s.push('-');
        }
        s.extend(integer.iter().rev().map(|&d| char::from(b'0' + d)));
        if !fraction.is_empty() {
            s.push('.');
            s.extend(fraction.iter().rev().map(|&d| char::from(b'0' + d)));
        }
        s
    }

    /// Parses a decimal literal such as `-12.375` into `format`,
    /// quantizing and handling overflow according to `ctx`.
    pub fn from_str_dec(s: &str, format: FixedFormat, ctx: &FixedContext) -> Result<Self> {
        let literal = s.trim();
        let (negative, body) = match literal.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, literal),
        };
        let (int_str, frac_str) = body.split_once('.').unwrap_or((body, ""));
        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (int_str.is_empty() && frac_str.is_empty()) || !is_digits(int_str) || !is_digits(frac_str) {
            return Err(Error::ParseDecimal(s.to_string()));
        }

        // least significant digit first
        let digits = |part: &str| part.bytes().rev().map(|b| b - b'0').collect::<Vec<u8>>();
        let mut int_value = bcd::reverse_double_dabble(&digits(int_str));

        // binary fraction bits, most significant first, down to one bit
        // below the target precision; leftover digits become the sticky bit
        let frac_len = frac_str.len();
        let mut frac_digits = digits(frac_str);
        let frac_bits = format.frac_bits().max(0) as usize + 1;
        let mut bits = Vec::with_capacity(frac_bits);
        for _ in 0..frac_bits {
            bcd::bcd_mul2(&mut frac_digits);
            let carry = frac_digits.len() > frac_len;
            if carry {
                frac_digits.pop();
            }
            bits.push(carry);
        }
        let sticky = frac_digits.iter().any(|&d| d != 0);

        let total_frac = frac_bits + 1;
        let width = limb::unsigned_width(&int_value) + total_frac + 1;
        int_value.resize(limb::bits_to_limbs(width).max(int_value.len()), 0);
        let mut data = int_value;
        limb::logical_shift_left(&mut data, total_frac);
        {
            let view = data.view_bits_mut::<Lsb0>();
            for (i, &b) in bits.iter().enumerate() {
                view.set(total_frac - 1 - i, b);
            }
            view.set(0, sticky);
        }
        if negative {
            limb::negate_in_place(&mut data);
        }

        let bits = limb::LIMB_BITS * data.len();
        let exact = Self::from_raw(data, FixedFormat::raw(bits, bits as i64 - total_frac as i64));
        Ok(exact.cast_with(format, ctx.quantization, ctx.overflow, &mut ctx.rng()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(bits: usize, int_bits: i64) -> FixedFormat {
        FixedFormat::new(bits, int_bits).unwrap()
    }

    #[test]
    fn renders_fractions() {
        let x = Fixed::from_limbs(&[0b0001_0110], q(8, 4));
        assert_eq!(x.to_string_dec(), "1.375");
        let y = Fixed::from_limbs(&[0xFF], q(8, 4));
        assert_eq!(y.to_string_dec(), "-0.0625");
        let z = Fixed::from_limbs(&[3], q(4, 6));
        assert_eq!(z.to_string_dec(), "12");
    }

    #[test]
    fn rejects_malformed_literals() {
        let ctx = FixedContext::new();
        for s in ["", "-", ".", "1.2.3", "--1", "1e5", "0x10"] {
            assert!(
                Fixed::from_str_dec(s, q(8, 4), &ctx).is_err(),
                "accepted malformed literal {:?}",
                s
            );
        }
        assert!(Fixed::from_str_dec(" .5 ", q(8, 4), &ctx).is_ok());
        assert!(Fixed::from_str_dec("-3.", q(8, 4), &ctx).is_ok());
    }
}

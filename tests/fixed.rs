use std::cmp::Ordering;

use num_bigint::BigInt;
use proptest::prelude::*;
use quant_sim::*;

fn fmt(bits: usize, int_bits: i64) -> FixedFormat {
    FixedFormat::new(bits, int_bits).unwrap()
}

fn fx(bits: i64, format: FixedFormat) -> Fixed {
    Fixed::from_bits(&BigInt::from(bits), format)
}

fn parse(s: &str, format: FixedFormat, ctx: &FixedContext) -> Fixed {
    Fixed::from_str_dec(s, format, ctx).unwrap()
}

#[test]
fn construction_contracts() {
    assert_eq!(FixedFormat::new(0, 0), Err(Error::NonPositiveBits(0)));
    assert_eq!(
        FixedFormat::from_specifiers(Some(4), None, None),
        Err(Error::BitSpecifierCount(1))
    );
    assert_eq!(
        FixedFormat::from_specifiers(None, Some(-2), Some(-1)),
        Err(Error::NonPositiveBits(-1))
    );
    assert_eq!(
        FixedFormat::from_specifiers(Some(i64::MAX), Some(1), None),
        Err(Error::BitSpecifierRange(i64::MAX))
    );
    let f = FixedFormat::from_specifiers(None, Some(12), Some(8)).unwrap();
    assert_eq!((f.bits(), f.int_bits(), f.frac_bits()), (8, -4, 12));

    // bit patterns wrap into the format
    assert_eq!(fx(0x1FF, fmt(8, 8)).to_bigint(), BigInt::from(-1));
    assert_eq!(fx(-1, fmt(8, 8)).to_bits(), 255u32.into());
}

#[test]
fn exact_sum() {
    let ctx = FixedContext::new().quantization_mode(QuantizationMode::TiesEven);
    let a = fx(0b0001_0110, fmt(8, 4));
    let b = fx(0b0000_0010, fmt(8, 4));
    assert_eq!(a.to_string(), "1.375");
    assert_eq!(b.to_string(), "0.125");

    let sum = a.add(&b, &ctx);
    assert_eq!(sum.format(), fmt(9, 5));
    assert_eq!(sum.to_string(), "1.5");
    assert_eq!(sum.to_f64(), 1.5);

    let narrow = a.add(&b, &ctx.format(fmt(8, 4)));
    assert_eq!(narrow, fx(24, fmt(8, 4)));
}

#[test]
fn product_and_quotient() {
    let ctx = FixedContext::new();
    let a = fx(-24, fmt(8, 4)); // -1.5
    let b = fx(40, fmt(8, 4)); // 2.5
    let p = a.mul(&b, &ctx);
    assert_eq!(p.format(), fmt(16, 8));
    assert_eq!(p.to_string(), "-3.75");

    let one = fx(16, fmt(8, 4));
    let three = fx(48, fmt(8, 4));
    let q = one.div(&three, &ctx).unwrap();
    assert_eq!(q.format(), fmt(17, 9));
    assert_eq!(q.to_bigint(), BigInt::from(85), "1/3 truncated to 8 fraction bits");

    let q = one.neg(&ctx).div(&three, &ctx).unwrap();
    assert_eq!(q.to_bigint(), BigInt::from(-86), "-1/3 rounds toward negative infinity");

    let nearest = ctx.quantization_mode(QuantizationMode::TiesEven);
    let q = fx(32, fmt(8, 4)).div(&three, &nearest).unwrap();
    assert_eq!(q.to_bigint(), BigInt::from(171), "2/3 to nearest");

    assert_eq!(one.div(&Fixed::zero(fmt(8, 4)), &ctx), Err(Error::DivisionByZero));
}

#[test]
fn negation_widens() {
    let ctx = FixedContext::new();
    let min = fx(-128, fmt(8, 4));
    let neg = min.neg(&ctx);
    assert_eq!(neg.format(), fmt(9, 5));
    assert_eq!(neg.to_string(), "8");
    assert_eq!(min.abs(&ctx), neg);
}

#[test]
fn overflow_policies() {
    let five = fx(80, fmt(8, 4));
    let target = fmt(6, 3);
    let wrap = FixedContext::new().overflow_mode(OverflowMode::Wrap);
    let saturate = FixedContext::new().overflow_mode(OverflowMode::Saturate);
    let numeric_std = FixedContext::new().overflow_mode(OverflowMode::NumericStd);
    assert_eq!(five.cast(target, &wrap).to_string(), "-3");
    assert_eq!(five.cast(target, &saturate).to_string(), "3.875");
    assert_eq!(five.cast(target, &numeric_std).to_string(), "1");

    let low = fx(-80, fmt(8, 4));
    assert_eq!(low.cast(target, &saturate).to_string(), "-4");
    assert_eq!(low.cast(fmt(12, 6), &saturate).to_string(), "-5");
}

#[test]
fn decimal_parsing_rounds() {
    let f = fmt(8, 4);
    let trn = FixedContext::new();
    let nearest = FixedContext::new().quantization_mode(QuantizationMode::TiesEven);
    assert_eq!(parse("0.1", f, &trn).to_string(), "0.0625");
    assert_eq!(parse("0.1", f, &nearest).to_string(), "0.125");
    assert_eq!(parse("-0.1", f, &trn).to_string(), "-0.125");
    assert_eq!(parse("  -7.9375 ", f, &trn).to_bigint(), BigInt::from(-127));
    assert_eq!(parse("12", fmt(4, 6), &trn).to_bigint(), BigInt::from(3));
    assert_eq!(
        Fixed::from_str_dec("1.2.3", f, &trn),
        Err(Error::ParseDecimal("1.2.3".to_string()))
    );
}

#[test]
fn doubles() {
    let ctx = FixedContext::new();
    let x = Fixed::from_f64(1.375, fmt(8, 4), &ctx).unwrap();
    assert_eq!(x.to_bigint(), BigInt::from(22));
    assert_eq!(Fixed::from_f64(-0.03, fmt(8, 4), &ctx).unwrap().to_f64(), -0.0625);
    let err = Fixed::from_f64(f64::NAN, fmt(8, 4), &ctx).unwrap_err();
    assert!(matches!(err, Error::NonFinite(v) if v.is_nan()), "unexpected error: {}", err);
    assert_eq!(fx(1, fmt(200, -10)).to_f64(), 2f64.powi(-210));
}

#[test]
fn comparisons_and_shifts() {
    let a = fx(8, fmt(8, 4)); // 0.5
    let b = fx(1, fmt(4, 3)); // 0.5
    assert_eq!(a.cmp_value(&b), Ordering::Equal);
    assert!(a != b, "different formats are never identical");
    assert!(!a.is_identical(&b));
    assert_eq!(fx(-1, fmt(4, 4)).cmp_value(&b), Ordering::Less);

    let shifted = &a << 3;
    assert_eq!(shifted.to_string(), "4");
    assert_eq!(shifted.limbs(), a.limbs());
    assert_eq!((a >> 2).to_string(), "0.125");
}

#[test]
fn stochastic_modes_keep_exact_values() {
    let x = fx(-84, fmt(10, 6));
    for mode in [QuantizationMode::StochWeighted, QuantizationMode::StochEqual] {
        let ctx = FixedContext::new().quantization_mode(mode);
        assert_eq!(x.cast(fmt(8, 6), &ctx).cmp_value(&x), Ordering::Equal, "{:?}", mode);
    }
}

#[test]
fn generic_number() {
    fn sum_of_squares<N: Number>(xs: &[N], ctx: &N::Ctx) -> N {
        let mut acc = xs[0].mul(&xs[0], ctx);
        for x in &xs[1..] {
            acc = acc.add(&x.mul(x, ctx), ctx);
        }
        acc
    }
    let xs = [fx(3, fmt(4, 2)), fx(-2, fmt(4, 2))];
    let s = sum_of_squares(&xs, &FixedContext::new());
    assert_eq!(s.to_string(), "0.8125");
    assert!(Number::is_finite(&s) && !Number::is_nan(&s));
}

fn any_fixed() -> impl Strategy<Value = Fixed> {
    (1usize..160, -40i64..200, any::<[u64; 3]>()).prop_map(|(bits, int_bits, words)| {
        let limbs: Vec<u64> = words.to_vec();
        Fixed::from_limbs(&limbs, fmt(bits, int_bits))
    })
}

fn scaled(x: &Fixed, frac_bits: i64) -> BigInt {
    x.to_bigint() << (frac_bits - x.frac_bits()) as usize
}

proptest! {
    #[test]
    fn decimal_round_trip(x in any_fixed()) {
        let s = x.to_string_dec();
        let y = Fixed::from_str_dec(&s, x.format(), &FixedContext::new()).unwrap();
        prop_assert_eq!(y, x);
    }

    #[test]
    fn sums_are_exact(a in any_fixed(), b in any_fixed()) {
        let sum = a.add(&b, &FixedContext::new());
        prop_assert!(sum.bits() >= a.bits().max(b.bits()));
        let f = sum.frac_bits();
        prop_assert_eq!(sum.to_bigint(), scaled(&a, f) + scaled(&b, f));
        let diff = a.sub(&b, &FixedContext::new());
        prop_assert_eq!(diff.to_bigint(), scaled(&a, f) - scaled(&b, f));
    }

    #[test]
    fn products_are_exact(a in any_fixed(), b in any_fixed()) {
        let p = a.mul(&b, &FixedContext::new());
        prop_assert_eq!(p.to_bigint(), a.to_bigint() * b.to_bigint());
    }
}

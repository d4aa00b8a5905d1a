use num_bigint::BigInt;
use quant_sim::array::{fold_shape, strides};
use quant_sim::*;

fn fmt(bits: usize, int_bits: i64) -> FixedFormat {
    FixedFormat::new(bits, int_bits).unwrap()
}

fn e4m3() -> FloatFormat {
    FloatFormat::new(4, 3).unwrap()
}

fn fixed_array(shape: &[usize], format: FixedFormat, values: &[f64]) -> FixedArray {
    FixedArray::from_f64(shape, format, values, &FixedContext::new()).unwrap()
}

fn integers(shape: &[usize], format: FixedFormat, values: &[i64]) -> FixedArray {
    let values: Vec<BigInt> = values.iter().map(|&v| BigInt::from(v)).collect();
    FixedArray::from_bits(shape, format, &values).unwrap()
}

#[test]
fn shapes() {
    assert_eq!(fold_shape(&[2, 3, 4]), 24);
    assert_eq!(fold_shape(&[]), 1);
    assert_eq!(strides(&[2, 3, 4]), vec![12, 4, 1]);

    let a = FixedArray::zeros(&[2, 3], fmt(8, 4));
    assert_eq!((a.ndim(), a.len(), a.is_empty()), (2, 6, false));
    assert!(a.get(&[1, 2]).unwrap().is_zero());
    assert!(a.get(&[2, 0]).is_none());
    assert!(a.get(&[0]).is_none());
    assert!(FixedArray::zeros(&[0, 3], fmt(8, 4)).is_empty());
}

#[test]
fn element_count_is_checked() {
    let values = [BigInt::from(1), BigInt::from(2), BigInt::from(3)];
    assert_eq!(
        FixedArray::from_bits(&[2, 2], fmt(8, 4), &values).unwrap_err(),
        Error::ElementCount { expected: 4, got: 3 }
    );
    assert!(FloatArray::from_f64(&[3], e4m3(), &[1.0], &FloatContext::new()).is_err());
}

#[test]
fn shape_mismatch_is_reported() {
    let ctx = FixedContext::new();
    let a = FixedArray::zeros(&[2, 2], fmt(8, 4));
    let b = FixedArray::zeros(&[2, 3], fmt(8, 4));
    let err = a.add(&b, &ctx).unwrap_err();
    assert_eq!(err.to_string(), "add: shape mismatch, lhs.shape=(2, 2), rhs.shape=(2, 3)");
    assert!(matches!(
        a.div(&b, &ctx),
        Err(Error::ShapeMismatch { op: "truediv", .. })
    ));

    let x = FloatArray::zeros(&[4], e4m3());
    let y = FloatArray::zeros(&[2, 2], e4m3());
    assert_eq!(
        x.sub(&y, &FloatContext::new()).unwrap_err(),
        Error::ShapeMismatch { op: "sub", lhs: vec![4], rhs: vec![2, 2] }
    );
}

#[test]
fn fixed_element_wise() {
    let ctx = FixedContext::new();
    let a = fixed_array(&[2, 2], fmt(8, 4), &[1.0, 2.0, -0.5, 0.25]);
    let b = fixed_array(&[2, 2], fmt(8, 4), &[0.5, 0.5, 0.5, 0.5]);

    let sum = a.add(&b, &ctx).unwrap();
    assert_eq!(sum.format(), fmt(9, 5));
    assert_eq!(sum.shape(), &[2, 2]);
    assert_eq!(sum.to_f64_vec(), vec![1.5, 2.5, 0.0, 0.75]);

    let diff = a.sub(&b, &ctx).unwrap();
    assert_eq!(diff.to_f64_vec(), vec![0.5, 1.5, -1.0, -0.25]);

    let product = a.mul(&b, &ctx).unwrap();
    assert_eq!(product.format(), fmt(16, 8));
    assert_eq!(product.to_f64_vec(), vec![0.5, 1.0, -0.25, 0.125]);

    let quotient = a.div(&b, &ctx).unwrap();
    assert_eq!(quotient.to_f64_vec(), vec![2.0, 4.0, -1.0, 0.5]);

    // every element agrees with the scalar operation
    for (i, x) in a.iter().enumerate() {
        let y = b.iter().nth(i).unwrap();
        assert!(sum.iter().nth(i).unwrap().is_identical(&x.add(&y, &ctx)));
    }
}

#[test]
fn fixed_scalar_broadcast() {
    let ctx = FixedContext::new();
    let a = fixed_array(&[3], fmt(8, 4), &[1.0, -2.0, 0.25]);
    let two = Fixed::from_f64(2.0, fmt(8, 4), &ctx).unwrap();

    let scaled = a.mul_scalar(&two, &ctx).unwrap();
    assert_eq!(scaled.format(), fmt(16, 8));
    assert_eq!(scaled.to_f64_vec(), vec![2.0, -4.0, 0.5]);
    assert_eq!(a.add_scalar(&two, &ctx).unwrap().to_f64_vec(), vec![3.0, 0.0, 2.25]);
    assert_eq!(a.sub_scalar(&two, &ctx).unwrap().to_f64_vec(), vec![-1.0, -4.0, -1.75]);
    assert_eq!(a.div_scalar(&two, &ctx).unwrap().to_f64_vec(), vec![0.5, -1.0, 0.125]);

    let narrow = ctx.format(fmt(6, 3)).overflow_mode(OverflowMode::Saturate);
    let clamped = a.mul_scalar(&two, &narrow).unwrap();
    assert_eq!(clamped.format(), fmt(6, 3));
    assert_eq!(clamped.to_f64_vec(), vec![2.0, -4.0, 0.5]);
    let clamped = a.add_scalar(&Fixed::from_f64(3.5, fmt(8, 4), &ctx).unwrap(), &narrow).unwrap();
    assert_eq!(clamped.to_f64_vec(), vec![3.875, 1.5, 3.75]);
}

#[test]
fn fixed_division_by_zero_fails_the_whole_array() {
    let ctx = FixedContext::new();
    let a = fixed_array(&[3], fmt(8, 4), &[1.0, 2.0, 3.0]);
    let b = fixed_array(&[3], fmt(8, 4), &[1.0, 0.0, 2.0]);
    assert_eq!(a.div(&b, &ctx), Err(Error::DivisionByZero));
    assert_eq!(a.div_scalar(&Fixed::zero(fmt(8, 4)), &ctx), Err(Error::DivisionByZero));
}

#[test]
fn fixed_conversions() {
    let ctx = FixedContext::new();
    let a = fixed_array(&[2], fmt(8, 4), &[0.1, -0.1]);
    assert_eq!(a.to_f64_vec(), vec![0.0625, -0.125]);
    assert!(FixedArray::from_f64(&[1], fmt(8, 4), &[f64::INFINITY], &ctx).is_err());

    let mixed = [
        Fixed::from_f64(1.5, fmt(4, 2), &ctx).unwrap(),
        Fixed::from_f64(-3.25, fmt(12, 4), &ctx).unwrap(),
    ];
    let b = FixedArray::from_fixed(&[2], fmt(8, 4), &mixed, &ctx).unwrap();
    assert_eq!(b.format(), fmt(8, 4));
    assert_eq!(b.to_f64_vec(), vec![1.5, -3.25]);

    let nearest = ctx.quantization_mode(QuantizationMode::TiesAway);
    let c = b.cast(fmt(4, 3), &nearest);
    assert_eq!(c.to_f64_vec(), vec![1.5, -3.5]);
}

#[test]
fn fixed_transpose() {
    let a = integers(&[2, 3], fmt(8, 8), &[1, 2, 3, 4, 5, 6]);
    let t = a.transpose().unwrap();
    assert_eq!(t.shape(), &[3, 2]);
    assert_eq!(t.to_f64_vec(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    assert_eq!(t.get(&[2, 0]).unwrap().to_bigint(), BigInt::from(3));
    assert!(t.transpose().unwrap().is_identical(&a));

    // multi-limb elements move as a unit
    let wide = fmt(100, 100);
    let big = BigInt::from(1) << 70u32;
    let values = [big.clone() + 1, BigInt::from(-2), big.clone() + 3, BigInt::from(-4)];
    let b = FixedArray::from_bits(&[2, 2], wide, &values).unwrap();
    let t = b.transpose().unwrap();
    assert_eq!(t.get(&[0, 1]).unwrap().to_bigint(), big + 3);
    assert_eq!(t.get(&[1, 0]).unwrap().to_bigint(), BigInt::from(-2));

    let v = integers(&[3], fmt(8, 8), &[1, 2, 3]);
    assert!(v.transpose().unwrap().is_identical(&v));

    let cube = FixedArray::zeros(&[2, 2, 2], fmt(8, 4));
    assert_eq!(
        cube.transpose(),
        Err(Error::NotImplemented("transpose of a 3-dimensional array".to_string()))
    );
}

#[test]
fn float_element_wise() {
    let ctx = FloatContext::new();
    let a = FloatArray::from_f64(&[4], e4m3(), &[0.1, 1.0, 300.0, -0.0], &ctx).unwrap();
    let got = a.to_f64_vec();
    assert_eq!(&got[..2], &[0.1015625, 1.0]);
    assert_eq!(got[2], f64::INFINITY);
    assert!(got[3] == 0.0 && got[3].is_sign_negative());

    let half = FloatArray::from_f64(&[4], FloatFormat::HALF, &[1.0, 2.0, 3.0, 4.0], &ctx).unwrap();
    let sum = a.add(&half, &ctx).unwrap();
    assert_eq!(sum.format(), FloatFormat::new(5, 10).unwrap());
    assert_eq!(sum.get(&[1]).unwrap().to_f64(), 3.0);
    assert!(sum.get(&[2]).unwrap().is_infinity());

    let forced = a.mul(&half, &ctx.format(e4m3())).unwrap();
    assert_eq!(forced.format(), e4m3());
    assert_eq!(forced.to_f64_vec()[1], 2.0);

    let zeros = FloatArray::zeros(&[4], e4m3());
    let q = half.div(&zeros, &ctx).unwrap();
    assert!(q.iter().all(|x| x.is_infinity() && !x.sign()));
    assert!(half.sub(&half, &ctx).unwrap().iter().all(|x| x.is_zero()));
}

#[test]
fn float_scalar_and_layout() {
    let ctx = FloatContext::new();
    let a = FloatArray::from_f64(&[2, 2], e4m3(), &[1.0, 2.0, 3.0, 4.0], &ctx).unwrap();
    let two = Float::from_f64(2.0, e4m3(), &ctx);
    assert_eq!(a.mul_scalar(&two, &ctx).unwrap().to_f64_vec(), vec![2.0, 4.0, 6.0, 8.0]);
    assert_eq!(a.div_scalar(&two, &ctx).unwrap().to_f64_vec(), vec![0.5, 1.0, 1.5, 2.0]);
    assert_eq!(a.add_scalar(&two, &ctx).unwrap().to_f64_vec(), vec![3.0, 4.0, 5.0, 6.0]);
    assert_eq!(a.sub_scalar(&two, &ctx).unwrap().to_f64_vec(), vec![-1.0, 0.0, 1.0, 2.0]);

    let t = a.transpose().unwrap();
    assert_eq!(t.to_f64_vec(), vec![1.0, 3.0, 2.0, 4.0]);
    assert!(FloatArray::zeros(&[1, 1, 1], e4m3()).transpose().is_err());

    let data = [FloatData { sign: true, exp: 0xFF, man: 0xFF }];
    let masked = FloatArray::from_data(&[1], e4m3(), &data).unwrap();
    assert!(masked.get(&[0]).unwrap().is_nan());

    let narrowed = a.cast(FloatFormat::new(3, 1).unwrap(), &ctx.quantization_mode(QuantizationMode::ToZero));
    assert_eq!(narrowed.to_f64_vec(), vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn seeded_arrays_repeat() {
    let values: Vec<f64> = (0..64).map(|i| i as f64 / 7.0).collect();

    let ctx = FixedContext::new()
        .quantization_mode(QuantizationMode::StochWeighted)
        .seed(9);
    let a = FixedArray::from_f64(&[8, 8], fmt(8, 5), &values, &ctx).unwrap();
    let b = FixedArray::from_f64(&[8, 8], fmt(8, 5), &values, &ctx).unwrap();
    assert!(a.is_identical(&b));

    let ctx = FloatContext::new()
        .quantization_mode(QuantizationMode::StochEqual)
        .seed(9);
    let x = FloatArray::from_f64(&[64], e4m3(), &values, &ctx).unwrap();
    let y = FloatArray::from_f64(&[64], e4m3(), &values, &ctx).unwrap();
    assert!(x.is_identical(&y));
    let sum = x.add(&y, &ctx).unwrap();
    assert!(sum.is_identical(&x.add(&y, &ctx).unwrap()));
}

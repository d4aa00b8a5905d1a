/*
    Fixed-point arrays
*/

use std::iter;

use num_bigint::BigInt;

use super::shape::{check_element_count, check_shape, flat_index, transpose};
use super::zip_apply;
use crate::float::{Float, FloatFormat};
use crate::limb::Limb;
use crate::{ArithmeticOperation, Context, Fixed, FixedContext, FixedFormat, Result};

/// An N-dimensional array of fixed-point values sharing one format.
///
/// Elements are stored row-major as consecutive limb groups of
/// `format.limbs()` limbs each.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FixedArray {
    shape: Vec<usize>,
    format: FixedFormat,
    data: Vec<Limb>,
}

// Constructors
impl FixedArray {
    fn from_elements<I>(shape: Vec<usize>, format: FixedFormat, elements: I) -> Self
    where
        I: IntoIterator<Item = Fixed>,
    {
        let data = elements
            .into_iter()
            .flat_map(|x| {
                debug_assert_eq!(x.format(), format);
                x.limbs().to_vec()
            })
            .collect();
        Self {
            shape,
            format,
            data,
        }
    }

    /// An array of zeros.
    pub fn zeros(shape: &[usize], format: FixedFormat) -> Self {
        let count = super::fold_shape(shape);
        Self {
            shape: shape.to_vec(),
            format,
            data: vec![0; count * format.limbs()],
        }
    }

    /// Builds an array from per-element two's-complement bit patterns.
    pub fn from_bits(shape: &[usize], format: FixedFormat, values: &[BigInt]) -> Result<Self> {
        check_element_count(shape, values.len())?;
        let elements = values.iter().map(|v| Fixed::from_bits(v, format));
        Ok(Self::from_elements(shape.to_vec(), format, elements))
    }

    /// Quantizes doubles into `format`.
    pub fn from_f64(
        shape: &[usize],
        format: FixedFormat,
        values: &[f64],
        ctx: &FixedContext,
    ) -> Result<Self> {
        check_element_count(shape, values.len())?;
        let double = crate::FloatContext::new();
        let mut rng = ctx.rng();
        let elements = values
            .iter()
            .map(|&v| {
                let exact = Float::from_f64(v, FloatFormat::DOUBLE, &double).to_fixed()?;
                Ok(exact.cast_with(format, ctx.quantization, ctx.overflow, &mut rng))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_elements(shape.to_vec(), format, elements))
    }

    /// Casts scalar values of any format into `format`.
    pub fn from_fixed(
        shape: &[usize],
        format: FixedFormat,
        values: &[Fixed],
        ctx: &FixedContext,
    ) -> Result<Self> {
        check_element_count(shape, values.len())?;
        let mut rng = ctx.rng();
        let elements = values
            .iter()
            .map(|x| x.cast_with(format, ctx.quantization, ctx.overflow, &mut rng));
        Ok(Self::from_elements(shape.to_vec(), format, elements))
    }
}

// Accessors
impl FixedArray {
    /// The extent of every axis.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len() / self.format.limbs()
    }

    /// Returns true if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The format shared by every element.
    pub fn format(&self) -> FixedFormat {
        self.format
    }

    fn element(&self, i: usize) -> Fixed {
        let n = self.format.limbs();
        Fixed::from_limbs(&self.data[i * n..(i + 1) * n], self.format)
    }

    /// The element at a multi-dimensional index.
    pub fn get(&self, index: &[usize]) -> Option<Fixed> {
        flat_index(&self.shape, index).map(|i| self.element(i))
    }

    /// Iterates over the elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Fixed> + '_ {
        (0..self.len()).map(move |i| self.element(i))
    }

    /// Converts every element to the nearest double.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.iter().map(|x| x.to_f64()).collect()
    }

    /// Returns true if shapes, formats and bits all match.
    pub fn is_identical(&self, other: &Self) -> bool {
        self == other
    }

    /// Transposes a 2-D array. Arrays with fewer axes are returned unchanged.
    pub fn transpose(&self) -> Result<Self> {
        let (shape, data) = transpose(&self.shape, &self.data, self.format.limbs())?;
        Ok(Self {
            shape,
            format: self.format,
            data,
        })
    }

    /// Requantizes every element into `format`.
    pub fn cast(&self, format: FixedFormat, ctx: &FixedContext) -> Self {
        let mut rng = ctx.rng();
        let elements = self
            .iter()
            .map(|x| x.cast_with(format, ctx.quantization, ctx.overflow, &mut rng));
        Self::from_elements(self.shape.clone(), format, elements)
    }
}

// Arithmetic
impl FixedArray {
    fn result_format(&self, op: ArithmeticOperation, rhs: &FixedFormat, ctx: &FixedContext) -> FixedFormat {
        ctx.format
            .unwrap_or_else(|| FixedFormat::for_operation(op, &self.format, rhs))
    }

    /// Applies `op` element-wise. Both arrays must have the same shape.
    pub fn apply(&self, op: ArithmeticOperation, other: &Self, ctx: &FixedContext) -> Result<Self> {
        check_shape(op, &self.shape, &other.shape)?;
        let format = self.result_format(op, &other.format, ctx);
        let elements = zip_apply(op, self.iter(), other.iter(), ctx)?;
        Ok(Self::from_elements(self.shape.clone(), format, elements))
    }

    /// Applies `op` between every element and `scalar`.
    pub fn apply_scalar(&self, op: ArithmeticOperation, scalar: &Fixed, ctx: &FixedContext) -> Result<Self> {
        let format = self.result_format(op, &scalar.format(), ctx);
        let elements = zip_apply(op, self.iter(), iter::repeat(scalar.clone()), ctx)?;
        Ok(Self::from_elements(self.shape.clone(), format, elements))
    }

    /// Element-wise sum.
    pub fn add(&self, other: &Self, ctx: &FixedContext) -> Result<Self> {
        self.apply(ArithmeticOperation::Add, other, ctx)
    }

    /// Element-wise difference.
    pub fn sub(&self, other: &Self, ctx: &FixedContext) -> Result<Self> {
        self.apply(ArithmeticOperation::Sub, other, ctx)
    }

    /// Element-wise product.
    pub fn mul(&self, other: &Self, ctx: &FixedContext) -> Result<Self> {
        self.apply(ArithmeticOperation::Mul, other, ctx)
    }

    /// Element-wise quotient. Any zero divisor fails the whole operation.
    pub fn div(&self, other: &Self, ctx: &FixedContext) -> Result<Self> {
        self.apply(ArithmeticOperation::Div, other, ctx)
    }

    /// Adds `scalar` to every element.
    pub fn add_scalar(&self, scalar: &Fixed, ctx: &FixedContext) -> Result<Self> {
        self.apply_scalar(ArithmeticOperation::Add, scalar, ctx)
    }

    /// Subtracts `scalar` from every element.
    pub fn sub_scalar(&self, scalar: &Fixed, ctx: &FixedContext) -> Result<Self> {
        self.apply_scalar(ArithmeticOperation::Sub, scalar, ctx)
    }

    /// Multiplies every element by `scalar`.
    pub fn mul_scalar(&self, scalar: &Fixed, ctx: &FixedContext) -> Result<Self> {
        self.apply_scalar(ArithmeticOperation::Mul, scalar, ctx)
    }

    /// Divides every element by `scalar`.
    pub fn div_scalar(&self, scalar: &Fixed, ctx: &FixedContext) -> Result<Self> {
        self.apply_scalar(ArithmeticOperation::Div, scalar, ctx)
    }
}

/*
    Floating-point arrays
*/

use std::iter;

use super::shape::{check_element_count, check_shape, flat_index, transpose};
use super::zip_apply;
use crate::{ArithmeticOperation, Context, Float, FloatContext, FloatData, FloatFormat, Result};

/// An N-dimensional array of floating-point values sharing one format.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FloatArray {
    shape: Vec<usize>,
    format: FloatFormat,
    data: Vec<FloatData>,
}

// Constructors
impl FloatArray {
    fn from_elements<I>(shape: Vec<usize>, format: FloatFormat, elements: I) -> Self
    where
        I: IntoIterator<Item = Float>,
    {
        let data = elements.into_iter().map(|x| x.data()).collect();
        Self {
            shape,
            format,
            data,
        }
    }

    /// An array of positive zeros.
    pub fn zeros(shape: &[usize], format: FloatFormat) -> Self {
        Self {
            shape: shape.to_vec(),
            format,
            data: vec![FloatData::default(); super::fold_shape(shape)],
        }
    }

    /// Builds an array from encoded fields; bits outside the field widths
    /// are dropped.
    pub fn from_data(shape: &[usize], format: FloatFormat, data: &[FloatData]) -> Result<Self> {
        check_element_count(shape, data.len())?;
        let elements = data.iter().map(|&d| Float::from_data(d, format));
        Ok(Self::from_elements(shape.to_vec(), format, elements))
    }

    /// Rounds doubles into `format`.
    pub fn from_f64(
        shape: &[usize],
        format: FloatFormat,
        values: &[f64],
        ctx: &FloatContext,
    ) -> Result<Self> {
        check_element_count(shape, values.len())?;
        let mut rng = ctx.rng();
        let elements = values.iter().map(|&v| {
            Float::from_bits(v.to_bits() as u128, FloatFormat::DOUBLE).cast_with(
                format,
                ctx.quantization,
                &mut rng,
            )
        });
        Ok(Self::from_elements(shape.to_vec(), format, elements))
    }
}

// Accessors
impl FloatArray {
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
        self.data.len()
    }

    /// Returns true if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The format shared by every element.
    pub fn format(&self) -> FloatFormat {
        self.format
    }

    /// The element at a multi-dimensional index.
    pub fn get(&self, index: &[usize]) -> Option<Float> {
        flat_index(&self.shape, index).map(|i| Float::from_data(self.data[i], self.format))
    }

    /// Iterates over the elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Float> + '_ {
        self.data.iter().map(move |&d| Float::from_data(d, self.format))
    }

    /// Converts every element to the nearest double.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.iter().map(|x| x.to_f64()).collect()
    }

    /// Returns true if shapes, formats and encodings all match.
    pub fn is_identical(&self, other: &Self) -> bool {
        self == other
    }

    /// Transposes a 2-D array. Arrays with fewer axes are returned unchanged.
    pub fn transpose(&self) -> Result<Self> {
        let (shape, data) = transpose(&self.shape, &self.data, 1)?;
        Ok(Self {
            shape,
            format: self.format,
            data,
        })
    }

    /// Rounds every element into `format`.
    pub fn cast(&self, format: FloatFormat, ctx: &FloatContext) -> Self {
        let mut rng = ctx.rng();
        let elements = self
            .iter()
            .map(|x| x.cast_with(format, ctx.quantization, &mut rng));
        Self::from_elements(self.shape.clone(), format, elements)
    }
}

// Arithmetic
impl FloatArray {
    fn result_format(&self, rhs: &FloatFormat, ctx: &FloatContext) -> FloatFormat {
        ctx.format.unwrap_or_else(|| self.format.promote(rhs))
    }

    /// Applies `op` element-wise. Both arrays must have the same shape.
    pub fn apply(&self, op: ArithmeticOperation, other: &Self, ctx: &FloatContext) -> Result<Self> {
        check_shape(op, &self.shape, &other.shape)?;
        let format = self.result_format(&other.format, ctx);
        let elements = zip_apply(op, self.iter(), other.iter(), ctx)?;
        Ok(Self::from_elements(self.shape.clone(), format, elements))
    }

    /// Applies `op` between every element and `scalar`.
    pub fn apply_scalar(&self, op: ArithmeticOperation, scalar: &Float, ctx: &FloatContext) -> Result<Self> {
        let format = self.result_format(&scalar.format(), ctx);
        let elements = zip_apply(op, self.iter(), iter::repeat(*scalar), ctx)?;
        Ok(Self::from_elements(self.shape.clone(), format, elements))
    }

    /// Element-wise sum.
    pub fn add(&self, other: &Self, ctx: &FloatContext) -> Result<Self> {
        self.apply(ArithmeticOperation::Add, other, ctx)
    }

    /// Element-wise difference.
    pub fn sub(&self, other: &Self, ctx: &FloatContext) -> Result<Self> {
        self.apply(ArithmeticOperation::Sub, other, ctx)
    }

    /// Element-wise product.
    pub fn mul(&self, other: &Self, ctx: &FloatContext) -> Result<Self> {
        self.apply(ArithmeticOperation::Mul, other, ctx)
    }

    /// Element-wise quotient.
    pub fn div(&self, other: &Self, ctx: &FloatContext) -> Result<Self> {
        self.apply(ArithmeticOperation::Div, other, ctx)
    }

    /// Adds `scalar` to every element.
    pub fn add_scalar(&self, scalar: &Float, ctx: &FloatContext) -> Result<Self> {
        self.apply_scalar(ArithmeticOperation::Add, scalar, ctx)
    }

    /// Subtracts `scalar` from every element.
    pub fn sub_scalar(&self, scalar: &Float, ctx: &FloatContext) -> Result<Self> {
        self.apply_scalar(ArithmeticOperation::Sub, scalar, ctx)
    }

    /// Multiplies every element by `scalar`.
    pub fn mul_scalar(&self, scalar: &Float, ctx: &FloatContext) -> Result<Self> {
        self.apply_scalar(ArithmeticOperation::Mul, scalar, ctx)
    }

    /// Divides every element by `scalar`.
    pub fn div_scalar(&self, scalar: &Float, ctx: &FloatContext) -> Result<Self> {
        self.apply_scalar(ArithmeticOperation::Div, scalar, ctx)
    }
}

/*
    Array shapes

    Arrays are flat row-major buffers plus a shape; strides are derived
    on demand.
*/

use tracing::debug;

use crate::{ArithmeticOperation, Error, Result};

/// Number of elements of an array with this shape.
pub fn fold_shape(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Row-major strides, in elements.
pub fn strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

// Flat element index of a multi-dimensional index.
pub(crate) fn flat_index(shape: &[usize], index: &[usize]) -> Option<usize> {
    if index.len() != shape.len() || index.iter().zip(shape).any(|(i, d)| i >= d) {
        return None;
    }
    Some(index.iter().zip(strides(shape)).map(|(i, s)| i * s).sum())
}

pub(crate) fn check_element_count(shape: &[usize], got: usize) -> Result<()> {
    let expected = fold_shape(shape);
    if expected == got {
        Ok(())
    } else {
        Err(Error::ElementCount { expected, got })
    }
}

pub(crate) fn check_shape(op: ArithmeticOperation, lhs: &[usize], rhs: &[usize]) -> Result<()> {
    if lhs == rhs {
        return Ok(());
    }
    debug!(%op, ?lhs, ?rhs, "array shape mismatch");
    Err(Error::ShapeMismatch {
        op: op.name(),
        lhs: lhs.to_vec(),
        rhs: rhs.to_vec(),
    })
}

// Transposes a row-major buffer whose elements span `chunk` entries each.
pub(crate) fn transpose<T: Clone>(
    shape: &[usize],
    data: &[T],
    chunk: usize,
) -> Result<(Vec<usize>, Vec<T>)> {
    match shape.len() {
        0 | 1 => Ok((shape.to_vec(), data.to_vec())),
        2 => {
            let (rows, cols) = (shape[0], shape[1]);
            let mut out = Vec::with_capacity(data.len());
            for j in 0..cols {
                for i in 0..rows {
                    let k = (i * cols + j) * chunk;
                    out.extend_from_slice(&data[k..k + chunk]);
                }
            }
            Ok((vec![cols, rows], out))
        }
        ndim => {
            debug!(ndim, "transpose not implemented");
            Err(Error::NotImplemented(format!(
                "transpose of a {}-dimensional array",
                ndim
            )))
        }
    }
}

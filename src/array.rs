/*
    Arrays
*/

use crate::{ArithmeticOperation, Context, Number, Result};

mod fixed_array;
mod float_array;
mod shape;

pub use fixed_array::FixedArray;
pub use float_array::FloatArray;
pub use shape::{fold_shape, strides};

// Applies `op` element by element with one random source for the whole call.
fn zip_apply<N, L, R>(op: ArithmeticOperation, lhs: L, rhs: R, ctx: &N::Ctx) -> Result<Vec<N>>
where
    N: Number,
    L: IntoIterator<Item = N>,
    R: IntoIterator<Item = N>,
{
    let mut rng = ctx.rng();
    lhs.into_iter()
        .zip(rhs)
        .map(|(a, b)| a.apply(op, &b, ctx, &mut rng))
        .collect()
}

/*
    Top-level
*/

mod error;
mod number;
mod ops;
mod round;

pub mod array;
pub mod bcd;
pub mod fixed;
pub mod float;
pub mod limb;
pub mod quantize;

pub use array::{FixedArray, FloatArray};
pub use error::*;
pub use fixed::{Fixed, FixedFormat};
pub use float::{Float, FloatData, FloatFormat};
pub use number::*;
pub use ops::*;
pub use round::*;

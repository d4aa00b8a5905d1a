/*
    Errors
*/

use thiserror::Error;

/// Errors reported by constructors and arithmetic entry points.
///
/// Construction and arithmetic are all-or-nothing: when one of these is
/// returned, no value has been created or modified.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(
        "fixed-point needs exactly two of three bit specifiers (bits, int_bits, frac_bits), got {0}"
    )]
    BitSpecifierCount(usize),

    #[error("fixed-point needs a positive integer bit-size of at least 1 bit, got {0}")]
    NonPositiveBits(i64),

    #[error("fixed-point bit specifier {0} is outside the supported range")]
    BitSpecifierRange(i64),

    #[error("invalid floating-point format: exp_bits={exp_bits} (2..=30), man_bits={man_bits} (1..=61)")]
    InvalidFloatFormat { exp_bits: u8, man_bits: u8 },

    #[error("exponent bias {0} is outside the supported range")]
    InvalidBias(i64),

    #[error(
        "{op}: shape mismatch, lhs.shape=({lhs_shape}), rhs.shape=({rhs_shape})",
        lhs_shape = join(.lhs),
        rhs_shape = join(.rhs)
    )]
    ShapeMismatch {
        op: &'static str,
        lhs: Vec<usize>,
        rhs: Vec<usize>,
    },

    #[error("element count mismatch: shape requires {expected} elements, got {got}")]
    ElementCount { expected: usize, got: usize },

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("invalid decimal literal: {0:?}")]
    ParseDecimal(String),

    #[error("fixed-point division by zero")]
    DivisionByZero,

    #[error("non-finite value {0} cannot be represented in fixed-point")]
    NonFinite(f64),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

fn join(shape: &[usize]) -> String {
    shape
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

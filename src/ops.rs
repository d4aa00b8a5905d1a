/*
    Operations
*/

use std::fmt;

/// The binary arithmetic operations shared by scalars and arrays.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArithmeticOperation {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithmeticOperation {
    /// The name used when reporting errors.
    pub fn name(&self) -> &'static str {
        match self {
            ArithmeticOperation::Add => "add",
            ArithmeticOperation::Sub => "sub",
            ArithmeticOperation::Mul => "mul",
            ArithmeticOperation::Div => "truediv",
        }
    }
}

impl fmt::Display for ArithmeticOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

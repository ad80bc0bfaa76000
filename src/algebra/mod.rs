//! The expression tree and how it gets evaluated.

mod expr;
pub mod ops;

pub use expr::{
    BinaryOperation, Constant, Expression, SymbolGroup, UnaryOperation,
    Variable,
};
pub use ops::{Bindings, EvaluationError};

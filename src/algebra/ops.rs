//! [`Expression`] evaluation.

use crate::{BinaryOperation, Expression, UnaryOperation};
use smol_str::SmolStr;
use std::{
    collections::HashMap,
    iter::{Extend, FromIterator},
};
use thiserror::Error;

/// The values given to each variable when evaluating an [`Expression`].
///
/// Bindings are only ever borrowed during evaluation, so the same set is seen
/// by every node in the tree.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Bindings {
    values: HashMap<SmolStr, f64>,
}

impl Bindings {
    pub fn new() -> Self { Bindings::default() }

    pub fn with<S: Into<SmolStr>>(mut self, name: S, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Bind `name` to `value`, returning the value it previously had.
    pub fn insert<S: Into<SmolStr>>(
        &mut self,
        name: S,
        value: f64,
    ) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }
}

impl<S: Into<SmolStr>> Extend<(S, f64)> for Bindings {
    fn extend<T: IntoIterator<Item = (S, f64)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<S: Into<SmolStr>> FromIterator<(S, f64)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        let mut bindings = Bindings::new();
        bindings.extend(iter);
        bindings
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("Division by zero while evaluating \"{op}\"")]
    DivisionByZero { op: BinaryOperation },
    #[error("\"{op}\" is undefined for {value}")]
    DomainError { op: UnaryOperation, value: f64 },
    #[error("The variable \"{name}\" has no value")]
    UnboundVariable { name: SmolStr },
    #[error("A group containing {children} symbols can't be evaluated")]
    UnevaluableGroup { children: usize },
    #[error("Nothing is named \"{name}\"")]
    UnknownSymbol { name: SmolStr },
}

/// Evaluate an [`Expression`] tree.
///
/// Operands are evaluated left to right and the first failure is returned
/// immediately, so nothing to the right of a failing node gets evaluated.
/// A variable missing from `bindings` is an error.
pub fn evaluate(
    expr: &Expression,
    bindings: &Bindings,
) -> Result<f64, EvaluationError> {
    match expr {
        Expression::Constant(c) => Ok(c.value()),
        Expression::Variable(v) => bindings.get(v.name()).ok_or_else(|| {
            EvaluationError::UnboundVariable {
                name: v.name().into(),
            }
        }),
        Expression::Unary { op, operand } => {
            let operand = evaluate(operand, bindings)?;
            apply_unary(*op, operand)
        },
        Expression::Binary { left, right, op } => {
            let left = evaluate(left, bindings)?;
            let right = evaluate(right, bindings)?;
            apply_binary(*op, left, right)
        },
        Expression::Group(group) => match group.children() {
            [single] => evaluate(single, bindings),
            children => Err(EvaluationError::UnevaluableGroup {
                children: children.len(),
            }),
        },
    }
}

/// Combine two already-evaluated operands.
///
/// Comparisons produce `1.0` for true and `0.0` for false, treating values
/// within floating point error of each other as equal.
pub fn apply_binary(
    op: BinaryOperation,
    left: f64,
    right: f64,
) -> Result<f64, EvaluationError> {
    let value = match op {
        BinaryOperation::Add => left + right,
        BinaryOperation::Subtract => left - right,
        BinaryOperation::Multiply => left * right,
        BinaryOperation::Divide | BinaryOperation::Modulus
            if right == 0.0 =>
        {
            return Err(EvaluationError::DivisionByZero { op });
        },
        BinaryOperation::Divide => left / right,
        BinaryOperation::Modulus => floored_modulus(left, right),
        BinaryOperation::Power => left.powf(right),
        BinaryOperation::Equal => truth(approx::relative_eq!(left, right)),
        BinaryOperation::NotEqual => {
            truth(!approx::relative_eq!(left, right))
        },
    };

    log::trace!("{} {} {} => {}", left, op, right, value);

    Ok(value)
}

pub fn apply_unary(
    op: UnaryOperation,
    operand: f64,
) -> Result<f64, EvaluationError> {
    let value = match op {
        UnaryOperation::Sqrt if operand < 0.0 => {
            return Err(EvaluationError::DomainError { op, value: operand });
        },
        UnaryOperation::Sqrt => operand.sqrt(),
        UnaryOperation::Ceil => operand.ceil(),
        UnaryOperation::Floor => operand.floor(),
    };

    log::trace!("{}({}) => {}", op, operand, value);

    Ok(value)
}

/// The remainder takes the sign of the divisor, so `-7 % 3 == 2` and
/// `7 % -3 == -2`.
fn floored_modulus(left: f64, right: f64) -> f64 {
    let remainder = left % right;

    if remainder != 0.0 && (remainder < 0.0) != (right < 0.0) {
        remainder + right
    } else {
        remainder
    }
}

fn truth(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

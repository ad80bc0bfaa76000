//! The complete, explicitly enumerated set of symbol types.

use crate::{
    normalize, BinaryOperation, Constant, Expression, SymbolGroup,
    UnaryOperation,
};
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// A handle to one type of symbol.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    Binary(BinaryOperation),
    Unary(UnaryOperation),
    Constant(NamedConstant),
    Group,
}

/// The pairing of a symbol type with the tokens that spell it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SymbolDefinition {
    pub kind: SymbolKind,
    /// The canonical spelling.
    pub token: &'static str,
    /// Every accepted spelling, including `token`.
    pub aliases: &'static [&'static str],
}

impl SymbolDefinition {
    pub const fn new(
        kind: SymbolKind,
        token: &'static str,
        aliases: &'static [&'static str],
    ) -> Self {
        SymbolDefinition {
            kind,
            token,
            aliases,
        }
    }
}

impl SymbolKind {
    /// Every builtin symbol type.
    pub const ALL: &'static [SymbolKind] = &[
        SymbolKind::Binary(BinaryOperation::Add),
        SymbolKind::Binary(BinaryOperation::Subtract),
        SymbolKind::Binary(BinaryOperation::Multiply),
        SymbolKind::Binary(BinaryOperation::Divide),
        SymbolKind::Binary(BinaryOperation::Modulus),
        SymbolKind::Binary(BinaryOperation::Power),
        SymbolKind::Binary(BinaryOperation::Equal),
        SymbolKind::Binary(BinaryOperation::NotEqual),
        SymbolKind::Unary(UnaryOperation::Sqrt),
        SymbolKind::Unary(UnaryOperation::Ceil),
        SymbolKind::Unary(UnaryOperation::Floor),
        SymbolKind::Constant(NamedConstant::Pi),
        SymbolKind::Constant(NamedConstant::E),
        SymbolKind::Constant(NamedConstant::Tau),
        SymbolKind::Group,
    ];

    pub fn definition(self) -> SymbolDefinition {
        use self::{
            BinaryOperation as B, NamedConstant as C, SymbolKind as K,
            UnaryOperation as U,
        };

        let define = SymbolDefinition::new;

        match self {
            K::Binary(B::Add) => define(self, "+", &["+", "plus"]),
            K::Binary(B::Subtract) => define(self, "-", &["-", "minus"]),
            K::Binary(B::Multiply) => define(self, "*", &["*", "times", "×"]),
            K::Binary(B::Divide) => define(self, "/", &["/", "÷"]),
            K::Binary(B::Modulus) => define(self, "%", &["%", "mod"]),
            K::Binary(B::Power) => define(self, "^", &["^", "**", "power"]),
            K::Binary(B::Equal) => define(self, "=", &["=", "=="]),
            K::Binary(B::NotEqual) => define(self, "!=", &["!=", "≠", "<>"]),
            K::Unary(U::Sqrt) => define(self, "sqrt", &["sqrt", "√"]),
            K::Unary(U::Ceil) => define(self, "ceil", &["ceil", "ceiling"]),
            K::Unary(U::Floor) => define(self, "floor", &["floor"]),
            K::Constant(C::Pi) => define(self, "pi", &["pi", "π"]),
            K::Constant(C::E) => define(self, "e", &["e"]),
            K::Constant(C::Tau) => define(self, "tau", &["tau", "τ"]),
            K::Group => define(self, SymbolGroup::OPEN, &["(", ")"]),
        }
    }

    pub fn token(self) -> &'static str { self.definition().token }

    pub fn aliases(self) -> &'static [&'static str] {
        self.definition().aliases
    }

    /// How many operands [`SymbolKind::construct()`] expects.
    pub fn arity(self) -> Arity {
        match self {
            SymbolKind::Binary(_) => Arity::Binary,
            SymbolKind::Unary(_) => Arity::Unary,
            SymbolKind::Constant(_) => Arity::Nullary,
            SymbolKind::Group => Arity::Variadic,
        }
    }

    /// Create a node of this type from its operands.
    pub fn construct(
        self,
        operands: Vec<Expression>,
    ) -> Result<Expression, ArityError> {
        let found = operands.len();
        let mut operands = operands.into_iter();

        match self {
            SymbolKind::Group => {
                return Ok(Expression::Group(operands.collect()));
            },
            SymbolKind::Constant(constant) if found == 0 => {
                return Ok(Expression::Constant(Constant::named(constant)));
            },
            SymbolKind::Unary(op) => {
                if let (Some(operand), None) =
                    (operands.next(), operands.next())
                {
                    return Ok(Expression::unary(op, operand));
                }
            },
            SymbolKind::Binary(op) => {
                if let (Some(left), Some(right), None) =
                    (operands.next(), operands.next(), operands.next())
                {
                    return Ok(Expression::binary(op, left, right));
                }
            },
            SymbolKind::Constant(_) => {},
        }

        Err(ArityError {
            token: self.token(),
            expected: self.arity(),
            found,
        })
    }

    /// Strip the spacing around any of this type's aliases in `text`.
    pub fn normalize(self, text: &str) -> String {
        normalize(text, self.aliases())
    }
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.token())
    }
}

/// A well-known mathematical constant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NamedConstant {
    Pi,
    E,
    Tau,
}

impl NamedConstant {
    pub fn value(self) -> f64 {
        match self {
            NamedConstant::Pi => std::f64::consts::PI,
            NamedConstant::E => std::f64::consts::E,
            NamedConstant::Tau => 2.0 * std::f64::consts::PI,
        }
    }
}

/// The number of operands a symbol is built from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Arity {
    Nullary,
    Unary,
    Binary,
    Variadic,
}

impl Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Nullary => write!(f, "no operands"),
            Arity::Unary => write!(f, "1 operand"),
            Arity::Binary => write!(f, "2 operands"),
            Arity::Variadic => write!(f, "any number of operands"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Error)]
#[error("\"{token}\" takes {expected} but was given {found}")]
pub struct ArityError {
    pub token: &'static str,
    pub expected: Arity,
    pub found: usize,
}

use super::ops::{self, Bindings, EvaluationError};
use crate::{
    registry::ConfigurationError,
    symbols::{NamedConstant, SymbolKind},
};
use smol_str::SmolStr;
use std::{
    fmt::{self, Display, Formatter},
    iter::FromIterator,
    ops::{Add, Div, Mul, Rem, Sub},
};

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(Constant),
    Variable(Variable),
    /// An operation applied to a single operand.
    Unary {
        op: UnaryOperation,
        operand: Box<Expression>,
    },
    /// An expression involving two operands.
    Binary {
        left: Box<Expression>,
        right: Box<Expression>,
        op: BinaryOperation,
    },
    /// A parenthesised sequence of symbols.
    Group(SymbolGroup),
}

impl Expression {
    pub fn constant(value: f64) -> Self {
        Expression::Constant(Constant::new(value))
    }

    pub fn variable<S>(name: S) -> Result<Self, ConfigurationError>
    where
        S: Into<SmolStr>,
    {
        Variable::new(name).map(Expression::Variable)
    }

    pub fn unary(op: UnaryOperation, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(
        op: BinaryOperation,
        left: Expression,
        right: Expression,
    ) -> Self {
        Expression::Binary {
            left: Box::new(left),
            right: Box::new(right),
            op,
        }
    }

    pub fn sqrt(self) -> Self { Expression::unary(UnaryOperation::Sqrt, self) }

    pub fn ceil(self) -> Self { Expression::unary(UnaryOperation::Ceil, self) }

    pub fn floor(self) -> Self {
        Expression::unary(UnaryOperation::Floor, self)
    }

    pub fn pow(self, exponent: Expression) -> Self {
        Expression::binary(BinaryOperation::Power, self, exponent)
    }

    pub fn equal(self, other: Expression) -> Self {
        Expression::binary(BinaryOperation::Equal, self, other)
    }

    pub fn not_equal(self, other: Expression) -> Self {
        Expression::binary(BinaryOperation::NotEqual, self, other)
    }

    /// The canonical token spelling this node.
    pub fn token(&self) -> &str {
        match self {
            Expression::Constant(c) => c.token(),
            Expression::Variable(v) => v.token(),
            Expression::Unary { op, .. } => op.token(),
            Expression::Binary { op, .. } => op.token(),
            Expression::Group(g) => g.token(),
        }
    }

    /// Every spelling accepted for this node, canonical token first.
    pub fn aliases(&self) -> Vec<SmolStr> {
        match self {
            Expression::Constant(c) => c.aliases().to_vec(),
            Expression::Variable(v) => vec![v.name.clone()],
            Expression::Unary { op, .. } => {
                static_aliases(SymbolKind::Unary(*op))
            },
            Expression::Binary { op, .. } => {
                static_aliases(SymbolKind::Binary(*op))
            },
            Expression::Group(g) => g.aliases(),
        }
    }

    /// Evaluate this expression, looking variables up in `bindings`.
    pub fn evaluate(
        &self,
        bindings: &Bindings,
    ) -> Result<f64, EvaluationError> {
        ops::evaluate(self, bindings)
    }

    /// The raw `(left, right)` values of an [`BinaryOperation::Equal`] or
    /// [`BinaryOperation::NotEqual`] node, for callers that want to do their
    /// own comparison.
    pub fn comparison_operands(
        &self,
        bindings: &Bindings,
    ) -> Result<Option<(f64, f64)>, EvaluationError> {
        match self {
            Expression::Binary { left, right, op } if op.is_comparison() => {
                let left = left.evaluate(bindings)?;
                let right = right.evaluate(bindings)?;
                Ok(Some((left, right)))
            },
            _ => Ok(None),
        }
    }

    /// Iterate over every [`Variable`] this expression references, depth
    /// first and left to right.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        let mut found = Vec::new();
        self.collect_variables(&mut found);
        found.into_iter()
    }

    fn collect_variables<'a>(&'a self, found: &mut Vec<&'a Variable>) {
        match self {
            Expression::Constant(_) => {},
            Expression::Variable(v) => found.push(v),
            Expression::Unary { operand, .. } => {
                operand.collect_variables(found)
            },
            Expression::Binary { left, right, .. } => {
                left.collect_variables(found);
                right.collect_variables(found);
            },
            Expression::Group(g) => {
                for child in g.children() {
                    child.collect_variables(found);
                }
            },
        }
    }

    pub fn depends_on(&self, name: &str) -> bool {
        self.variables().any(|v| v.name() == name)
    }

    fn is_compound(&self) -> bool {
        match self {
            Expression::Constant(_)
            | Expression::Variable(_)
            | Expression::Unary { .. }
            | Expression::Group(_) => false,
            Expression::Binary { .. } => true,
        }
    }
}

fn static_aliases(kind: SymbolKind) -> Vec<SmolStr> {
    kind.aliases().iter().copied().map(SmolStr::new).collect()
}

/// A fixed numeric value.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    value: f64,
    token: SmolStr,
    aliases: Vec<SmolStr>,
}

impl Constant {
    /// Create a constant spelled the way `value` prints.
    pub fn new(value: f64) -> Self {
        let token = SmolStr::new(value.to_string());

        Constant {
            value,
            aliases: vec![token.clone()],
            token,
        }
    }

    /// Create a constant with its own spelling, e.g. `"g"` for `9.81`.
    pub fn with_token<S, A>(
        value: f64,
        token: S,
        aliases: A,
    ) -> Result<Self, ConfigurationError>
    where
        S: Into<SmolStr>,
        A: IntoIterator,
        A::Item: Into<SmolStr>,
    {
        let token = token.into();

        if token.trim().is_empty() {
            return Err(ConfigurationError::MissingToken {
                symbol: "constant".into(),
            });
        }

        let mut all_aliases = vec![token.clone()];

        for alias in aliases {
            let alias = alias.into();
            if !alias.trim().is_empty() && !all_aliases.contains(&alias) {
                all_aliases.push(alias);
            }
        }

        Ok(Constant {
            value,
            token,
            aliases: all_aliases,
        })
    }

    /// One of the well-known constants, spelled the way the registry knows
    /// it.
    pub fn named(constant: NamedConstant) -> Self {
        let kind = SymbolKind::Constant(constant);

        Constant {
            value: constant.value(),
            token: SmolStr::new(kind.token()),
            aliases: static_aliases(kind),
        }
    }

    pub fn value(&self) -> f64 { self.value }

    pub fn token(&self) -> &str { &self.token }

    pub fn aliases(&self) -> &[SmolStr] { &self.aliases }
}

/// A named unknown whose value is provided when evaluating.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    name: SmolStr,
    base_name: SmolStr,
}

impl Variable {
    pub fn new<S>(name: S) -> Result<Self, ConfigurationError>
    where
        S: Into<SmolStr>,
    {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(ConfigurationError::MissingToken {
                symbol: "variable".into(),
            });
        }

        // "x1", "x_2" and "x" all belong to the "x" family
        let base_name = name
            .trim_end_matches(|c: char| c.is_ascii_digit())
            .trim_end_matches('_');
        let base_name = SmolStr::new(base_name);

        Ok(Variable { name, base_name })
    }

    pub fn name(&self) -> &str { &self.name }

    /// The name without any trailing digits or underscores.
    pub fn base_name(&self) -> &str { &self.base_name }

    pub fn token(&self) -> &str { &self.name }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A parenthesised sequence of symbols.
///
/// Groups only carry structure for a parser. Evaluating one is only possible
/// when it wraps exactly one child.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SymbolGroup {
    children: Vec<Expression>,
}

impl SymbolGroup {
    pub const OPEN: &'static str = "(";
    pub const CLOSE: &'static str = ")";

    pub fn new<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Expression>,
    {
        SymbolGroup {
            children: children.into_iter().collect(),
        }
    }

    pub fn children(&self) -> &[Expression] { &self.children }

    pub fn token(&self) -> &str { SymbolGroup::OPEN }

    /// The parentheses followed by the token of each child.
    pub fn aliases(&self) -> Vec<SmolStr> {
        let mut aliases = vec![
            SmolStr::new(SymbolGroup::OPEN),
            SmolStr::new(SymbolGroup::CLOSE),
        ];

        for child in &self.children {
            let token = SmolStr::new(child.token());
            if !aliases.contains(&token) {
                aliases.push(token);
            }
        }

        aliases
    }
}

impl FromIterator<Expression> for SymbolGroup {
    fn from_iter<T: IntoIterator<Item = Expression>>(iter: T) -> Self {
        SymbolGroup::new(iter)
    }
}

/// An operation that can be applied to two arguments.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BinaryOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    Power,
    Equal,
    NotEqual,
}

impl BinaryOperation {
    pub fn token(self) -> &'static str { SymbolKind::Binary(self).token() }

    pub fn is_comparison(self) -> bool {
        match self {
            BinaryOperation::Equal | BinaryOperation::NotEqual => true,
            _ => false,
        }
    }
}

impl Display for BinaryOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// An operation applied to a single argument.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnaryOperation {
    Sqrt,
    Ceil,
    Floor,
}

impl UnaryOperation {
    pub fn token(self) -> &'static str { SymbolKind::Unary(self).token() }
}

impl Display for UnaryOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self { Expression::constant(value) }
}

impl From<Constant> for Expression {
    fn from(c: Constant) -> Self { Expression::Constant(c) }
}

impl From<Variable> for Expression {
    fn from(v: Variable) -> Self { Expression::Variable(v) }
}

impl From<SymbolGroup> for Expression {
    fn from(g: SymbolGroup) -> Self { Expression::Group(g) }
}

// define some operator overloads to make constructing an expression easier.

impl Add for Expression {
    type Output = Expression;

    fn add(self, rhs: Expression) -> Expression {
        Expression::binary(BinaryOperation::Add, self, rhs)
    }
}

impl Sub for Expression {
    type Output = Expression;

    fn sub(self, rhs: Expression) -> Expression {
        Expression::binary(BinaryOperation::Subtract, self, rhs)
    }
}

impl Mul for Expression {
    type Output = Expression;

    fn mul(self, rhs: Expression) -> Expression {
        Expression::binary(BinaryOperation::Multiply, self, rhs)
    }
}

impl Div for Expression {
    type Output = Expression;

    fn div(self, rhs: Expression) -> Expression {
        Expression::binary(BinaryOperation::Divide, self, rhs)
    }
}

impl Rem for Expression {
    type Output = Expression;

    fn rem(self, rhs: Expression) -> Expression {
        Expression::binary(BinaryOperation::Modulus, self, rhs)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(c) => write!(f, "{}", c.token()),
            Expression::Variable(v) => write!(f, "{}", v),
            Expression::Binary { left, right, op } => {
                write_compound(left, f)?;

                let op = match op {
                    BinaryOperation::Add => " + ",
                    BinaryOperation::Subtract => " - ",
                    BinaryOperation::Multiply => "*",
                    BinaryOperation::Divide => "/",
                    BinaryOperation::Modulus => " % ",
                    BinaryOperation::Power => "^",
                    BinaryOperation::Equal => " = ",
                    BinaryOperation::NotEqual => " != ",
                };
                write!(f, "{}", op)?;

                write_compound(right, f)?;

                Ok(())
            },
            Expression::Unary { op, operand } => {
                write!(f, "{}({})", op, operand)
            },
            Expression::Group(g) => {
                write!(f, "{}", SymbolGroup::OPEN)?;

                for (i, child) in g.children().iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", child)?;
                }

                write!(f, "{}", SymbolGroup::CLOSE)
            },
        }
    }
}

fn write_compound(expr: &Expression, f: &mut Formatter<'_>) -> fmt::Result {
    if expr.is_compound() {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

//! Expression trees built from composable symbols, and the registry of
//! tokens used to spell them.

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod algebra;
mod normalize;
mod registry;
mod symbols;
mod workspace;

pub use algebra::{
    BinaryOperation, Bindings, Constant, EvaluationError, Expression,
    SymbolGroup, UnaryOperation, Variable,
};
pub use normalize::{normalize, Normalizer};
pub use registry::{all_symbols, ConfigurationError, Registry, RegistryBuilder};
pub use symbols::{
    Arity, ArityError, NamedConstant, SymbolDefinition, SymbolKind,
};
pub use workspace::Workspace;

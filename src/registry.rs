//! The mapping from every known token to the type of symbol it spells.

use crate::{
    normalize::Normalizer,
    symbols::{SymbolDefinition, SymbolKind},
    SymbolGroup,
};
use once_cell::sync::Lazy;
use smol_str::SmolStr;
use std::{
    collections::BTreeMap,
    iter::{Extend, FromIterator},
};
use thiserror::Error;

static ALL_SYMBOLS: Lazy<Registry> = Lazy::new(|| match Registry::builtin() {
    Ok(registry) => registry,
    Err(e) => panic!("The builtin symbol table is malformed: {}", e),
});

/// Every builtin symbol type, keyed by its canonical token.
///
/// The registry is built the first time this is called and shared by the
/// whole process afterwards.
pub fn all_symbols() -> &'static Registry { &ALL_SYMBOLS }

/// A symbol type was defined incorrectly.
///
/// These indicate a programming mistake rather than bad input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("The {symbol} symbol doesn't define a token")]
    MissingToken { symbol: SmolStr },
    #[error("\"{token}\" is claimed by both {existing:?} and {duplicate:?}")]
    DuplicateToken {
        token: SmolStr,
        existing: SymbolKind,
        duplicate: SymbolKind,
    },
    #[error("{kind:?} was registered with two different definitions")]
    ConflictingDefinitions { kind: SymbolKind },
}

/// A lookup table from tokens to symbol types.
#[derive(Debug, Clone)]
pub struct Registry {
    symbols: BTreeMap<SmolStr, SymbolKind>,
    aliases: BTreeMap<SmolStr, SymbolKind>,
    normalizer: Normalizer,
}

impl Registry {
    pub fn builder() -> RegistryBuilder { RegistryBuilder::new() }

    /// Build a registry containing every builtin symbol type.
    pub fn builtin() -> Result<Registry, ConfigurationError> {
        SymbolKind::ALL
            .iter()
            .map(|kind| kind.definition())
            .collect::<RegistryBuilder>()
            .build()
    }

    /// Find the symbol type whose canonical token is `token`.
    pub fn get(&self, token: &str) -> Option<SymbolKind> {
        self.symbols.get(token).copied()
    }

    /// Find the symbol type spelled by `alias`, canonical or otherwise.
    pub fn lookup(&self, alias: &str) -> Option<SymbolKind> {
        self.aliases.get(alias).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.symbols.contains_key(token)
    }

    /// The canonical tokens, in sorted order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.symbols.keys().map(|token| token.as_str())
    }

    /// Every accepted spelling, in sorted order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> + '_ {
        self.aliases.keys().map(|alias| alias.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SymbolKind)> + '_ {
        self.symbols
            .iter()
            .map(|(token, kind)| (token.as_str(), *kind))
    }

    pub fn len(&self) -> usize { self.symbols.len() }

    pub fn is_empty(&self) -> bool { self.symbols.is_empty() }

    /// Normalize the spacing around every alias this registry knows about.
    pub fn normalize(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }
}

/// Explicitly registers the symbol types a [`Registry`] should know about.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RegistryBuilder {
    definitions: Vec<SymbolDefinition>,
}

impl RegistryBuilder {
    pub fn new() -> Self { RegistryBuilder::default() }

    pub fn with(mut self, definition: SymbolDefinition) -> Self {
        self.register(definition);
        self
    }

    pub fn register(&mut self, definition: SymbolDefinition) {
        self.definitions.push(definition);
    }

    /// Check every definition and build the lookup tables.
    ///
    /// A definition registered more than once only counts once. The first
    /// type to claim a token keeps it, and any other type trying to claim
    /// it is an error. Grouping punctuation is never added, although the
    /// registry's normalizer still tightens the spacing around it.
    pub fn build(self) -> Result<Registry, ConfigurationError> {
        let mut seen: BTreeMap<SymbolKind, SymbolDefinition> = BTreeMap::new();
        let mut symbols = BTreeMap::new();
        let mut aliases = BTreeMap::new();
        let mut punctuation = Vec::new();

        for definition in self.definitions {
            let kind = definition.kind;

            match seen.get(&kind) {
                Some(previous) if *previous == definition => {
                    log::trace!("{:?} was already registered", kind);
                    continue;
                },
                Some(_) => {
                    return Err(ConfigurationError::ConflictingDefinitions {
                        kind,
                    });
                },
                None => {
                    seen.insert(kind, definition);
                },
            }

            let token = definition.token.trim();

            if token.is_empty() {
                return Err(ConfigurationError::MissingToken {
                    symbol: format!("{:?}", kind).into(),
                });
            }

            if is_grouping_punctuation(token) {
                log::debug!("Not registering the grouping token \"{}\"", token);
                punctuation.extend(definition.aliases.iter().copied());
                continue;
            }

            log::trace!("Registering \"{}\" as {:?}", token, kind);
            claim(&mut symbols, token, kind)?;
            claim(&mut aliases, token, kind)?;

            for alias in definition.aliases {
                let alias = alias.trim();

                if !alias.is_empty() {
                    claim(&mut aliases, alias, kind)?;
                }
            }
        }

        log::debug!(
            "Registered {} symbols spelled {} different ways",
            symbols.len(),
            aliases.len()
        );

        // parentheses are still spaced like any other token
        let normalizer = Normalizer::new(
            aliases
                .keys()
                .map(|alias| alias.as_str())
                .chain(punctuation),
        );

        Ok(Registry {
            symbols,
            aliases,
            normalizer,
        })
    }
}

fn is_grouping_punctuation(token: &str) -> bool {
    token == SymbolGroup::OPEN || token == SymbolGroup::CLOSE
}

fn claim(
    table: &mut BTreeMap<SmolStr, SymbolKind>,
    token: &str,
    kind: SymbolKind,
) -> Result<(), ConfigurationError> {
    match table.get(token) {
        Some(existing) if *existing != kind => {
            Err(ConfigurationError::DuplicateToken {
                token: token.into(),
                existing: *existing,
                duplicate: kind,
            })
        },
        Some(_) => Ok(()),
        None => {
            table.insert(token.into(), kind);
            Ok(())
        },
    }
}

impl Extend<SymbolDefinition> for RegistryBuilder {
    fn extend<T: IntoIterator<Item = SymbolDefinition>>(&mut self, iter: T) {
        self.definitions.extend(iter);
    }
}

impl FromIterator<SymbolDefinition> for RegistryBuilder {
    fn from_iter<T: IntoIterator<Item = SymbolDefinition>>(iter: T) -> Self {
        RegistryBuilder {
            definitions: Vec::from_iter(iter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BinaryOperation, NamedConstant, UnaryOperation};
    use std::collections::HashSet;

    #[test]
    fn every_builtin_operator_is_registered() {
        let registry = all_symbols();

        let inputs = vec![
            ("+", SymbolKind::Binary(BinaryOperation::Add)),
            ("-", SymbolKind::Binary(BinaryOperation::Subtract)),
            ("*", SymbolKind::Binary(BinaryOperation::Multiply)),
            ("/", SymbolKind::Binary(BinaryOperation::Divide)),
            ("%", SymbolKind::Binary(BinaryOperation::Modulus)),
            ("^", SymbolKind::Binary(BinaryOperation::Power)),
            ("=", SymbolKind::Binary(BinaryOperation::Equal)),
            ("!=", SymbolKind::Binary(BinaryOperation::NotEqual)),
            ("sqrt", SymbolKind::Unary(UnaryOperation::Sqrt)),
            ("ceil", SymbolKind::Unary(UnaryOperation::Ceil)),
            ("floor", SymbolKind::Unary(UnaryOperation::Floor)),
            ("pi", SymbolKind::Constant(NamedConstant::Pi)),
            ("e", SymbolKind::Constant(NamedConstant::E)),
            ("tau", SymbolKind::Constant(NamedConstant::Tau)),
        ];

        for (token, should_be) in &inputs {
            assert_eq!(registry.get(token), Some(*should_be), "{}", token);
        }
        assert_eq!(registry.len(), inputs.len());
    }

    #[test]
    fn one_entry_per_token() {
        let registry = all_symbols();

        let kinds: HashSet<SymbolKind> =
            registry.iter().map(|(_, kind)| kind).collect();

        assert_eq!(kinds.len(), registry.len());
        for (token, kind) in registry.iter() {
            assert_eq!(kind.token(), token);
        }
    }

    #[test]
    fn punctuation_and_blanks_are_never_registered() {
        let registry = all_symbols();

        for token in &["(", ")", ""] {
            assert!(!registry.contains(token), "{:?}", token);
            assert_eq!(registry.lookup(token), None);
        }
    }

    #[test]
    fn look_up_aliases() {
        let registry = all_symbols();

        assert_eq!(
            registry.lookup("mod"),
            Some(SymbolKind::Binary(BinaryOperation::Modulus))
        );
        assert_eq!(
            registry.lookup("**"),
            Some(SymbolKind::Binary(BinaryOperation::Power))
        );
        assert_eq!(
            registry.lookup("√"),
            Some(SymbolKind::Unary(UnaryOperation::Sqrt))
        );
        assert_eq!(registry.lookup("mod"), registry.lookup("%"));
        assert_eq!(registry.get("mod"), None, "aliases aren't canonical");
        assert_eq!(registry.lookup("unknown"), None);
    }

    #[test]
    fn the_global_registry_is_only_built_once() {
        let first: *const Registry = all_symbols();
        let second: *const Registry = all_symbols();

        assert_eq!(first, second);
    }

    #[test]
    fn registering_a_definition_twice_is_harmless() {
        let add = SymbolKind::Binary(BinaryOperation::Add).definition();

        let registry = Registry::builder().with(add).with(add).build().unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.tokens().collect::<Vec<_>>(), vec!["+"]);
    }

    #[test]
    fn missing_tokens_are_rejected() {
        let broken = SymbolDefinition::new(
            SymbolKind::Unary(UnaryOperation::Floor),
            "  ",
            &[],
        );

        let got = Registry::builder().with(broken).build().unwrap_err();

        assert_eq!(
            got,
            ConfigurationError::MissingToken {
                symbol: "Unary(Floor)".into()
            }
        );
    }

    #[test]
    fn two_types_cant_share_a_token() {
        let add = SymbolKind::Binary(BinaryOperation::Add).definition();
        let impostor = SymbolDefinition::new(
            SymbolKind::Binary(BinaryOperation::Subtract),
            "+",
            &["+"],
        );

        let got = Registry::builder()
            .with(add)
            .with(impostor)
            .build()
            .unwrap_err();

        assert_eq!(
            got,
            ConfigurationError::DuplicateToken {
                token: "+".into(),
                existing: SymbolKind::Binary(BinaryOperation::Add),
                duplicate: SymbolKind::Binary(BinaryOperation::Subtract),
            }
        );
    }

    #[test]
    fn two_types_cant_share_an_alias() {
        let modulus = SymbolKind::Binary(BinaryOperation::Modulus).definition();
        let impostor = SymbolDefinition::new(
            SymbolKind::Binary(BinaryOperation::Divide),
            "/",
            &["/", "mod"],
        );

        let got = Registry::builder()
            .with(modulus)
            .with(impostor)
            .build()
            .unwrap_err();

        assert_eq!(
            got,
            ConfigurationError::DuplicateToken {
                token: "mod".into(),
                existing: SymbolKind::Binary(BinaryOperation::Modulus),
                duplicate: SymbolKind::Binary(BinaryOperation::Divide),
            }
        );
    }

    #[test]
    fn a_type_cant_be_defined_twice() {
        let add = SymbolKind::Binary(BinaryOperation::Add).definition();
        let respelled = SymbolDefinition::new(add.kind, "add", &["add"]);

        let got = Registry::builder()
            .with(add)
            .with(respelled)
            .build()
            .unwrap_err();

        assert_eq!(
            got,
            ConfigurationError::ConflictingDefinitions { kind: add.kind }
        );
    }

    #[test]
    fn normalize_with_every_alias() {
        let registry = all_symbols();

        assert_eq!(registry.normalize(" 2 + 3 "), "2+3");
        assert_eq!(registry.normalize("x ** 2 mod 3"), "x**2mod3");
        assert_eq!(registry.normalize("sqrt ( 4 )"), "sqrt(4)");
    }

    #[test]
    fn normalizing_leaves_words_containing_aliases_alone() {
        let registry = all_symbols();

        assert_eq!(registry.normalize("time step"), "time step");
        assert_eq!(registry.normalize("rate x"), "rate x");
        assert_eq!(registry.normalize("timeout + 1"), "timeout+1");
        assert_eq!(registry.normalize("2 * pi"), "2*pi");
    }

    #[test]
    fn normalize_with_one_types_aliases() {
        let add = SymbolKind::Binary(BinaryOperation::Add);

        assert_eq!(add.normalize(" 2 + 3 "), "2+3");
        assert_eq!(add.normalize("2  +   3"), "2+3");
        assert_eq!(add.normalize("2 - 3"), "2 - 3");
    }
}

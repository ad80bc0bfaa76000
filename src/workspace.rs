use crate::algebra::{Bindings, EvaluationError, Expression};
use smol_str::SmolStr;
use std::iter::{Extend, FromIterator};

/// A collection of named expressions which can be evaluated by name.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Workspace {
    entries: Vec<(SmolStr, Expression)>,
}

impl Workspace {
    pub fn new() -> Self { Workspace::default() }

    pub fn with<S: Into<SmolStr>>(mut self, name: S, expr: Expression) -> Self {
        self.insert(name, expr);
        self
    }

    /// Add an expression, returning whatever previously had that name.
    pub fn insert<S: Into<SmolStr>>(
        &mut self,
        name: S,
        expr: Expression,
    ) -> Option<Expression> {
        let name = name.into();

        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, expr)),
            None => {
                self.entries.push((name, expr));
                None
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, expr)| expr)
    }

    pub fn remove(&mut self, name: &str) -> Option<Expression> {
        let index = self
            .entries
            .iter()
            .position(|(existing, _)| existing == name)?;
        Some(self.entries.remove(index).1)
    }

    /// The names in the order they were first added.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Evaluate the expression called `name`.
    pub fn evaluate(
        &self,
        name: &str,
        bindings: &Bindings,
    ) -> Result<f64, EvaluationError> {
        let expr = self.get(name).ok_or_else(|| {
            EvaluationError::UnknownSymbol { name: name.into() }
        })?;

        expr.evaluate(bindings)
    }

    /// Evaluate every expression, stopping at the first failure.
    pub fn evaluate_all(
        &self,
        bindings: &Bindings,
    ) -> Result<Vec<(SmolStr, f64)>, EvaluationError> {
        let mut values = Vec::with_capacity(self.entries.len());

        for (name, expr) in &self.entries {
            values.push((name.clone(), expr.evaluate(bindings)?));
        }

        Ok(values)
    }
}

impl<S: Into<SmolStr>> Extend<(S, Expression)> for Workspace {
    fn extend<T: IntoIterator<Item = (S, Expression)>>(&mut self, iter: T) {
        for (name, expr) in iter {
            self.insert(name, expr);
        }
    }
}

impl<S: Into<SmolStr>> FromIterator<(S, Expression)> for Workspace {
    fn from_iter<T: IntoIterator<Item = (S, Expression)>>(iter: T) -> Self {
        let mut workspace = Workspace::new();
        workspace.extend(iter);
        workspace
    }
}

impl<'a> IntoIterator for &'a Workspace {
    type IntoIter = <&'a [(SmolStr, Expression)] as IntoIterator>::IntoIter;
    type Item = &'a (SmolStr, Expression);

    fn into_iter(self) -> Self::IntoIter { self.entries.iter() }
}

impl IntoIterator for Workspace {
    type IntoIter = <Vec<(SmolStr, Expression)> as IntoIterator>::IntoIter;
    type Item = (SmolStr, Expression);

    fn into_iter(self) -> Self::IntoIter { self.entries.into_iter() }
}

//! # Predicates
//!
//! A predicate is a column, an operator and exactly `operator.arity()`
//! literal arguments. Predicate sets are conjunctions; there is no OR and no
//! nesting.

use serde::Serialize;

use super::errors::{ModelError, ModelResult};
use super::operator::Operator;
use super::table::Table;

/// A single column predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Predicate {
    column: String,
    operator: Operator,
    arguments: Vec<String>,
}

impl Predicate {
    /// Create a predicate, checking the argument count against the arity.
    ///
    /// The column is not checked here; see [`PredicateSet::resolve`].
    pub fn new(
        column: impl Into<String>,
        operator: Operator,
        arguments: Vec<String>,
    ) -> ModelResult<Self> {
        if arguments.len() != operator.arity() {
            return Err(ModelError::ArityMismatch {
                operator: operator.as_str(),
                expected: operator.arity(),
                supplied: arguments.len(),
            });
        }

        Ok(Self {
            column: column.into(),
            operator,
            arguments,
        })
    }

    /// Create an equality predicate
    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator: Operator::Equals,
            arguments: vec![value.into()],
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

/// An ordered, non-empty conjunction of predicates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredicateSet {
    predicates: Vec<Predicate>,
}

impl PredicateSet {
    pub fn new(predicates: Vec<Predicate>) -> ModelResult<Self> {
        if predicates.is_empty() {
            return Err(ModelError::EmptyPredicateSet);
        }
        Ok(Self { predicates })
    }

    pub fn single(predicate: Predicate) -> Self {
        Self {
            predicates: vec![predicate],
        }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Total number of bind arguments across all predicates
    pub fn argument_count(&self) -> usize {
        self.predicates.iter().map(|p| p.arguments.len()).sum()
    }

    /// Rewrite every column to its declared spelling in `table`
    pub(crate) fn resolve(self, table: &Table) -> ModelResult<Self> {
        let predicates = self
            .predicates
            .into_iter()
            .map(|p| {
                Ok(Predicate {
                    column: table.resolve_column(&p.column)?,
                    ..p
                })
            })
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Self { predicates })
    }
}

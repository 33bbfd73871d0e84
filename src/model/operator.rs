//! # Predicate Operators
//!
//! Closed set of comparison operators. Operator text is shared by every
//! dialect; only clause placement and identifier quoting differ.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Predicate operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equals,
    Like,
    Between,
    IsNull,
    IsNotNull,
    GreaterThan,
    GreaterThanEquals,
    LessThan,
    LessThanEquals,
}

impl Operator {
    /// Number of literal arguments the operator consumes
    pub fn arity(&self) -> usize {
        match self {
            Operator::IsNull | Operator::IsNotNull => 0,
            Operator::Between => 2,
            _ => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "EQUALS",
            Operator::Like => "LIKE",
            Operator::Between => "BETWEEN",
            Operator::IsNull => "IS_NULL",
            Operator::IsNotNull => "IS_NOT_NULL",
            Operator::GreaterThan => "GREATER_THAN",
            Operator::GreaterThanEquals => "GREATER_THAN_EQUALS",
            Operator::LessThan => "LESS_THAN",
            Operator::LessThanEquals => "LESS_THAN_EQUALS",
        }
    }

    /// SQL keyword or symbol placed after the column
    pub fn sql(&self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::Like => "LIKE",
            Operator::Between => "BETWEEN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::GreaterThan => ">",
            Operator::GreaterThanEquals => ">=",
            Operator::LessThan => "<",
            Operator::LessThanEquals => "<=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

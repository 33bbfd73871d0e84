//! # Finder Errors

use thiserror::Error;

use crate::model::ModelError;
use crate::taxonomy::OutcomeCategory;

/// Result type for finder parsing
pub type FinderResult<T> = Result<T, FinderError>;

/// Dynamic finder and request-parameter parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinderError {
    /// Expression lacks the `findAllBy` prefix or a field
    #[error("Malformed finder expression: {0}")]
    Malformed(String),

    /// Clause ends in something that is not a known operator
    #[error("Unknown operator in clause {0}")]
    UnknownOperator(String),

    /// Field does not name a column of the resource
    #[error("Unknown field {field} in {resource}")]
    UnknownField { resource: String, field: String },

    /// Argument count differs from the sum of operator arities
    #[error("Finder expects {expected} argument(s), got {supplied}")]
    ArgumentMismatch { expected: usize, supplied: usize },

    /// No argument list at all (distinct from an empty one)
    #[error("Finder arguments are missing")]
    MissingArguments,

    /// Statement model rejected the parsed input
    #[error("{0}")]
    Model(#[from] ModelError),
}

impl FinderError {
    /// Caller broke the operation contract rather than sending a bad request
    pub fn is_precondition(&self) -> bool {
        matches!(self, FinderError::MissingArguments)
    }

    pub fn category(&self) -> OutcomeCategory {
        if self.is_precondition() {
            OutcomeCategory::Internal
        } else {
            OutcomeCategory::BadRequest
        }
    }
}

//! # Statement Model Errors
//!
//! Errors raised while building statements, mutations and stored calls.
//! All of them are recoverable request errors and surface as BAD_REQUEST.

use thiserror::Error;

/// Result type for statement model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Statement model construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Column is not declared by the table
    #[error("Column {column} does not exist in {table}")]
    UnknownColumn { table: String, column: String },

    /// Identifier cannot be safely rendered into SQL text
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Predicate argument count does not match the operator arity
    #[error("Operator {operator} expects {expected} argument(s), got {supplied}")]
    ArityMismatch {
        operator: &'static str,
        expected: usize,
        supplied: usize,
    },

    /// Explicit projection without any column
    #[error("Column projection cannot be empty")]
    EmptyProjection,

    /// Predicate set without any predicate
    #[error("Predicate set cannot be empty")]
    EmptyPredicateSet,

    /// Payload is not a flat JSON object
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Mutation without any value
    #[error("Payload for {0} cannot be empty")]
    EmptyPayload(String),

    /// Page size exceeds the configured maximum
    #[error("Page size {0} exceeds maximum {1}")]
    PageSizeExceeded(usize, usize),

    /// Invalid paging or ordering parameter
    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    /// Stored call specification is inconsistent
    #[error("Invalid call specification: {0}")]
    InvalidCall(String),
}

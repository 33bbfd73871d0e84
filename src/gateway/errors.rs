//! # Gateway Contract Errors
//!
//! Raised when a caller breaks the operation contract. These never become an
//! outcome category inside the gateway; the transport decides how to report
//! them.

use thiserror::Error;

/// Result type for gateway operations
pub type ContractResult<T> = Result<T, ContractError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// Alias is not configured
    #[error("Unknown alias: {0}")]
    UnknownAlias(String),

    /// Finder called without an argument list
    #[error("Finder arguments are missing")]
    MissingArguments,
}

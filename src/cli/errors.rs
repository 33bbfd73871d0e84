//! CLI-specific error types
//!
//! Every CLI error ends the process with exit code 1.

use std::fmt;
use std::io;

use crate::config::ConfigError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file unreadable or malformed
    Config(&'static str),
    /// stdout failure
    IoError,
    /// Alias not declared in the configuration
    UnknownAlias,
    /// Unknown dialect name
    UnknownDialect,
    /// Read could not be rendered
    RenderFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(code) => *code,
            Self::IoError => "TABLEGATE_CLI_IO_ERROR",
            Self::UnknownAlias => "TABLEGATE_CLI_UNKNOWN_ALIAS",
            Self::UnknownDialect => "TABLEGATE_CLI_UNKNOWN_DIALECT",
            Self::RenderFailed => "TABLEGATE_CLI_RENDER_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn unknown_alias(alias: &str) -> Self {
        Self::new(CliErrorCode::UnknownAlias, format!("Alias {} is not configured", alias))
    }

    pub fn unknown_dialect(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::UnknownDialect, msg)
    }

    pub fn render_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::RenderFailed, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(CliErrorCode::Config(e.code()), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

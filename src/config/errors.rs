//! # Configuration Errors

use thiserror::Error;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Cannot read {path}: {reason}")]
    Io { path: String, reason: String },

    /// File is not valid configuration JSON
    #[error("Invalid configuration: {0}")]
    Parse(String),

    /// Required setting is missing or empty
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    /// Environment override has an unusable value
    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    /// No alias configured
    #[error("At least one alias must be configured")]
    NoAliases,

    /// Alias name is empty, repeated or not path-safe
    #[error("Invalid alias: {0}")]
    InvalidAlias(String),

    /// Alias has no database name
    #[error("Alias {0} has no database")]
    MissingDatabase(String),

    /// Declared table is inconsistent
    #[error("Invalid table {table} in alias {alias}: {reason}")]
    InvalidTable {
        alias: String,
        table: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "TABLEGATE_CONFIG_IO",
            ConfigError::Parse(_) => "TABLEGATE_CONFIG_PARSE",
            _ => "TABLEGATE_CONFIG_INVALID",
        }
    }
}

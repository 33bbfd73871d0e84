//! # Table Metadata
//!
//! Tables are supplied once per alias by the metadata collaborator and are
//! never mutated afterwards.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::{ModelError, ModelResult};

/// Primary key assumed for tables the metadata collaborator does not know
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Semantic column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Decimal,
    Text,
    Boolean,
    Timestamp,
    Date,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Decimal => "decimal",
            ColumnType::Text => "text",
            ColumnType::Boolean => "boolean",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Date => "date",
        }
    }
}

/// A declared column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// A table, view or other row source exposed as a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    primary_key: String,
    columns: Vec<Column>,
    resolved: bool,
}

impl Table {
    /// Create a table known to the metadata collaborator
    pub fn new(name: impl Into<String>, primary_key: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            primary_key: primary_key.into(),
            columns,
            resolved: true,
        }
    }

    /// Create a table the metadata collaborator does not know.
    ///
    /// Column checks are deferred to the database; only identifier syntax is
    /// checked locally.
    pub fn unresolved(name: impl Into<String>) -> ModelResult<Self> {
        let name = name.into();
        validate_identifier(&name)?;
        Ok(Self {
            name,
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            columns: Vec::new(),
            resolved: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Find a declared column, ignoring case
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Resolve a caller-supplied column name to its declared spelling.
    ///
    /// Unresolved tables accept any syntactically valid identifier.
    pub fn resolve_column(&self, name: &str) -> ModelResult<String> {
        if !self.resolved {
            validate_identifier(name)?;
            return Ok(name.to_string());
        }

        self.column(name)
            .map(|c| c.name.clone())
            .ok_or_else(|| ModelError::UnknownColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }
}

fn identifier_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*(\.[A-Za-z_][A-Za-z0-9_$]*)?$").ok())
        .as_ref()
}

/// Check that an identifier can be written into SQL text verbatim
pub fn validate_identifier(name: &str) -> ModelResult<()> {
    if identifier_pattern().is_some_and(|p| p.is_match(name)) {
        Ok(())
    } else {
        Err(ModelError::InvalidIdentifier(name.to_string()))
    }
}

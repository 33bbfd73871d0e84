//! Interfaces the gateway needs from the outside world: table metadata and a
//! database driver. Both are shared across requests and must be safe for
//! concurrent use.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::dialect::{RenderedCall, RenderedSql};
use crate::model::Table;
use crate::taxonomy::VendorSignal;

/// One result row, keyed by column label
pub type Row = Map<String, Value>;

/// Table metadata per alias
pub trait MetadataSource: Send + Sync {
    /// Every table declared for `alias`
    fn tables(&self, alias: &str) -> Vec<Arc<Table>>;

    /// The declared table named `name` (case-insensitive)
    fn table(&self, alias: &str, name: &str) -> Option<Arc<Table>>;
}

/// Metadata held in memory, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    tables: HashMap<String, Vec<Arc<Table>>>,
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, alias: impl Into<String>, table: Table) -> Self {
        self.tables
            .entry(alias.into())
            .or_default()
            .push(Arc::new(table));
        self
    }
}

impl MetadataSource for StaticMetadata {
    fn tables(&self, alias: &str) -> Vec<Arc<Table>> {
        self.tables.get(alias).cloned().unwrap_or_default()
    }

    fn table(&self, alias: &str, name: &str) -> Option<Arc<Table>> {
        self.tables
            .get(alias)?
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .cloned()
    }
}

/// Result of executing one statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionOutcome {
    /// Column labels in select order
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// Rows written by a mutation
    pub affected: u64,
}

impl ExecutionOutcome {
    pub fn rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            affected: 0,
        }
    }

    pub fn affected(affected: u64) -> Self {
        Self {
            affected,
            ..Self::default()
        }
    }

    /// Read the single value of a `COUNT(*)` result
    pub fn count(&self) -> Option<usize> {
        let value = self.rows.first()?.values().next()?;
        match value {
            Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Driver failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// The database rejected the statement
    #[error("{message} (state {}, code {})", .signal.state, .signal.code)]
    Vendor { signal: VendorSignal, message: String },

    /// No connection could be obtained or the statement timed out
    #[error("Database unavailable: {0}")]
    Unavailable(String),
}

impl DriverError {
    pub fn vendor(state: impl Into<String>, code: i32, message: impl Into<String>) -> Self {
        DriverError::Vendor {
            signal: VendorSignal::new(state, code),
            message: message.into(),
        }
    }
}

/// Executes rendered SQL for an alias. Calls block the current thread.
pub trait DatabaseDriver: Send + Sync {
    fn execute(&self, alias: &str, statement: &RenderedSql) -> Result<ExecutionOutcome, DriverError>;

    /// Run the dialect's table enumeration statement and return table names
    fn list_tables(&self, alias: &str, statement: &str) -> Result<Vec<String>, DriverError>;

    /// Run a routine call; OUT values come back as a single row
    fn call(&self, alias: &str, call: &RenderedCall) -> Result<ExecutionOutcome, DriverError>;
}

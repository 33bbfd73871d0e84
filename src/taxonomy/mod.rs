//! # Error Taxonomy
//!
//! Maps vendor error signals, a SQLSTATE string plus a vendor integer code,
//! onto the closed set of outcome categories the gateway returns. Raw vendor
//! text never leaves this module: a [`Diagnostic`] carries the category, the
//! two raw values and a category-level message.

mod tables;

use std::fmt;

use serde::Serialize;

use crate::dialect::DialectKind;
use crate::observability::{log_event_with_fields, Event};

pub use tables::SignalRule;

/// Outcome of one gateway operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeCategory {
    Ok,
    Created,
    BadRequest,
    NotFound,
    NoContent,
    Conflict,
    Internal,
}

impl OutcomeCategory {
    /// HTTP status code for this category
    pub fn status_code(&self) -> u16 {
        match self {
            OutcomeCategory::Ok => 200,
            OutcomeCategory::Created => 201,
            OutcomeCategory::NoContent => 204,
            OutcomeCategory::BadRequest => 400,
            OutcomeCategory::NotFound => 404,
            OutcomeCategory::Conflict => 409,
            OutcomeCategory::Internal => 500,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeCategory::Ok | OutcomeCategory::Created)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeCategory::Ok => "OK",
            OutcomeCategory::Created => "CREATED",
            OutcomeCategory::BadRequest => "BAD_REQUEST",
            OutcomeCategory::NotFound => "NOT_FOUND",
            OutcomeCategory::NoContent => "NO_CONTENT",
            OutcomeCategory::Conflict => "CONFLICT",
            OutcomeCategory::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the failing statement read or wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Read,
    Mutation,
}

/// Raw failure signal reported by a driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorSignal {
    pub state: String,
    pub code: i32,
}

impl VendorSignal {
    pub fn new(state: impl Into<String>, code: i32) -> Self {
        Self {
            state: state.into(),
            code,
        }
    }

    /// Connection exception class (`08xxx`)
    pub fn is_connection_failure(&self) -> bool {
        self.state.starts_with("08")
    }
}

/// Classified failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: OutcomeCategory,
    pub sql_state: String,
    pub sql_code: i32,
    pub message: String,
}

const UNMAPPED: &str = "Database operation failed";
const UNAVAILABLE: &str = "Database unavailable";
const INVALID_NAME: &str = "Invalid object name";

fn table_for(kind: DialectKind) -> &'static [SignalRule] {
    match kind {
        DialectKind::Hsql => tables::HSQL,
        DialectKind::H2 => tables::H2,
        DialectKind::Derby => tables::DERBY,
        DialectKind::Postgres => tables::POSTGRES,
        DialectKind::MySql => tables::MYSQL,
        DialectKind::Oracle => tables::ORACLE,
        DialectKind::SqlServer => tables::SQLSERVER,
    }
}

fn lookup(kind: DialectKind, signal: &VendorSignal) -> Option<&'static SignalRule> {
    let family = table_for(kind);
    let state = signal.state.as_str();

    family
        .iter()
        .find(|r| r.state == state && r.code == Some(signal.code))
        .or_else(|| family.iter().find(|r| r.state == state && r.code.is_none()))
        .or_else(|| {
            tables::STANDARD
                .iter()
                .find(|r| r.state == state && r.code.is_none())
        })
}

/// Classify a vendor signal for the given family.
///
/// "No data" becomes NOT_FOUND for reads and NO_CONTENT for mutations.
/// Connection failures and unknown signals become INTERNAL; unknown
/// signals are logged.
pub fn classify(kind: DialectKind, signal: &VendorSignal, intent: Intent) -> Diagnostic {
    let (category, message) = if signal.is_connection_failure() {
        (OutcomeCategory::Internal, UNAVAILABLE)
    } else {
        match lookup(kind, signal) {
            Some(rule) => (rule.category, rule.message),
            None => {
                let code = signal.code.to_string();
                log_event_with_fields(
                    Event::UnmappedVendorSignal,
                    &[
                        ("dialect", kind.as_str()),
                        ("sql_state", signal.state.as_str()),
                        ("sql_code", code.as_str()),
                    ],
                );
                (OutcomeCategory::Internal, UNMAPPED)
            }
        }
    };

    let category = match (category, intent) {
        (OutcomeCategory::NotFound, Intent::Mutation) => OutcomeCategory::NoContent,
        (c, _) => c,
    };

    Diagnostic {
        category,
        sql_state: signal.state.clone(),
        sql_code: signal.code,
        message: message.to_string(),
    }
}

/// Diagnostic for a driver that could not reach the database
pub fn unavailable() -> Diagnostic {
    Diagnostic {
        category: OutcomeCategory::Internal,
        sql_state: "08000".to_string(),
        sql_code: 0,
        message: UNAVAILABLE.to_string(),
    }
}

/// Diagnostic for a resource name that cannot be rendered as an identifier.
/// Raised locally, so the state is the standard "invalid name" and the
/// vendor code is 0.
pub fn invalid_name() -> Diagnostic {
    Diagnostic {
        category: OutcomeCategory::BadRequest,
        sql_state: "42602".to_string(),
        sql_code: 0,
        message: INVALID_NAME.to_string(),
    }
}

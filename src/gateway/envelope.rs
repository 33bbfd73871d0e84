//! Response envelope: success flag, category, rows and pagination, or the
//! failure diagnostics.

use serde::Serialize;

use crate::model::Pagination;
use crate::taxonomy::{Diagnostic, OutcomeCategory};

use super::collaborators::Row;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub success: bool,
    pub category: OutcomeCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Row>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    fn bare(category: OutcomeCategory) -> Self {
        Self {
            success: category.is_success(),
            category,
            rows: None,
            pagination: None,
            sql_state: None,
            sql_code: None,
            message: None,
        }
    }

    pub fn ok(rows: Vec<Row>) -> Self {
        Self {
            rows: Some(rows),
            ..Self::bare(OutcomeCategory::Ok)
        }
    }

    pub fn page(rows: Vec<Row>, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::ok(rows)
        }
    }

    pub fn created(row: Row) -> Self {
        Self {
            rows: Some(vec![row]),
            ..Self::bare(OutcomeCategory::Created)
        }
    }

    /// Envelope carrying only a category (NOT_FOUND, NO_CONTENT, ...)
    pub fn status(category: OutcomeCategory) -> Self {
        Self::bare(category)
    }

    /// Request rejected before reaching the database
    pub fn rejected(category: OutcomeCategory, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::bare(category)
        }
    }

    /// Database failure after classification
    pub fn failed(diagnostic: Diagnostic) -> Self {
        Self {
            sql_state: Some(diagnostic.sql_state),
            sql_code: Some(diagnostic.sql_code),
            message: Some(diagnostic.message),
            ..Self::bare(diagnostic.category)
        }
    }

    pub fn rows(&self) -> &[Row] {
        self.rows.as_deref().unwrap_or(&[])
    }
}

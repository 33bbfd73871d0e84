//! Static vendor signal tables, one per database family, plus the standard
//! SQLSTATE fallbacks shared by every family.
//!
//! Exact `(state, code)` entries are checked before state-only entries.

use super::OutcomeCategory::{self, BadRequest, Conflict, Internal, NotFound};

/// One row of a signal table. `code: None` matches any vendor code.
#[derive(Debug, Clone, Copy)]
pub struct SignalRule {
    pub state: &'static str,
    pub code: Option<i32>,
    pub category: OutcomeCategory,
    pub message: &'static str,
}

const fn exact(
    state: &'static str,
    code: i32,
    category: OutcomeCategory,
    message: &'static str,
) -> SignalRule {
    SignalRule {
        state,
        code: Some(code),
        category,
        message,
    }
}

const fn state(state: &'static str, category: OutcomeCategory, message: &'static str) -> SignalRule {
    SignalRule {
        state,
        code: None,
        category,
        message,
    }
}

const TABLE_OR_COLUMN: &str = "Table or column not found";
const INVALID_VALUE: &str = "Invalid value for column type";
const INVALID_DATETIME: &str = "Invalid date or time value";
const NOT_NULL: &str = "Required column is missing a value";
const UNIQUE: &str = "Record already exists";
const FOREIGN_KEY: &str = "Referenced record conflict";
const SYNTAX: &str = "Malformed statement";
const TYPE_MISMATCH: &str = "Incompatible data type";

pub const HSQL: &[SignalRule] = &[
    exact("42501", -5501, BadRequest, TABLE_OR_COLUMN),
    exact("22018", -3438, BadRequest, INVALID_VALUE),
    exact("42561", -5561, BadRequest, TYPE_MISMATCH),
    exact("23502", -10, BadRequest, NOT_NULL),
    exact("22007", -3407, BadRequest, INVALID_DATETIME),
    exact("23505", -104, Conflict, UNIQUE),
    exact("23503", -177, Conflict, FOREIGN_KEY),
    exact("42581", -5581, BadRequest, SYNTAX),
];

pub const H2: &[SignalRule] = &[
    exact("42S02", 42102, BadRequest, TABLE_OR_COLUMN),
    exact("42S22", 42122, BadRequest, TABLE_OR_COLUMN),
    exact("22018", 22018, BadRequest, INVALID_VALUE),
    exact("22007", 22007, BadRequest, INVALID_DATETIME),
    exact("23502", 23502, BadRequest, NOT_NULL),
    exact("23505", 23505, Conflict, UNIQUE),
    exact("23506", 23506, Conflict, FOREIGN_KEY),
    exact("23503", 23503, Conflict, FOREIGN_KEY),
    exact("42000", 42000, BadRequest, SYNTAX),
    exact("42001", 42001, BadRequest, SYNTAX),
];

pub const DERBY: &[SignalRule] = &[
    state("42X05", BadRequest, TABLE_OR_COLUMN),
    state("42X04", BadRequest, TABLE_OR_COLUMN),
    state("42X14", BadRequest, TABLE_OR_COLUMN),
    state("42X01", BadRequest, SYNTAX),
    state("42821", BadRequest, TYPE_MISMATCH),
    state("42818", BadRequest, TYPE_MISMATCH),
];

pub const POSTGRES: &[SignalRule] = &[
    state("42P01", BadRequest, TABLE_OR_COLUMN),
    state("42703", BadRequest, TABLE_OR_COLUMN),
    state("22P02", BadRequest, INVALID_VALUE),
    state("42804", BadRequest, TYPE_MISMATCH),
    state("42883", BadRequest, TYPE_MISMATCH),
    state("42601", BadRequest, SYNTAX),
];

pub const MYSQL: &[SignalRule] = &[
    exact("42S02", 1146, BadRequest, TABLE_OR_COLUMN),
    exact("42S22", 1054, BadRequest, TABLE_OR_COLUMN),
    exact("23000", 1048, BadRequest, NOT_NULL),
    exact("23000", 1062, Conflict, UNIQUE),
    exact("23000", 1451, Conflict, FOREIGN_KEY),
    exact("23000", 1452, Conflict, FOREIGN_KEY),
    exact("22007", 1292, BadRequest, INVALID_DATETIME),
    exact("HY000", 1366, BadRequest, INVALID_VALUE),
    exact("42000", 1064, BadRequest, SYNTAX),
];

pub const ORACLE: &[SignalRule] = &[
    exact("42000", 942, BadRequest, TABLE_OR_COLUMN),
    exact("42000", 904, BadRequest, TABLE_OR_COLUMN),
    exact("42000", 1722, BadRequest, INVALID_VALUE),
    exact("42000", 900, BadRequest, SYNTAX),
    exact("23000", 1400, BadRequest, NOT_NULL),
    exact("23000", 1, Conflict, UNIQUE),
    exact("23000", 2291, Conflict, FOREIGN_KEY),
    exact("23000", 2292, Conflict, FOREIGN_KEY),
    exact("22008", 1861, BadRequest, INVALID_DATETIME),
    exact("22008", 1843, BadRequest, INVALID_DATETIME),
];

pub const SQLSERVER: &[SignalRule] = &[
    exact("S0002", 208, BadRequest, TABLE_OR_COLUMN),
    exact("42S02", 208, BadRequest, TABLE_OR_COLUMN),
    exact("S0001", 207, BadRequest, TABLE_OR_COLUMN),
    exact("42S22", 207, BadRequest, TABLE_OR_COLUMN),
    exact("23000", 515, BadRequest, NOT_NULL),
    exact("23000", 2627, Conflict, UNIQUE),
    exact("23000", 2601, Conflict, UNIQUE),
    exact("23000", 547, Conflict, FOREIGN_KEY),
    exact("22007", 241, BadRequest, INVALID_DATETIME),
    exact("22018", 245, BadRequest, INVALID_VALUE),
    exact("42000", 102, BadRequest, SYNTAX),
];

/// Standard SQLSTATE values understood regardless of family
pub const STANDARD: &[SignalRule] = &[
    state("02000", NotFound, "No data"),
    state("22001", BadRequest, "Value too long for column"),
    state("22003", BadRequest, "Numeric value out of range"),
    state("22007", BadRequest, INVALID_DATETIME),
    state("22008", BadRequest, INVALID_DATETIME),
    state("22018", BadRequest, INVALID_VALUE),
    state("23502", BadRequest, NOT_NULL),
    state("23503", Conflict, FOREIGN_KEY),
    state("23505", Conflict, UNIQUE),
    state("42000", BadRequest, SYNTAX),
    state("42601", BadRequest, SYNTAX),
    state("42S02", BadRequest, TABLE_OR_COLUMN),
    state("42S22", BadRequest, TABLE_OR_COLUMN),
    state("HYT00", Internal, "Statement timed out"),
];

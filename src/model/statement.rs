//! # Select Statements
//!
//! Vendor-neutral description of a read: table, projection, predicates,
//! ordering and paging. Built once per request and never mutated afterwards.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::errors::{ModelError, ModelResult};
use super::predicate::PredicateSet;
use super::table::Table;

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Maximum number of rows per page
pub const MAX_PAGE_SIZE: usize = 1000;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    pub fn sql(&self) -> &'static str {
        match self {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        }
    }

    /// Parse `asc` / `desc` (any case)
    pub fn parse(value: &str) -> ModelResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Ascending),
            "desc" => Ok(Direction::Descending),
            _ => Err(ModelError::InvalidParameter {
                name: "dir",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql())
    }
}

/// Requested ordering. A missing column means the table's primary key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ordering {
    pub column: Option<String>,
    pub direction: Direction,
}

impl Ordering {
    pub fn by(column: impl Into<String>, direction: Direction) -> Self {
        Self {
            column: Some(column.into()),
            direction,
        }
    }
}

/// Requested page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PagingWindow {
    size: usize,
    offset: usize,
}

impl Default for PagingWindow {
    fn default() -> Self {
        Self {
            size: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl PagingWindow {
    /// The window must end at a representable row number
    pub fn new(size: usize, offset: usize) -> ModelResult<Self> {
        if size > MAX_PAGE_SIZE {
            return Err(ModelError::PageSizeExceeded(size, MAX_PAGE_SIZE));
        }
        if offset.checked_add(size).is_none() {
            return Err(ModelError::InvalidParameter {
                name: "offset",
                value: offset.to_string(),
            });
        }
        Ok(Self { size, offset })
    }

    /// Parse optional `limit` / `offset` request parameters
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> ModelResult<Self> {
        let size = match limit {
            Some(v) => parse_count("limit", v)?,
            None => DEFAULT_PAGE_SIZE,
        };
        let offset = match offset {
            Some(v) => parse_count("offset", v)?,
            None => 0,
        };
        Self::new(size, offset)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Row number one past the last row of the page
    pub fn end(&self) -> usize {
        self.offset + self.size
    }
}

fn parse_count(name: &'static str, value: &str) -> ModelResult<usize> {
    value.trim().parse().map_err(|_| ModelError::InvalidParameter {
        name,
        value: value.to_string(),
    })
}

/// Column projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    All,
    Columns(Vec<String>),
}

/// A select statement
#[derive(Debug, Clone)]
pub struct Statement {
    table: Arc<Table>,
    projection: Projection,
    predicates: Option<PredicateSet>,
    ordering: Option<(String, Direction)>,
    paging: Option<PagingWindow>,
}

impl Statement {
    /// Select all columns of all records
    pub fn select(table: Arc<Table>) -> Self {
        Self {
            table,
            projection: Projection::All,
            predicates: None,
            ordering: None,
            paging: None,
        }
    }

    /// Restrict the statement to records matching `predicates`
    pub fn with_predicates(mut self, predicates: PredicateSet) -> ModelResult<Self> {
        self.predicates = Some(predicates.resolve(&self.table)?);
        Ok(self)
    }

    /// Select only the given columns
    pub fn with_columns<I, S>(mut self, columns: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = columns
            .into_iter()
            .map(|c| self.table.resolve_column(c.as_ref()))
            .collect::<ModelResult<Vec<_>>>()?;

        if columns.is_empty() {
            return Err(ModelError::EmptyProjection);
        }
        self.projection = Projection::Columns(columns);
        Ok(self)
    }

    pub fn with_ordering(mut self, ordering: Ordering) -> ModelResult<Self> {
        let column = match ordering.column {
            Some(column) => self.table.resolve_column(&column)?,
            None => self.table.primary_key().to_string(),
        };
        self.ordering = Some((column, ordering.direction));
        Ok(self)
    }

    pub fn with_paging(mut self, paging: PagingWindow) -> Self {
        self.paging = Some(paging);
        self
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn predicates(&self) -> Option<&PredicateSet> {
        self.predicates.as_ref()
    }

    pub fn ordering(&self) -> Option<(&str, Direction)> {
        self.ordering.as_ref().map(|(c, d)| (c.as_str(), *d))
    }

    pub fn paging(&self) -> Option<PagingWindow> {
        self.paging
    }

    pub fn selects_all_columns(&self) -> bool {
        self.projection == Projection::All
    }

    pub fn selects_all_records(&self) -> bool {
        self.predicates.is_none()
    }
}

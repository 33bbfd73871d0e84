//! # Dialect Engine
//!
//! Renders statements, mutations and routine calls into vendor SQL text and
//! ordered bind values. Clause order is fixed: projection, source table,
//! filter, ordering, paging. Dialects decide how and where paging is written,
//! how identifiers are quoted and how placeholders are spelled; operator text
//! is shared.
//!
//! Rendering is pure: no I/O and no mutation of the inputs.

mod builder;
mod derby;
mod h2;
mod hsql;
mod mysql;
mod oracle;
mod postgres;
mod sqlserver;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{
    BindValue, Mutation, ParamDirection, PagingWindow, Predicate, PredicateSet, Projection,
    Statement, StoredCall,
};

pub use builder::{PlaceholderStyle, QuoteStyle, RenderedSql, SqlBuilder};
pub use derby::DerbyDialect;
pub use h2::H2Dialect;
pub use hsql::HsqlDialect;
pub use mysql::MySqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use sqlserver::SqlServerDialect;

/// Supported database families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DialectKind {
    Hsql,
    H2,
    Derby,
    Postgres,
    MySql,
    Oracle,
    SqlServer,
}

impl DialectKind {
    pub const ALL: [DialectKind; 7] = [
        DialectKind::Hsql,
        DialectKind::H2,
        DialectKind::Derby,
        DialectKind::Postgres,
        DialectKind::MySql,
        DialectKind::Oracle,
        DialectKind::SqlServer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DialectKind::Hsql => "hsql",
            DialectKind::H2 => "h2",
            DialectKind::Derby => "derby",
            DialectKind::Postgres => "postgresql",
            DialectKind::MySql => "mysql",
            DialectKind::Oracle => "oracle",
            DialectKind::SqlServer => "sqlserver",
        }
    }

    /// Build the dialect implementation for this family
    pub fn dialect(&self) -> Arc<dyn Dialect> {
        match self {
            DialectKind::Hsql => Arc::new(HsqlDialect),
            DialectKind::H2 => Arc::new(H2Dialect),
            DialectKind::Derby => Arc::new(DerbyDialect),
            DialectKind::Postgres => Arc::new(PostgresDialect),
            DialectKind::MySql => Arc::new(MySqlDialect),
            DialectKind::Oracle => Arc::new(OracleDialect),
            DialectKind::SqlServer => Arc::new(SqlServerDialect),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DialectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hsql" | "hsqldb" | "hsql_mem" => Ok(DialectKind::Hsql),
            "h2" | "h2_mem" => Ok(DialectKind::H2),
            "derby" => Ok(DialectKind::Derby),
            "postgresql" | "postgres" | "pg" => Ok(DialectKind::Postgres),
            "mysql" | "mariadb" => Ok(DialectKind::MySql),
            "oracle" => Ok(DialectKind::Oracle),
            "sqlserver" | "mssql" => Ok(DialectKind::SqlServer),
            other => Err(format!("unknown dialect: {}", other)),
        }
    }
}

impl TryFrom<String> for DialectKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DialectKind> for String {
    fn from(kind: DialectKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One bound slot of a routine call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "direction", rename_all = "lowercase")]
pub enum CallBinding {
    In { value: BindValue },
    Out { name: String, declared_type: String },
}

/// Rendered routine call; bindings follow placeholder order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCall {
    pub sql: String,
    pub bindings: Vec<CallBinding>,
}

/// Vendor SQL rendering rules
pub trait Dialect: Send + Sync {
    fn kind(&self) -> DialectKind;

    /// Statement enumerating every user table of the target database
    fn list_tables_statement(&self) -> &'static str;

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Positional
    }

    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::None
    }

    fn builder(&self) -> SqlBuilder {
        SqlBuilder::new(self.placeholder_style(), self.quote_style())
    }

    /// Write the paging clause after the ordering clause
    fn push_paging(&self, builder: &mut SqlBuilder, _statement: &Statement, paging: PagingWindow) {
        builder.push_str(format!(" LIMIT {} OFFSET {}", paging.size(), paging.offset()));
    }

    fn render_select(&self, statement: &Statement) -> RenderedSql {
        let mut builder = self.builder();
        push_select(&mut builder, statement);
        if let Some(paging) = statement.paging() {
            self.push_paging(&mut builder, statement, paging);
        }
        builder.finish()
    }

    /// Count every record the statement filters, ignoring ordering and paging
    fn render_count(&self, statement: &Statement) -> RenderedSql {
        let mut builder = self.builder();
        builder.push_str("SELECT COUNT(*) FROM ");
        builder.push_identifier(statement.table().name());
        if let Some(predicates) = statement.predicates() {
            builder.push_str(" WHERE ");
            push_predicates(&mut builder, predicates);
        }
        builder.finish()
    }

    fn render_mutation(&self, mutation: &Mutation) -> RenderedSql {
        let mut builder = self.builder();
        push_mutation(&mut builder, mutation);
        builder.finish()
    }

    fn render_call(&self, call: &StoredCall) -> RenderedCall {
        let mut builder = self.builder();
        builder.push_str("CALL ");
        builder.push_identifier(call.routine());
        builder.push('(');
        let bindings = push_call_arguments(&mut builder, call);
        builder.push(')');
        RenderedCall {
            sql: builder.finish().sql,
            bindings,
        }
    }
}

/// `SELECT <projection> FROM <table> [WHERE ...] [ORDER BY ...]`
pub(crate) fn push_select(builder: &mut SqlBuilder, statement: &Statement) {
    builder.push_str("SELECT ");
    match statement.projection() {
        Projection::All => builder.push('*'),
        Projection::Columns(columns) => {
            builder.push_iter(columns, ", ", |b, c| b.push_identifier(c));
        }
    }
    builder.push_str(" FROM ");
    builder.push_identifier(statement.table().name());

    if let Some(predicates) = statement.predicates() {
        builder.push_str(" WHERE ");
        push_predicates(builder, predicates);
    }

    if let Some((column, direction)) = statement.ordering() {
        builder.push_str(" ORDER BY ");
        builder.push_identifier(column);
        builder.push(' ');
        builder.push_str(direction.sql());
    }
}

pub(crate) fn push_predicates(builder: &mut SqlBuilder, predicates: &PredicateSet) {
    builder.push_iter(predicates.predicates(), " AND ", push_predicate);
}

fn push_predicate(builder: &mut SqlBuilder, predicate: &Predicate) {
    builder.push_identifier(predicate.column());
    builder.push(' ');
    builder.push_str(predicate.operator().sql());

    let mut arguments = predicate.arguments().iter();
    if let Some(first) = arguments.next() {
        builder.push(' ');
        builder.push_bind(BindValue::text(first.as_str()));
    }
    for argument in arguments {
        builder.push_str(" AND ");
        builder.push_bind(BindValue::text(argument.as_str()));
    }
}

fn push_mutation(builder: &mut SqlBuilder, mutation: &Mutation) {
    match mutation {
        Mutation::Insert { table, values } => {
            builder.push_str("INSERT INTO ");
            builder.push_identifier(table.name());
            builder.push_str(" (");
            builder.push_iter(values, ", ", |b, (column, _)| b.push_identifier(column));
            builder.push_str(") VALUES (");
            builder.push_iter(values, ", ", |b, (_, value)| b.push_bind(value.clone()));
            builder.push(')');
        }
        Mutation::Update { table, values, key } => {
            builder.push_str("UPDATE ");
            builder.push_identifier(table.name());
            builder.push_str(" SET ");
            builder.push_iter(values, ", ", |b, (column, value)| {
                b.push_identifier(column);
                b.push_str(" = ");
                b.push_bind(value.clone());
            });
            builder.push_str(" WHERE ");
            push_predicate(builder, key);
        }
        Mutation::Delete { table, key } => {
            builder.push_str("DELETE FROM ");
            builder.push_identifier(table.name());
            builder.push_str(" WHERE ");
            push_predicate(builder, key);
        }
    }
}

/// Push `?, ?, ...` for every call parameter and describe each slot
pub(crate) fn push_call_arguments(builder: &mut SqlBuilder, call: &StoredCall) -> Vec<CallBinding> {
    let mut bindings = Vec::with_capacity(call.params().len());
    builder.push_iter(call.arguments(), ", ", |b, (param, value)| {
        b.push_placeholder();
        let binding = match param.direction() {
            ParamDirection::In => CallBinding::In {
                value: value.clone(),
            },
            ParamDirection::Out => CallBinding::Out {
                name: param.name.clone(),
                declared_type: param.declared_type.clone(),
            },
        };
        bindings.push(binding);
    });
    bindings
}

/// Immutable alias to dialect lookup, built once at startup
#[derive(Clone, Default)]
pub struct DialectRegistry {
    dialects: HashMap<String, Arc<dyn Dialect>>,
}

impl DialectRegistry {
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (S, DialectKind)>,
        S: Into<String>,
    {
        Self {
            dialects: aliases
                .into_iter()
                .map(|(alias, kind)| (alias.into(), kind.dialect()))
                .collect(),
        }
    }

    pub fn get(&self, alias: &str) -> Option<Arc<dyn Dialect>> {
        self.dialects.get(alias).cloned()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.dialects.contains_key(alias)
    }
}

impl fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut aliases: Vec<_> = self
            .dialects
            .iter()
            .map(|(alias, d)| (alias.as_str(), d.kind()))
            .collect();
        aliases.sort_by(|a, b| a.0.cmp(b.0));
        f.debug_struct("DialectRegistry")
            .field("aliases", &aliases)
            .finish()
    }
}

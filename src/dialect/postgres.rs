//! PostgreSQL dialect: numbered `$n` placeholders, trailing `LIMIT/OFFSET`.

use super::{Dialect, DialectKind, PlaceholderStyle};

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn list_tables_statement(&self) -> &'static str {
        "SELECT table_name FROM information_schema.tables WHERE table_schema = current_schema() AND table_type = 'BASE TABLE'"
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Numbered
    }
}

//! MySQL / MariaDB dialect: backtick quoting and `LIMIT offset, count`.

use crate::model::{PagingWindow, Statement};

use super::{Dialect, DialectKind, QuoteStyle, SqlBuilder};

#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::MySql
    }

    fn list_tables_statement(&self) -> &'static str {
        "SELECT table_name FROM information_schema.tables WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE'"
    }

    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::Backtick
    }

    fn push_paging(&self, builder: &mut SqlBuilder, _statement: &Statement, paging: PagingWindow) {
        builder.push_str(format!(" LIMIT {}, {}", paging.offset(), paging.size()));
    }
}

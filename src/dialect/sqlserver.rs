//! SQL Server dialect: bracket quoting, `OFFSET/FETCH` paging and `EXEC`.

use crate::model::{PagingWindow, Statement, StoredCall};

use super::{push_call_arguments, Dialect, DialectKind, QuoteStyle, RenderedCall, SqlBuilder};

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDialect;

impl Dialect for SqlServerDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::SqlServer
    }

    fn list_tables_statement(&self) -> &'static str {
        "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_TYPE = 'BASE TABLE'"
    }

    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::Bracket
    }

    fn push_paging(&self, builder: &mut SqlBuilder, statement: &Statement, paging: PagingWindow) {
        // OFFSET is only valid after ORDER BY
        if statement.ordering().is_none() {
            builder.push_str(" ORDER BY (SELECT NULL)");
        }
        builder.push_str(format!(
            " OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
            paging.offset(),
            paging.size()
        ));
    }

    fn render_call(&self, call: &StoredCall) -> RenderedCall {
        let mut builder = self.builder();
        builder.push_str("EXEC ");
        builder.push_identifier(call.routine());
        let bindings = if call.params().is_empty() {
            Vec::new()
        } else {
            builder.push(' ');
            push_call_arguments(&mut builder, call)
        };
        RenderedCall {
            sql: builder.finish().sql,
            bindings,
        }
    }
}

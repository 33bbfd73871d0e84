//! Oracle dialect. Paging wraps the whole select in a ROWNUM window so it
//! works on releases without `FETCH FIRST`.

use crate::model::{Statement, StoredCall};

use super::{push_call_arguments, push_select, Dialect, DialectKind, RenderedCall, RenderedSql};

#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDialect;

impl Dialect for OracleDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Oracle
    }

    fn list_tables_statement(&self) -> &'static str {
        "SELECT table_name FROM user_tables"
    }

    fn render_select(&self, statement: &Statement) -> RenderedSql {
        let mut builder = self.builder();
        let Some(paging) = statement.paging() else {
            push_select(&mut builder, statement);
            return builder.finish();
        };

        builder.push_str("SELECT * FROM (SELECT q.*, ROWNUM rnum__ FROM (");
        push_select(&mut builder, statement);
        builder.push_str(format!(
            ") q WHERE ROWNUM <= {}) WHERE rnum__ > {}",
            paging.end(),
            paging.offset()
        ));
        builder.finish()
    }

    fn render_call(&self, call: &StoredCall) -> RenderedCall {
        let mut builder = self.builder();
        builder.push_str("BEGIN ");
        builder.push_identifier(call.routine());
        builder.push('(');
        let bindings = push_call_arguments(&mut builder, call);
        builder.push_str("); END;");
        RenderedCall {
            sql: builder.finish().sql,
            bindings,
        }
    }
}

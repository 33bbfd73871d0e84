//! Apache Derby dialect: SQL:2008 `OFFSET .. ROWS FETCH NEXT .. ROWS ONLY`.

use crate::model::{PagingWindow, Statement};

use super::{Dialect, DialectKind, SqlBuilder};

#[derive(Debug, Clone, Copy, Default)]
pub struct DerbyDialect;

impl Dialect for DerbyDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Derby
    }

    fn list_tables_statement(&self) -> &'static str {
        "SELECT TABLENAME FROM SYS.SYSTABLES WHERE TABLETYPE = 'T'"
    }

    fn push_paging(&self, builder: &mut SqlBuilder, _statement: &Statement, paging: PagingWindow) {
        builder.push_str(format!(
            " OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
            paging.offset(),
            paging.size()
        ));
    }
}

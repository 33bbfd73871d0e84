//! H2 dialect. Same clause layout as HyperSQL; tables live in the standard
//! information schema.

use super::{Dialect, DialectKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct H2Dialect;

impl Dialect for H2Dialect {
    fn kind(&self) -> DialectKind {
        DialectKind::H2
    }

    fn list_tables_statement(&self) -> &'static str {
        "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_TYPE IN ('TABLE', 'BASE TABLE')"
    }
}

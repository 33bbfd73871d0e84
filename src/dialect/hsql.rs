//! HyperSQL dialect: trailing `LIMIT n OFFSET m`, unquoted identifiers.

use super::{Dialect, DialectKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct HsqlDialect;

impl Dialect for HsqlDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Hsql
    }

    fn list_tables_statement(&self) -> &'static str {
        "SELECT * FROM INFORMATION_SCHEMA.SYSTEM_TABLES WHERE table_type = 'TABLE'"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::test_support::a_table;
    use crate::model::{
        BindValue, Mutation, Operator, Ordering, PagingWindow, Payload, Predicate, PredicateSet,
        Statement, StoredCall,
    };

    fn render(statement: &Statement) -> String {
        HsqlDialect.render_select(statement).sql
    }

    fn filtered(predicate: Predicate) -> Statement {
        Statement::select(a_table())
            .with_predicates(PredicateSet::single(predicate))
            .unwrap()
    }

    #[test]
    fn test_select() {
        assert_eq!(render(&Statement::select(a_table())), "SELECT * FROM a_table");

        let statement = filtered(Predicate::equals("tableId", "1"));
        let rendered = HsqlDialect.render_select(&statement);
        assert_eq!(rendered.sql, "SELECT * FROM a_table WHERE tableId = ?");
        assert_eq!(rendered.binds, vec![BindValue::text("1")]);

        assert_eq!(
            render(&filtered(Predicate::equals("name", "1"))),
            "SELECT * FROM a_table WHERE name = ?"
        );

        assert_eq!(
            render(&filtered(Predicate::equals("tableId", "1")).with_paging(PagingWindow::default())),
            "SELECT * FROM a_table WHERE tableId = ? LIMIT 25 OFFSET 0"
        );

        let ordered = filtered(Predicate::equals("tableId", "1"))
            .with_ordering(Ordering::default())
            .unwrap()
            .with_paging(PagingWindow::new(25, 0).unwrap());
        assert_eq!(
            render(&ordered),
            "SELECT * FROM a_table WHERE tableId = ? ORDER BY tableId ASC LIMIT 25 OFFSET 0"
        );
    }

    #[test]
    fn test_select_between() {
        let predicate =
            Predicate::new("tableId", Operator::Between, vec!["1".into(), "2".into()]).unwrap();
        let rendered = HsqlDialect.render_select(&filtered(predicate));
        assert_eq!(rendered.sql, "SELECT * FROM a_table WHERE tableId BETWEEN ? AND ?");
        assert_eq!(rendered.binds, vec![BindValue::text("1"), BindValue::text("2")]);
    }

    #[test]
    fn test_select_like() {
        let predicate = Predicate::new("tableId", Operator::Like, vec!["1".into()]).unwrap();
        assert_eq!(
            render(&filtered(predicate)),
            "SELECT * FROM a_table WHERE tableId LIKE ?"
        );
    }

    #[test]
    fn test_select_is_null() {
        let predicate = Predicate::new("tableId", Operator::IsNull, vec![]).unwrap();
        let rendered = HsqlDialect.render_select(&filtered(predicate));
        assert_eq!(rendered.sql, "SELECT * FROM a_table WHERE tableId IS NULL");
        assert!(rendered.binds.is_empty());
    }

    #[test]
    fn test_select_is_not_null() {
        let predicate = Predicate::new("tableId", Operator::IsNotNull, vec![]).unwrap();
        assert_eq!(
            render(&filtered(predicate)),
            "SELECT * FROM a_table WHERE tableId IS NOT NULL"
        );
    }

    #[test]
    fn test_select_columns() {
        let statement = Statement::select(a_table()).with_columns(["name", "age"]).unwrap();
        assert_eq!(render(&statement), "SELECT name, age FROM a_table");
    }

    #[test]
    fn test_count() {
        let statement = filtered(Predicate::equals("name", "foo"))
            .with_ordering(Ordering::default())
            .unwrap()
            .with_paging(PagingWindow::default());
        assert_eq!(
            HsqlDialect.render_count(&statement).sql,
            "SELECT COUNT(*) FROM a_table WHERE name = ?"
        );
    }

    #[test]
    fn test_insert() {
        let payload = Payload::from_pairs([("name", "foo"), ("age", "33")]);
        let rendered = HsqlDialect.render_mutation(&Mutation::insert(a_table(), &payload).unwrap());
        assert_eq!(rendered.sql, "INSERT INTO a_table (name, age) VALUES (?, ?)");
        assert_eq!(rendered.binds, vec![BindValue::text("foo"), BindValue::text("33")]);
    }

    #[test]
    fn test_update() {
        let payload = Payload::from_pairs([("age", "90")]);
        let mutation = Mutation::update(a_table(), &payload, "tableId", "0").unwrap();
        let rendered = HsqlDialect.render_mutation(&mutation);
        assert_eq!(rendered.sql, "UPDATE a_table SET age = ? WHERE tableId = ?");
        assert_eq!(rendered.binds, vec![BindValue::text("90"), BindValue::text("0")]);
    }

    #[test]
    fn test_delete() {
        let mutation = Mutation::delete(a_table(), "tableId", "1").unwrap();
        assert_eq!(
            HsqlDialect.render_mutation(&mutation).sql,
            "DELETE FROM a_table WHERE tableId = ?"
        );
    }

    #[test]
    fn test_call() {
        let call = StoredCall::from_json(
            "get_year_sales",
            r#"[{"value":2010,"name":"in_year","type":"INTEGER","index":1},{"name":"out_total","outParameter":true,"type":"INTEGER","index":2}]"#,
        )
        .unwrap();
        let rendered = HsqlDialect.render_call(&call);
        assert_eq!(rendered.sql, "CALL get_year_sales(?, ?)");
        assert_eq!(rendered.bindings.len(), 2);
    }
}

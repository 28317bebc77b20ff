use super::{double_quoted, qualified, Dialect};

/// DuckDB: double-quoted identifiers, `?` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDbDialect;

impl Dialect for DuckDbDialect {
    fn create_schema(&self, schema: &str) -> String {
        format!("CREATE SCHEMA IF NOT EXISTS {};", double_quoted(schema))
    }

    fn create_table(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (id VARCHAR NOT NULL PRIMARY KEY, applied_at TIMESTAMP NOT NULL);",
            qualified(schema, table, double_quoted)
        )
    }

    fn insert_record(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "INSERT INTO {} (id, applied_at) VALUES (?, ?);",
            qualified(schema, table, double_quoted)
        )
    }

    fn delete_record(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "DELETE FROM {} WHERE id = ?;",
            qualified(schema, table, double_quoted)
        )
    }

    fn select_records(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "SELECT id, applied_at FROM {} ORDER BY id ASC;",
            qualified(schema, table, double_quoted)
        )
    }
}

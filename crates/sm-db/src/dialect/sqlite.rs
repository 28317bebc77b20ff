use super::{double_quoted, Dialect};

/// SQLite: no schemas, so the schema argument is ignored everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn create_schema(&self, _schema: &str) -> String {
        "SELECT 1;".to_string()
    }

    fn create_table(&self, _schema: Option<&str>, table: &str) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (id TEXT NOT NULL PRIMARY KEY, applied_at DATETIME NOT NULL);",
            double_quoted(table)
        )
    }

    fn insert_record(&self, _schema: Option<&str>, table: &str) -> String {
        format!(
            "INSERT INTO {} (id, applied_at) VALUES (?, ?);",
            double_quoted(table)
        )
    }

    fn delete_record(&self, _schema: Option<&str>, table: &str) -> String {
        format!("DELETE FROM {} WHERE id = ?;", double_quoted(table))
    }

    fn select_records(&self, _schema: Option<&str>, table: &str) -> String {
        format!(
            "SELECT id, applied_at FROM {} ORDER BY id ASC;",
            double_quoted(table)
        )
    }
}

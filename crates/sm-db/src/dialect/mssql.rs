use super::{qualified, quote_with, string_literal, Dialect};

fn bracketed(ident: &str) -> String {
    quote_with(ident, '[', ']')
}

/// SQL Server: bracketed identifiers, `@pN` placeholders.
///
/// SQL Server has no `IF NOT EXISTS` clause for DDL, so existence is checked
/// against the catalog first.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsSqlDialect;

impl Dialect for MsSqlDialect {
    fn create_schema(&self, schema: &str) -> String {
        let ddl = format!("CREATE SCHEMA {}", bracketed(schema));
        format!(
            "IF NOT EXISTS (SELECT 1 FROM sys.schemas WHERE name = N'{}') EXEC('{}');",
            string_literal(schema),
            string_literal(&ddl)
        )
    }

    fn create_table(&self, schema: Option<&str>, table: &str) -> String {
        let name = qualified(schema, table, bracketed);
        format!(
            "IF OBJECT_ID(N'{}', N'U') IS NULL CREATE TABLE {} (id NVARCHAR(255) NOT NULL PRIMARY KEY, applied_at DATETIME2 NOT NULL);",
            string_literal(&name),
            name
        )
    }

    fn insert_record(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "INSERT INTO {} (id, applied_at) VALUES (@p1, @p2);",
            qualified(schema, table, bracketed)
        )
    }

    fn delete_record(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "DELETE FROM {} WHERE id = @p1;",
            qualified(schema, table, bracketed)
        )
    }

    fn select_records(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "SELECT id, applied_at FROM {} ORDER BY id ASC;",
            qualified(schema, table, bracketed)
        )
    }
}

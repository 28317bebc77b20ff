use super::{double_quoted, qualified, string_literal, Dialect};

/// Oracle folds unquoted names to upper case; quote them the same way.
fn upper_quoted(ident: &str) -> String {
    double_quoted(&ident.to_uppercase())
}

/// Oracle (oci8 and godror drivers): `:n` placeholders.
///
/// Schemas are database users in Oracle and are never created here, so
/// `create_schema` is an empty PL/SQL block. Table creation swallows
/// ORA-00955 (name already used) to get `IF NOT EXISTS` semantics.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDialect;

impl Dialect for OracleDialect {
    fn create_schema(&self, _schema: &str) -> String {
        "BEGIN NULL; END;".to_string()
    }

    fn create_table(&self, schema: Option<&str>, table: &str) -> String {
        let ddl = format!(
            "CREATE TABLE {} (id VARCHAR2(4000) NOT NULL PRIMARY KEY, applied_at TIMESTAMP WITH TIME ZONE NOT NULL)",
            qualified(schema, table, upper_quoted)
        );
        format!(
            "BEGIN EXECUTE IMMEDIATE '{}'; EXCEPTION WHEN OTHERS THEN IF SQLCODE != -955 THEN RAISE; END IF; END;",
            string_literal(&ddl)
        )
    }

    fn insert_record(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "INSERT INTO {} (id, applied_at) VALUES (:1, :2)",
            qualified(schema, table, upper_quoted)
        )
    }

    fn delete_record(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "DELETE FROM {} WHERE id = :1",
            qualified(schema, table, upper_quoted)
        )
    }

    fn select_records(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "SELECT id, applied_at FROM {} ORDER BY id ASC",
            qualified(schema, table, upper_quoted)
        )
    }
}

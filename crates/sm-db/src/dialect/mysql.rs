use super::{qualified, quote_with, Dialect};

fn backticked(ident: &str) -> String {
    quote_with(ident, '`', '`')
}

/// MySQL: backtick identifiers, `?` placeholders, explicit storage engine.
#[derive(Debug, Clone)]
pub struct MySqlDialect {
    engine: String,
    charset: String,
}

impl Default for MySqlDialect {
    fn default() -> Self {
        Self::new("InnoDB", "utf8mb4")
    }
}

impl MySqlDialect {
    /// Dialect creating the table with the given engine and default charset
    pub fn new(engine: &str, charset: &str) -> Self {
        Self {
            engine: engine.to_string(),
            charset: charset.to_string(),
        }
    }
}

impl Dialect for MySqlDialect {
    fn create_schema(&self, schema: &str) -> String {
        format!("CREATE SCHEMA IF NOT EXISTS {};", backticked(schema))
    }

    fn create_table(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (id VARCHAR(255) NOT NULL PRIMARY KEY, applied_at DATETIME NOT NULL) ENGINE={} DEFAULT CHARSET={};",
            qualified(schema, table, backticked),
            self.engine,
            self.charset
        )
    }

    fn insert_record(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "INSERT INTO {} (id, applied_at) VALUES (?, ?);",
            qualified(schema, table, backticked)
        )
    }

    fn delete_record(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "DELETE FROM {} WHERE id = ?;",
            qualified(schema, table, backticked)
        )
    }

    fn select_records(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "SELECT id, applied_at FROM {} ORDER BY id ASC;",
            qualified(schema, table, backticked)
        )
    }
}

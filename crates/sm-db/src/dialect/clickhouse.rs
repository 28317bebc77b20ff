use super::{double_quoted, qualified, Dialect};

/// ClickHouse: schemas are databases, the table needs an explicit engine.
///
/// Record deletion is an `ALTER TABLE ... DELETE` mutation, so the default
/// engine is a MergeTree; `TinyLog` and other log engines cannot run it.
#[derive(Debug, Clone)]
pub struct ClickHouseDialect {
    engine: String,
    cluster: Option<String>,
}

impl Default for ClickHouseDialect {
    fn default() -> Self {
        Self {
            engine: "MergeTree() ORDER BY id".to_string(),
            cluster: None,
        }
    }
}

impl ClickHouseDialect {
    /// Use `engine` (everything after `ENGINE =`) for the bookkeeping table
    pub fn with_engine(mut self, engine: &str) -> Self {
        self.engine = engine.to_string();
        self
    }

    /// Create the schema and table `ON CLUSTER cluster`
    pub fn with_cluster(mut self, cluster: &str) -> Self {
        self.cluster = (!cluster.is_empty()).then(|| cluster.to_string());
        self
    }

    fn on_cluster(&self) -> String {
        self.cluster
            .as_deref()
            .map(|c| format!(" ON CLUSTER {}", double_quoted(c)))
            .unwrap_or_default()
    }
}

impl Dialect for ClickHouseDialect {
    fn create_schema(&self, schema: &str) -> String {
        format!(
            "CREATE DATABASE IF NOT EXISTS {}{};",
            double_quoted(schema),
            self.on_cluster()
        )
    }

    fn create_table(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {}{} (id String, applied_at DateTime64(6, 'UTC')) ENGINE = {};",
            qualified(schema, table, double_quoted),
            self.on_cluster(),
            self.engine
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
            "ALTER TABLE {}{} DELETE WHERE id = ?;",
            qualified(schema, table, double_quoted),
            self.on_cluster()
        )
    }

    fn select_records(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "SELECT id, applied_at FROM {} ORDER BY id ASC;",
            qualified(schema, table, double_quoted)
        )
    }
}

//! Bookkeeping SQL dialects
//!
//! A dialect supplies the five statements the repository needs to manage the
//! bookkeeping table: create schema, create table, insert record, delete
//! record, and select records. Templates are complete statements including
//! their terminator and engine-specific bind placeholders; the repository
//! passes them to the backend verbatim. Oracle is the exception: its plain
//! insert, delete and select statements have no `;`, which its drivers reject.
//!
//! Dialects are looked up by name in a [`DialectRegistry`], built explicitly
//! with [`DialectRegistry::with_builtins`] and extended with
//! [`DialectRegistry::register`].

mod clickhouse;
mod duckdb;
mod mssql;
mod mysql;
mod oracle;
mod postgres;
mod snowflake;
mod sqlite;

pub use self::clickhouse::ClickHouseDialect;
pub use self::duckdb::DuckDbDialect;
pub use self::mssql::MsSqlDialect;
pub use self::mysql::MySqlDialect;
pub use self::oracle::OracleDialect;
pub use self::postgres::PostgresDialect;
pub use self::snowflake::SnowflakeDialect;
pub use self::sqlite::SqliteDialect;

use crate::error::{DbError, DbResult};
use std::collections::BTreeMap;
use std::sync::Arc;

/// SQL templates for one database engine.
pub trait Dialect: Send + Sync {
    /// Statement creating `schema` if it does not exist
    fn create_schema(&self, schema: &str) -> String;

    /// Statement creating the bookkeeping table if it does not exist
    fn create_table(&self, schema: Option<&str>, table: &str) -> String;

    /// Insert of one record; binds id then applied_at
    fn insert_record(&self, schema: Option<&str>, table: &str) -> String;

    /// Delete of one record; binds id
    fn delete_record(&self, schema: Option<&str>, table: &str) -> String;

    /// Select of all records as (id, applied_at), ordered by id
    fn select_records(&self, schema: Option<&str>, table: &str) -> String;
}

/// Dialects addressable by name.
#[derive(Clone, Default)]
pub struct DialectRegistry {
    dialects: BTreeMap<String, Arc<dyn Dialect>>,
}

impl DialectRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every bundled dialect under its usual driver names.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register("duckdb", DuckDbDialect)
            .register("postgres", PostgresDialect)
            .register("sqlite3", SqliteDialect)
            .register("mysql", MySqlDialect::default())
            .register("mssql", MsSqlDialect)
            .register("oci8", OracleDialect)
            .register("godror", OracleDialect)
            .register("snowflake", SnowflakeDialect)
            .register("clickhouse", ClickHouseDialect::default());
        registry
    }

    /// Register `dialect` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, dialect: impl Dialect + 'static) -> &mut Self {
        self.dialects.insert(name.to_string(), Arc::new(dialect));
        self
    }

    /// Look up a dialect by name
    pub fn get(&self, name: &str) -> DbResult<Arc<dyn Dialect>> {
        self.dialects
            .get(name)
            .cloned()
            .ok_or_else(|| DbError::UnknownDialect {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.dialects.keys().map(String::as_str).collect()
    }
}

/// Wrap `ident` in `open`/`close`, doubling any embedded `close` character.
pub(crate) fn quote_with(ident: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(ident.len() + 2);
    out.push(open);
    for c in ident.chars() {
        if c == close {
            out.push(close);
        }
        out.push(c);
    }
    out.push(close);
    out
}

/// `"ident"`
pub(crate) fn double_quoted(ident: &str) -> String {
    quote_with(ident, '"', '"')
}

/// Qualified table name, `schema.table` or bare `table`, using `quote`.
pub(crate) fn qualified(schema: Option<&str>, table: &str, quote: fn(&str) -> String) -> String {
    match schema {
        Some(schema) => format!("{}.{}", quote(schema), quote(table)),
        None => quote(table),
    }
}

/// Escape a value for a single-quoted SQL string literal.
pub(crate) fn string_literal(text: &str) -> String {
    text.replace('\'', "''")
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;

//! Database abstraction traits

use crate::error::DbResult;
use chrono::{DateTime, Utc};
use std::fmt;

/// A bound parameter or a decoded column value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// One result row, in column order.
pub type Row = Vec<SqlValue>;

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Integer(v) => write!(f, "{v}"),
            SqlValue::Text(s) => write!(f, "{s:?}"),
            SqlValue::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(ts: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(ts)
    }
}

/// Anything that can run parameterized SQL: a connection or a transaction.
pub trait SqlExecutor {
    /// Execute a statement, returning the number of affected rows
    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize>;

    /// Run a query and collect all rows
    fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>>;
}

/// An open transaction. Dropping it without commit rolls it back.
pub trait DbTransaction: SqlExecutor {
    /// Commit the transaction
    fn commit(self: Box<Self>) -> DbResult<()>;

    /// Roll back the transaction
    fn rollback(self: Box<Self>) -> DbResult<()>;
}

/// Database connection capable of starting transactions.
pub trait Database: SqlExecutor + Send + Sync {
    /// Begin a transaction on this connection
    fn begin(&self) -> DbResult<Box<dyn DbTransaction + '_>>;

    /// Get the database type name
    fn db_type(&self) -> &'static str;
}

//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Database, DbTransaction, Row, SqlExecutor, SqlValue};
use chrono::{DateTime, NaiveDateTime, Utc};
use duckdb::types::{TimeUnit, ToSql, ToSqlOutput, Value, ValueRef};
use duckdb::{params_from_iter, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Text form used when binding timestamps; DuckDB casts it on insert.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// DuckDB database backend.
///
/// A single connection guarded by a mutex. While a transaction is open,
/// statements issued directly on the backend run inside it.
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{}: {e}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }

    fn execute_sync(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        let conn = self.lock()?;
        Ok(conn.execute(sql, params_from_iter(params.iter()))?)
    }

    fn query_sync(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let raw = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let count = row.as_ref().column_count();
                (0..count)
                    .map(|i| row.get::<_, Value>(i))
                    .collect::<duckdb::Result<Vec<Value>>>()
            })?
            .collect::<duckdb::Result<Vec<_>>>()?;

        raw.into_iter()
            .map(|values| {
                values
                    .into_iter()
                    .map(from_duckdb_value)
                    .collect::<DbResult<Row>>()
            })
            .collect()
    }
}

impl SqlExecutor for DuckDbBackend {
    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        self.execute_sync(sql, params)
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        self.query_sync(sql, params)
    }
}

impl Database for DuckDbBackend {
    fn begin(&self) -> DbResult<Box<dyn DbTransaction + '_>> {
        self.execute_batch_sync("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;
        Ok(Box::new(DuckDbTransaction {
            backend: self,
            finished: false,
        }))
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

/// Transaction on a [`DuckDbBackend`] connection.
struct DuckDbTransaction<'a> {
    backend: &'a DuckDbBackend,
    finished: bool,
}

impl SqlExecutor for DuckDbTransaction<'_> {
    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        self.backend.execute_sync(sql, params)
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        self.backend.query_sync(sql, params)
    }
}

impl DbTransaction for DuckDbTransaction<'_> {
    fn commit(mut self: Box<Self>) -> DbResult<()> {
        self.finished = true;
        if let Err(commit_err) = self.backend.execute_batch_sync("COMMIT") {
            let _ = self.backend.execute_batch_sync("ROLLBACK");
            return Err(DbError::TransactionError(format!(
                "COMMIT failed: {commit_err}"
            )));
        }
        Ok(())
    }

    fn rollback(mut self: Box<Self>) -> DbResult<()> {
        self.finished = true;
        self.backend
            .execute_batch_sync("ROLLBACK")
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }
}

impl Drop for DuckDbTransaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(e) = self.backend.execute_batch_sync("ROLLBACK") {
                log::warn!("Rollback of abandoned transaction failed: {e}");
            }
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Integer(v) => ToSqlOutput::Owned(Value::BigInt(*v)),
            SqlValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            SqlValue::Timestamp(ts) => {
                ToSqlOutput::Owned(Value::Text(ts.format(TIMESTAMP_FORMAT).to_string()))
            }
        })
    }
}

fn from_duckdb_value(value: Value) -> DbResult<SqlValue> {
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Boolean(b) => SqlValue::Integer(i64::from(b)),
        Value::TinyInt(v) => SqlValue::Integer(i64::from(v)),
        Value::SmallInt(v) => SqlValue::Integer(i64::from(v)),
        Value::Int(v) => SqlValue::Integer(i64::from(v)),
        Value::BigInt(v) => SqlValue::Integer(v),
        Value::UTinyInt(v) => SqlValue::Integer(i64::from(v)),
        Value::USmallInt(v) => SqlValue::Integer(i64::from(v)),
        Value::UInt(v) => SqlValue::Integer(i64::from(v)),
        Value::Text(s) => SqlValue::Text(s),
        Value::Timestamp(unit, raw) => SqlValue::Timestamp(timestamp_from_unit(unit, raw)?),
        other => SqlValue::Text(format!("{other:?}")),
    })
}

fn timestamp_from_unit(unit: TimeUnit, raw: i64) -> DbResult<DateTime<Utc>> {
    let micros = match unit {
        TimeUnit::Second => raw.checked_mul(1_000_000),
        TimeUnit::Millisecond => raw.checked_mul(1_000),
        TimeUnit::Microsecond => Some(raw),
        TimeUnit::Nanosecond => Some(raw / 1_000),
    };
    micros
        .and_then(DateTime::from_timestamp_micros)
        .ok_or_else(|| DbError::InvalidRow(format!("timestamp out of range: {raw}")))
}

/// Parse a timestamp stored as text, with or without an offset.
pub(crate) fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;

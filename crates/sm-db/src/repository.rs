//! Bookkeeping table access
//!
//! `MigrationRepository` is the only component that talks to the database.
//! Every call takes the caller's [`CallContext`] and an explicit transaction
//! choice: `Some(&tx)` runs inside that transaction, `None` runs on the base
//! connection.

use crate::context::CallContext;
use crate::dialect::Dialect;
use crate::duckdb::parse_timestamp_text;
use crate::error::{DbError, DbResult};
use crate::traits::{Database, DbTransaction, Row, SqlExecutor, SqlValue};
use chrono::{DateTime, Utc};
use sm_core::{MigrationId, MigrationRecord, MigratorSettings};
use std::sync::Arc;
use std::time::Instant;

/// An open transaction obtained from [`MigrationRepository::begin_scoped`].
///
/// Dropping it without calling `commit` or `rollback` rolls it back.
pub struct Transaction<'db> {
    inner: Box<dyn DbTransaction + 'db>,
    ctx: CallContext,
}

impl Transaction<'_> {
    /// Context the transaction was opened with
    pub fn context(&self) -> &CallContext {
        &self.ctx
    }

    /// Commit, unless the context was cancelled or expired in the meantime.
    pub fn commit(self) -> DbResult<()> {
        self.ctx.check()?;
        self.inner.commit()
    }

    /// Roll back. Runs even when the context is cancelled.
    pub fn rollback(self) -> DbResult<()> {
        self.inner.rollback()
    }
}

/// Bookkeeping table lifecycle and record access for one schema/table.
pub struct MigrationRepository<'db> {
    db: &'db dyn Database,
    dialect: Arc<dyn Dialect>,
    schema_name: Option<String>,
    table_name: String,
}

impl<'db> MigrationRepository<'db> {
    /// Repository over `db` using the table named in `settings`
    pub fn new(
        db: &'db dyn Database,
        dialect: Arc<dyn Dialect>,
        settings: &MigratorSettings,
    ) -> Self {
        Self {
            db,
            dialect,
            schema_name: settings
                .schema_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            table_name: settings.table_name.clone(),
        }
    }

    /// Bookkeeping table name
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Bookkeeping schema, if any
    pub fn schema_name(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }

    /// Create the schema if needed. A repository without a schema does nothing.
    pub fn ensure_schema(&self, ctx: &CallContext) -> DbResult<()> {
        let Some(schema) = self.schema_name.as_deref() else {
            log::debug!("No bookkeeping schema configured, skipping schema creation");
            return Ok(());
        };
        let sql = self.dialect.create_schema(schema);
        self.exec(ctx, None, &sql, &[])?;
        Ok(())
    }

    /// Create the bookkeeping table if needed
    pub fn ensure_table(&self, ctx: &CallContext) -> DbResult<()> {
        let sql = self.dialect.create_table(self.schema(), &self.table_name);
        self.exec(ctx, None, &sql, &[])?;
        Ok(())
    }

    /// Open a transaction bound to a child of `ctx`
    pub fn begin_scoped(&self, ctx: &CallContext) -> DbResult<Transaction<'db>> {
        ctx.check()?;
        let started = Instant::now();
        let inner = self.db.begin()?;
        log::trace!("BEGIN ({:?})", started.elapsed());
        Ok(Transaction {
            inner,
            ctx: ctx.clone(),
        })
    }

    /// Insert one application record
    pub fn save_record(
        &self,
        ctx: &CallContext,
        tx: Option<&Transaction<'_>>,
        record: &MigrationRecord,
    ) -> DbResult<()> {
        let sql = self.dialect.insert_record(self.schema(), &self.table_name);
        self.exec(
            ctx,
            tx,
            &sql,
            &[
                SqlValue::from(record.id.as_str()),
                SqlValue::from(record.applied_at),
            ],
        )?;
        Ok(())
    }

    /// Delete the record for `id`
    pub fn delete_record(
        &self,
        ctx: &CallContext,
        tx: Option<&Transaction<'_>>,
        id: &MigrationId,
    ) -> DbResult<()> {
        let sql = self.dialect.delete_record(self.schema(), &self.table_name);
        self.exec(ctx, tx, &sql, &[SqlValue::from(id.as_str())])?;
        Ok(())
    }

    /// All application records, ordered by id ascending
    pub fn list_records(
        &self,
        ctx: &CallContext,
        tx: Option<&Transaction<'_>>,
    ) -> DbResult<Vec<MigrationRecord>> {
        let sql = self.dialect.select_records(self.schema(), &self.table_name);
        let mut records = self
            .query(ctx, tx, &sql, &[])?
            .into_iter()
            .map(decode_record)
            .collect::<DbResult<Vec<_>>>()?;
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    /// Execute a statement, returning the number of affected rows
    pub fn exec(
        &self,
        ctx: &CallContext,
        tx: Option<&Transaction<'_>>,
        sql: &str,
        args: &[SqlValue],
    ) -> DbResult<usize> {
        ctx.check()?;
        let started = Instant::now();
        let result = match tx {
            Some(tx) => tx.inner.execute(sql, args),
            None => self.db.execute(sql, args),
        };
        trace_statement(sql, args, started);
        result
    }

    /// Run a query and collect its rows
    pub fn query(
        &self,
        ctx: &CallContext,
        tx: Option<&Transaction<'_>>,
        sql: &str,
        args: &[SqlValue],
    ) -> DbResult<Vec<Row>> {
        ctx.check()?;
        let started = Instant::now();
        let result = match tx {
            Some(tx) => tx.inner.query(sql, args),
            None => self.db.query(sql, args),
        };
        trace_statement(sql, args, started);
        result
    }

    fn schema(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }
}

fn trace_statement(sql: &str, args: &[SqlValue], started: Instant) {
    if log::log_enabled!(log::Level::Trace) {
        log::trace!(
            "{} [{}] ({:?})",
            sql.trim_end(),
            format_args_list(args),
            started.elapsed()
        );
    }
}

/// Render arguments as `1:"abc" 2:42`.
pub(crate) fn format_args_list(args: &[SqlValue]) -> String {
    args.iter()
        .enumerate()
        .map(|(i, v)| format!("{}:{v}", i + 1))
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_record(row: Row) -> DbResult<MigrationRecord> {
    let mut values = row.into_iter();
    let id = match values.next() {
        Some(SqlValue::Text(id)) => {
            MigrationId::parse(&id).map_err(|e| DbError::InvalidRow(e.to_string()))?
        }
        other => {
            return Err(DbError::InvalidRow(format!(
                "expected text id, got {other:?}"
            )))
        }
    };
    let applied_at = match values.next() {
        Some(SqlValue::Timestamp(ts)) => ts,
        Some(SqlValue::Text(text)) => parse_applied_at(&id, &text)?,
        other => {
            return Err(DbError::InvalidRow(format!(
                "expected timestamp for '{id}', got {other:?}"
            )))
        }
    };
    Ok(MigrationRecord { id, applied_at })
}

fn parse_applied_at(id: &MigrationId, text: &str) -> DbResult<DateTime<Utc>> {
    parse_timestamp_text(text)
        .ok_or_else(|| DbError::InvalidRow(format!("invalid applied_at for '{id}': {text}")))
}

#[cfg(test)]
#[path = "repository_test.rs"]
mod tests;

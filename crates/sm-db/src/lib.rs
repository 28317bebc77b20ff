//! sm-db - Database layer for sqlmig
//!
//! This crate provides the `Database` trait and its DuckDB implementation,
//! the per-engine bookkeeping SQL dialects with an explicit registry, the
//! cancellation-aware `CallContext`, and the `MigrationRepository` that owns
//! the bookkeeping table.

pub mod context;
pub mod dialect;
pub mod duckdb;
pub mod error;
pub mod repository;
pub mod traits;

pub use context::{CallContext, CancellationToken};
pub use dialect::{Dialect, DialectRegistry};
pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use repository::{MigrationRepository, Transaction};
pub use traits::{Database, DbTransaction, Row, SqlExecutor, SqlValue};

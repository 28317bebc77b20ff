//! Error types for sm-migrate

use sm_core::{CoreError, MigrationId};
use sm_db::DbError;
use std::fmt;
use thiserror::Error;

/// Transaction phase that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxPhase {
    Begin,
    Commit,
    Rollback,
}

impl fmt::Display for TxPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxPhase::Begin => write!(f, "begin"),
            TxPhase::Commit => write!(f, "commit"),
            TxPhase::Rollback => write!(f, "rollback"),
        }
    }
}

/// Planning and execution errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// P001: The bookkeeping table names a migration the source does not have
    #[error("[P001] Unknown migration in database: '{id}'")]
    UnknownMigration { id: MigrationId },

    /// P002: Target version cannot be reached in the planned direction
    #[error("[P002] Unknown migration with version id {version} in database")]
    UnknownVersion { version: i64 },

    /// P003: Target version given but some ids carry no numeric version
    #[error("[P003] Cannot plan to a version: migration '{id}' has no numeric version prefix")]
    MixedVersionScheme { id: MigrationId },

    /// P004: Negative target version
    #[error("[P004] Target version must not be negative, got {version}")]
    NegativeVersion { version: i64 },

    /// P005: Discovery or parsing failed
    #[error("[P005] Failed to load migrations: {0}")]
    Source(#[from] CoreError),

    /// X001: A migration statement failed
    #[error("[X001] Migration '{id}' failed: {source}\nStatement:\n{statement}")]
    Statement {
        id: MigrationId,
        statement: String,
        source: DbError,
    },

    /// X002: Saving or deleting the bookkeeping record failed
    #[error("[X002] Failed to record migration '{id}': {source}")]
    Bookkeeping { id: MigrationId, source: DbError },

    /// X003: Transaction begin, commit or rollback failed
    #[error("[X003] Transaction {phase} failed for migration '{id}': {source}")]
    Transaction {
        id: MigrationId,
        phase: TxPhase,
        source: DbError,
    },

    /// X004: Bookkeeping table setup or read failed
    #[error("[X004] Bookkeeping table error: {0}")]
    Repository(#[from] DbError),
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;

/// A failed run together with the number of steps that completed first.
#[derive(Error, Debug)]
#[error("migration run stopped after {applied} applied step(s)")]
pub struct RunError {
    /// Steps fully applied and committed before the failure
    pub applied: usize,
    /// What stopped the run
    #[source]
    pub source: MigrateError,
}

impl From<MigrateError> for RunError {
    fn from(source: MigrateError) -> Self {
        Self { applied: 0, source }
    }
}

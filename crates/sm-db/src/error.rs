//! Error types for sm-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// DuckDB driver error with preserved source chain (D002)
    #[error("[D002] DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// Transaction management error (D003)
    #[error("[D003] Transaction failed: {0}")]
    TransactionError(String),

    /// Dialect name not present in the registry (D004)
    #[error("[D004] Unknown dialect '{name}' (available: {available})")]
    UnknownDialect { name: String, available: String },

    /// Call context was cancelled before the round trip (D005)
    #[error("[D005] Operation cancelled")]
    Cancelled,

    /// Call context deadline passed before the round trip (D006)
    #[error("[D006] Deadline exceeded")]
    DeadlineExceeded,

    /// Mutex poisoned (D007)
    #[error("[D007] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// A bookkeeping row could not be decoded (D008)
    #[error("[D008] Invalid bookkeeping row: {0}")]
    InvalidRow(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

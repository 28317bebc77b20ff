//! Error types for sm-sql

use thiserror::Error;

/// Migration file parse errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SqlError {
    /// No direction annotation in the file (Q001)
    #[error("[Q001] No Up/Down annotations found, so no statements would be executed")]
    NoDirection,

    /// A statement is missing its terminating semicolon (Q002)
    #[error("[Q002] Statement ending at line {line} is not terminated with a semicolon")]
    UnterminatedStatement { line: usize },

    /// StatementBegin without a matching StatementEnd (Q003)
    #[error("[Q003] Saw '-- +migrate StatementBegin' with no matching '-- +migrate StatementEnd'")]
    UnclosedStatementBlock,

    /// A `-- +migrate` line with no command (Q004)
    #[error("[Q004] Incomplete migration command at line {line}")]
    IncompleteCommand { line: usize },
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;

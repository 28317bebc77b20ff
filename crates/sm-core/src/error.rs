//! Error types for sm-core

use thiserror::Error;

/// Core error type for sqlmig
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: Requested environment is not defined in the config file
    #[error("[C003] Environment '{name}' not found in config (available: {available})")]
    EnvironmentNotFound { name: String, available: String },

    /// C004: Migration directory or bundle could not be read
    #[error("[C004] Failed to read migrations from '{path}': {source}")]
    SourceUnreachable {
        path: String,
        source: std::io::Error,
    },

    /// C005: A migration file failed to parse
    #[error("[C005] Failed to parse migration '{id}': {message}")]
    MigrationParse { id: String, message: String },

    /// C006: Two migrations in one source share an id
    #[error("[C006] Duplicate migration id '{id}'")]
    DuplicateMigration { id: String },

    /// C007: Migration id is empty or otherwise unusable
    #[error("[C007] Invalid migration id '{id}': {reason}")]
    InvalidMigrationId { id: String, reason: String },

    /// C008: IO error with file path context
    #[error("[C008] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C009: YAML parse error
    #[error("[C009] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

//! sm-core - Core library for sqlmig
//!
//! This crate provides the migration model, application records, the
//! `MigrationSource` capability, and `dbconfig.yml` parsing shared by all
//! sqlmig components.

pub mod config;
pub mod error;
pub mod migration;
pub mod migration_id;
pub mod record;
pub mod source;

pub use config::{
    Config, EnvironmentConfig, MigratorSettings, DEFAULT_CONFIG_FILE, DEFAULT_ENVIRONMENT,
    DEFAULT_TABLE_NAME,
};
pub use error::{CoreError, CoreResult};
pub use migration::{Direction, Migration};
pub use migration_id::MigrationId;
pub use record::MigrationRecord;
pub use source::{MemorySource, MigrationSource};

//! sm-sql - Migration file parsing for sqlmig
//!
//! This crate splits an annotated SQL migration file into its ordered "up"
//! and "down" statement lists and transaction flags. It knows nothing about
//! databases or migration ids.

pub mod error;
pub mod parser;

pub use error::{SqlError, SqlResult};
pub use parser::{MigrationParser, ParsedMigration};

//! Migration source capability and the in-memory source.
//!
//! Concrete file-backed and embedded sources live in `sm-migrate::discovery`
//! because they depend on the migration file parser.

use std::collections::HashSet;

use crate::error::{CoreError, CoreResult};
use crate::migration::Migration;

/// Supplies the full set of migrations a plan is computed against.
pub trait MigrationSource: Send + Sync {
    /// Return every migration, sorted by id ascending.
    ///
    /// Implementations must not mutate shared state so one source can be
    /// reused across planning calls.
    fn find_migrations(&self) -> CoreResult<Vec<Migration>>;
}

/// A hardcoded set of migrations held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    migrations: Vec<Migration>,
}

impl MemorySource {
    /// Create a source over `migrations` (any order).
    pub fn new(migrations: Vec<Migration>) -> Self {
        Self { migrations }
    }
}

impl MigrationSource for MemorySource {
    fn find_migrations(&self) -> CoreResult<Vec<Migration>> {
        // Sort a copy so the source stays untouched between calls.
        sort_and_check(self.migrations.clone())
    }
}

/// Sort migrations by id and reject duplicate ids.
///
/// Shared by every source implementation.
pub fn sort_and_check(mut migrations: Vec<Migration>) -> CoreResult<Vec<Migration>> {
    migrations.sort();

    let mut seen = HashSet::with_capacity(migrations.len());
    for migration in &migrations {
        if !seen.insert(migration.id.as_str()) {
            return Err(CoreError::DuplicateMigration {
                id: migration.id.to_string(),
            });
        }
    }
    Ok(migrations)
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;

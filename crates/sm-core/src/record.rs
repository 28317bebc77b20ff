//! Persisted application records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::migration_id::MigrationId;

/// A row of the bookkeeping table: migration `id` was applied at `applied_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    /// Id of the applied migration
    pub id: MigrationId,

    /// When the migration was applied (UTC)
    pub applied_at: DateTime<Utc>,
}

impl MigrationRecord {
    /// Record `id` as applied now.
    pub fn now(id: MigrationId) -> Self {
        Self {
            id,
            applied_at: Utc::now(),
        }
    }
}

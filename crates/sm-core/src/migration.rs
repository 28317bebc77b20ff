//! Migration unit and direction types.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::migration_id::MigrationId;

/// Direction a plan moves the database in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Apply migrations forward
    Up,
    /// Roll migrations back
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A single schema-change unit.
///
/// Migrations compare and sort by [`id`](Self::id) only; two migrations with
/// the same id are considered the same unit regardless of their statements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Migration {
    /// Unique identifier within a source
    pub id: MigrationId,

    /// Statements applied when migrating up, in order
    #[serde(default)]
    pub up: Vec<String>,

    /// Statements applied when migrating down, in order
    #[serde(default)]
    pub down: Vec<String>,

    /// Run the up statements outside a transaction
    #[serde(default)]
    pub disable_transaction_up: bool,

    /// Run the down statements outside a transaction
    #[serde(default)]
    pub disable_transaction_down: bool,
}

impl Migration {
    /// Create a migration with no statements.
    pub fn new(id: impl Into<MigrationId>) -> Self {
        Self {
            id: id.into(),
            up: Vec::new(),
            down: Vec::new(),
            disable_transaction_up: false,
            disable_transaction_down: false,
        }
    }

    /// Set the up statements.
    pub fn with_up<I, S>(mut self, statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.up = statements.into_iter().map(Into::into).collect();
        self
    }

    /// Set the down statements.
    pub fn with_down<I, S>(mut self, statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.down = statements.into_iter().map(Into::into).collect();
        self
    }

    /// Disable the transaction wrapper for one direction.
    pub fn without_transaction(mut self, direction: Direction) -> Self {
        match direction {
            Direction::Up => self.disable_transaction_up = true,
            Direction::Down => self.disable_transaction_down = true,
        }
        self
    }

    /// Numeric version taken from the leading digits of the id.
    pub fn version(&self) -> Option<i64> {
        self.id.version()
    }

    /// Statements to run for `direction`.
    pub fn statements(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    /// Whether `direction` runs without a transaction.
    pub fn disable_transaction(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.disable_transaction_up,
            Direction::Down => self.disable_transaction_down,
        }
    }
}

impl PartialEq for Migration {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Migration {}

impl PartialOrd for Migration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Migration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;

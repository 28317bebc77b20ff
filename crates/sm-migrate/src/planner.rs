//! Reconciliation of discovered migrations against applied records.
//!
//! The planner is pure: it takes the sorted migration set and a snapshot of
//! the bookkeeping table and returns the ordered steps to run.
//!
//! A plan is the catch-up steps followed by the primary steps:
//!
//! - catch-up: migrations missing from the history whose id sorts before the
//!   latest applied id (typically introduced by a branch merge). They are
//!   always applied up, whatever the requested direction.
//! - primary: for up, everything after the latest applied id; for down,
//!   everything from the start through the latest applied id, newest first.
//!   The primary steps are then cut by the bound.

use crate::error::{MigrateError, MigrateResult};
use sm_core::{Direction, Migration, MigrationId, MigrationRecord};
use std::collections::HashSet;

/// Limit applied to the primary steps of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanBound {
    /// Every candidate
    #[default]
    Unbounded,
    /// At most this many candidates, taken from the front
    MaxSteps(usize),
    /// Candidates up to and including the one with this version
    Version(i64),
}

impl PlanBound {
    /// `0` means unbounded
    pub fn from_max(max: usize) -> Self {
        if max == 0 {
            PlanBound::Unbounded
        } else {
            PlanBound::MaxSteps(max)
        }
    }
}

/// One step of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMigration {
    /// Migration to run
    pub migration: Migration,
    /// Direction of this step (catch-up steps are always up)
    pub direction: Direction,
    /// Step fills a gap in the history rather than moving the cursor
    pub catch_up: bool,
}

impl PlannedMigration {
    fn new(migration: Migration, direction: Direction, catch_up: bool) -> Self {
        Self {
            migration,
            direction,
            catch_up,
        }
    }

    /// Id of the migration
    pub fn id(&self) -> &MigrationId {
        &self.migration.id
    }

    /// Statements for this step's direction
    pub fn statements(&self) -> &[String] {
        self.migration.statements(self.direction)
    }

    /// Run without a transaction
    pub fn disable_transaction(&self) -> bool {
        self.migration.disable_transaction(self.direction)
    }
}

/// Computes plans.
#[derive(Debug, Clone, Copy, Default)]
pub struct Planner {
    ignore_unknown: bool,
}

impl Planner {
    /// Planner that tolerates applied ids missing from the source when
    /// `ignore_unknown` is set
    pub fn new(ignore_unknown: bool) -> Self {
        Self { ignore_unknown }
    }

    /// Plan `direction` over `migrations` (sorted by id) given `records`.
    pub fn plan(
        &self,
        migrations: Vec<Migration>,
        records: &[MigrationRecord],
        direction: Direction,
        bound: PlanBound,
    ) -> MigrateResult<Vec<PlannedMigration>> {
        let mut applied: Vec<&MigrationId> = records.iter().map(|r| &r.id).collect();
        applied.sort();
        applied.dedup();

        if !self.ignore_unknown {
            let known: HashSet<&str> = migrations.iter().map(|m| m.id.as_str()).collect();
            if let Some(stray) = applied.iter().find(|id| !known.contains(id.as_str())) {
                return Err(MigrateError::UnknownMigration {
                    id: (*stray).clone(),
                });
            }
        }

        if let PlanBound::Version(_) = bound {
            if let Some(m) = migrations.iter().find(|m| m.version().is_none()) {
                return Err(MigrateError::MixedVersionScheme { id: m.id.clone() });
            }
        }

        let last = applied.last().map(|id| id.as_str());
        let applied_set: HashSet<&str> = applied.iter().map(|id| id.as_str()).collect();

        let catch_up: Vec<PlannedMigration> = match last {
            Some(last) => migrations
                .iter()
                .filter(|m| !applied_set.contains(m.id.as_str()) && m.id.as_str() < last)
                .map(|m| PlannedMigration::new(m.clone(), Direction::Up, true))
                .collect(),
            None => Vec::new(),
        };

        let candidates = to_apply(&migrations, last, direction);
        let count = bounded_count(&candidates, direction, bound)?;

        let mut plan = catch_up;
        plan.extend(
            candidates
                .into_iter()
                .take(count)
                .map(|m| PlannedMigration::new(m.clone(), direction, false)),
        );

        log::debug!(
            "Planned {} step(s) {direction} ({} catch-up)",
            plan.len(),
            plan.iter().filter(|s| s.catch_up).count()
        );
        Ok(plan)
    }
}

/// Primary candidates in emission order.
fn to_apply<'a>(
    migrations: &'a [Migration],
    last: Option<&str>,
    direction: Direction,
) -> Vec<&'a Migration> {
    let Some(last) = last else {
        return match direction {
            Direction::Up => migrations.iter().collect(),
            Direction::Down => Vec::new(),
        };
    };

    match migrations.iter().position(|m| m.id.as_str() == last) {
        Some(i) => match direction {
            Direction::Up => migrations[i + 1..].iter().collect(),
            Direction::Down => migrations[..=i].iter().rev().collect(),
        },
        // Cursor not in the source (ignore-unknown): it sorts past everything.
        None => match direction {
            Direction::Up => Vec::new(),
            Direction::Down => migrations.iter().rev().collect(),
        },
    }
}

/// Number of candidates to keep under `bound`.
fn bounded_count(
    candidates: &[&Migration],
    direction: Direction,
    bound: PlanBound,
) -> MigrateResult<usize> {
    match bound {
        PlanBound::Unbounded => Ok(candidates.len()),
        PlanBound::MaxSteps(max) => Ok(max.min(candidates.len())),
        PlanBound::Version(target) => {
            for (i, m) in candidates.iter().enumerate() {
                let version = m.version().ok_or_else(|| MigrateError::MixedVersionScheme {
                    id: m.id.clone(),
                })?;
                let overshot = match direction {
                    Direction::Up => version > target,
                    Direction::Down => version < target,
                };
                if overshot {
                    break;
                }
                if version == target {
                    return Ok(i + 1);
                }
            }
            Err(MigrateError::UnknownVersion { version: target })
        }
    }
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod tests;

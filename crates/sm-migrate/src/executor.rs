//! Sequential, fail-fast execution of a plan.
//!
//! Each step runs in its own transaction unless the migration disables it
//! for the step's direction. The first failure stops the run; steps that
//! committed before it stay applied.

use crate::error::{MigrateError, MigrateResult, RunError, TxPhase};
use crate::planner::PlannedMigration;
use sm_core::{Direction, MigrationId, MigrationRecord};
use sm_db::{CallContext, MigrationRepository, Transaction};

/// Runs planned steps against a repository.
pub struct Executor<'r, 'db> {
    repo: &'r MigrationRepository<'db>,
}

impl<'r, 'db> Executor<'r, 'db> {
    /// Executor writing through `repo`
    pub fn new(repo: &'r MigrationRepository<'db>) -> Self {
        Self { repo }
    }

    /// Run every step in order, returning the number applied.
    pub fn apply(&self, ctx: &CallContext, plan: &[PlannedMigration]) -> Result<usize, RunError> {
        self.run(plan, |step| self.apply_step(ctx, step))
    }

    /// Record every step as applied without running its statements.
    pub fn skip(&self, ctx: &CallContext, plan: &[PlannedMigration]) -> Result<usize, RunError> {
        self.run(plan, |step| self.skip_step(ctx, step))
    }

    fn run<F>(&self, plan: &[PlannedMigration], mut step_fn: F) -> Result<usize, RunError>
    where
        F: FnMut(&PlannedMigration) -> MigrateResult<()>,
    {
        let mut applied = 0;
        for step in plan {
            if let Err(source) = step_fn(step) {
                log::error!("Migration {} failed: {source}", step.id());
                return Err(RunError { applied, source });
            }
            applied += 1;
        }
        Ok(applied)
    }

    fn apply_step(&self, ctx: &CallContext, step: &PlannedMigration) -> MigrateResult<()> {
        let id = step.id();
        let tx = self.begin(ctx, step)?;

        for statement in step.statements() {
            let sql = trim_statement(statement);
            if sql.trim().is_empty() {
                continue;
            }
            if let Err(source) = self.repo.exec(ctx, tx.as_ref(), sql, &[]) {
                rollback_quietly(tx, id);
                return Err(MigrateError::Statement {
                    id: id.clone(),
                    statement: sql.to_string(),
                    source,
                });
            }
        }

        let written = match step.direction {
            Direction::Up => {
                self.repo
                    .save_record(ctx, tx.as_ref(), &MigrationRecord::now(id.clone()))
            }
            Direction::Down => self.repo.delete_record(ctx, tx.as_ref(), id),
        };
        if let Err(source) = written {
            rollback_quietly(tx, id);
            return Err(MigrateError::Bookkeeping {
                id: id.clone(),
                source,
            });
        }

        commit(tx, id)?;
        match (step.direction, step.catch_up) {
            (Direction::Up, true) => log::info!("Applied missing migration {id}"),
            (Direction::Up, false) => log::info!("Applied migration {id}"),
            (Direction::Down, _) => log::info!("Rolled back migration {id}"),
        }
        Ok(())
    }

    fn skip_step(&self, ctx: &CallContext, step: &PlannedMigration) -> MigrateResult<()> {
        let id = step.id();
        let tx = self.begin(ctx, step)?;

        if let Err(source) =
            self.repo
                .save_record(ctx, tx.as_ref(), &MigrationRecord::now(id.clone()))
        {
            rollback_quietly(tx, id);
            return Err(MigrateError::Bookkeeping {
                id: id.clone(),
                source,
            });
        }

        commit(tx, id)?;
        log::info!("Skipped migration {id}");
        Ok(())
    }

    fn begin(
        &self,
        ctx: &CallContext,
        step: &PlannedMigration,
    ) -> MigrateResult<Option<Transaction<'db>>> {
        if step.disable_transaction() {
            return Ok(None);
        }
        self.repo
            .begin_scoped(ctx)
            .map(Some)
            .map_err(|source| MigrateError::Transaction {
                id: step.id().clone(),
                phase: TxPhase::Begin,
                source,
            })
    }
}

fn commit(tx: Option<Transaction<'_>>, id: &MigrationId) -> MigrateResult<()> {
    let Some(tx) = tx else {
        return Ok(());
    };
    tx.commit().map_err(|source| MigrateError::Transaction {
        id: id.clone(),
        phase: TxPhase::Commit,
        source,
    })
}

/// Roll back after a failed step. The step's own error is what the caller
/// sees, so a rollback failure is only logged.
fn rollback_quietly(tx: Option<Transaction<'_>>, id: &MigrationId) {
    if let Some(tx) = tx {
        if let Err(e) = tx.rollback() {
            log::error!(
                "{}",
                MigrateError::Transaction {
                    id: id.clone(),
                    phase: TxPhase::Rollback,
                    source: e,
                }
            );
        }
    }
}

/// Strip one trailing newline, then one trailing space, then one trailing
/// semicolon. Some drivers (Oracle) reject the terminator.
pub(crate) fn trim_statement(statement: &str) -> &str {
    let s = statement.strip_suffix('\n').unwrap_or(statement);
    let s = s.strip_suffix(' ').unwrap_or(s);
    s.strip_suffix(';').unwrap_or(s)
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;

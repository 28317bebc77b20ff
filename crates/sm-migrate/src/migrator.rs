//! Entry points: plan, execute, skip, and list applied migrations.

use crate::error::{MigrateError, MigrateResult, RunError};
use crate::executor::Executor;
use crate::planner::{PlanBound, PlannedMigration, Planner};
use sm_core::{Direction, MigrationRecord, MigrationSource, MigratorSettings};
use sm_db::{CallContext, Database, Dialect, DialectRegistry, MigrationRepository};
use std::sync::Arc;

/// Migration engine bound to one database and bookkeeping table.
pub struct Migrator<'db> {
    repo: MigrationRepository<'db>,
    settings: MigratorSettings,
}

impl<'db> Migrator<'db> {
    /// Migrator over `db` using `dialect` for bookkeeping SQL
    pub fn new(
        db: &'db dyn Database,
        dialect: Arc<dyn Dialect>,
        settings: MigratorSettings,
    ) -> Self {
        Self {
            repo: MigrationRepository::new(db, dialect, &settings),
            settings,
        }
    }

    /// Migrator whose dialect is looked up by name in `registry`
    pub fn with_registry(
        db: &'db dyn Database,
        registry: &DialectRegistry,
        dialect: &str,
        settings: MigratorSettings,
    ) -> MigrateResult<Self> {
        let dialect = registry.get(dialect)?;
        Ok(Self::new(db, dialect, settings))
    }

    /// Settings in effect
    pub fn settings(&self) -> &MigratorSettings {
        &self.settings
    }

    /// Underlying bookkeeping repository
    pub fn repository(&self) -> &MigrationRepository<'db> {
        &self.repo
    }

    /// Plan `direction` with at most `max` primary steps (`0` for all).
    pub fn plan(
        &self,
        ctx: &CallContext,
        source: &dyn MigrationSource,
        direction: Direction,
        max: usize,
    ) -> MigrateResult<Vec<PlannedMigration>> {
        self.plan_bounded(ctx, source, direction, PlanBound::from_max(max))
    }

    /// Plan `direction` up to and including the migration with `version`.
    pub fn plan_to_version(
        &self,
        ctx: &CallContext,
        source: &dyn MigrationSource,
        direction: Direction,
        version: i64,
    ) -> MigrateResult<Vec<PlannedMigration>> {
        if version < 0 {
            return Err(MigrateError::NegativeVersion { version });
        }
        self.plan_bounded(ctx, source, direction, PlanBound::Version(version))
    }

    /// Plan and run. Returns the number of steps applied.
    pub fn execute(
        &self,
        ctx: &CallContext,
        source: &dyn MigrationSource,
        direction: Direction,
        max: usize,
    ) -> Result<usize, RunError> {
        let plan = self.plan(ctx, source, direction, max)?;
        Executor::new(&self.repo).apply(ctx, &plan)
    }

    /// Plan to `version` and run. Returns the number of steps applied.
    pub fn execute_to_version(
        &self,
        ctx: &CallContext,
        source: &dyn MigrationSource,
        direction: Direction,
        version: i64,
    ) -> Result<usize, RunError> {
        let plan = self.plan_to_version(ctx, source, direction, version)?;
        Executor::new(&self.repo).apply(ctx, &plan)
    }

    /// Mark up to `max` pending migrations (`0` for all) as applied without
    /// running them. Returns the number of records written.
    pub fn skip(
        &self,
        ctx: &CallContext,
        source: &dyn MigrationSource,
        max: usize,
    ) -> Result<usize, RunError> {
        let plan = self.plan(ctx, source, Direction::Up, max)?;
        Executor::new(&self.repo).skip(ctx, &plan)
    }

    /// Applied migrations ordered by id
    pub fn list_applied(&self, ctx: &CallContext) -> MigrateResult<Vec<MigrationRecord>> {
        self.prepare(ctx)?;
        Ok(self.repo.list_records(ctx, None)?)
    }

    fn plan_bounded(
        &self,
        ctx: &CallContext,
        source: &dyn MigrationSource,
        direction: Direction,
        bound: PlanBound,
    ) -> MigrateResult<Vec<PlannedMigration>> {
        self.prepare(ctx)?;
        let migrations = source.find_migrations()?;
        let records = self.repo.list_records(ctx, None)?;
        Planner::new(self.settings.ignore_unknown).plan(migrations, &records, direction, bound)
    }

    fn prepare(&self, ctx: &CallContext) -> MigrateResult<()> {
        if self.settings.create_schema {
            self.repo.ensure_schema(ctx)?;
        }
        if self.settings.create_table {
            self.repo.ensure_table(ctx)?;
        }
        Ok(())
    }
}

//! sm-migrate - Migration planning and execution for sqlmig
//!
//! The [`Migrator`] facade reconciles a [`MigrationSource`](sm_core::MigrationSource)
//! against the bookkeeping table, plans the steps with [`Planner`], and runs
//! them with the sequential, fail-fast executor.

pub mod discovery;
pub mod error;
pub mod executor;
pub mod migrator;
pub mod planner;

pub use discovery::{EmbeddedSource, FileSource};
pub use error::{MigrateError, MigrateResult, RunError, TxPhase};
pub use executor::Executor;
pub use migrator::Migrator;
pub use planner::{PlanBound, PlannedMigration, Planner};

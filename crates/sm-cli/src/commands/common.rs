//! Shared utilities for CLI commands

use anyhow::{bail, Context, Result};
use sm_core::{Config, Direction, EnvironmentConfig};
use sm_db::{CallContext, DialectRegistry, DuckDbBackend};
use sm_migrate::{FileSource, Migrator, PlannedMigration};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::GlobalArgs;

/// Only connection backend compiled into the CLI.
const BUNDLED_BACKEND: &str = "duckdb";

/// The selected environment plus the directory its config file lives in.
pub(crate) struct LoadedEnvironment {
    pub(crate) config_dir: PathBuf,
    pub(crate) env: EnvironmentConfig,
}

impl LoadedEnvironment {
    /// Directory holding this environment's migration files
    pub(crate) fn migrations_dir(&self) -> PathBuf {
        self.env.migrations_dir(&self.config_dir)
    }
}

/// Load `--config` and resolve `--env` from it.
pub(crate) fn load_environment(global: &GlobalArgs) -> Result<LoadedEnvironment> {
    let path = Path::new(&global.config);
    let config = Config::load(path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;
    let env = config
        .environment(&global.env)
        .with_context(|| format!("Failed to resolve environment: {}", global.env))?;

    let config_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    log::debug!(
        "Using environment '{}' (dialect {}, dir {})",
        global.env,
        env.dialect,
        env.dir
    );
    Ok(LoadedEnvironment { config_dir, env })
}

/// Open the environment's datasource.
///
/// The dialect is checked first so a datasource meant for another engine is
/// never opened as a DuckDB file.
pub(crate) fn open_database(loaded: &LoadedEnvironment) -> Result<DuckDbBackend> {
    check_backend(&loaded.env.dialect)?;
    DuckDbBackend::new(&loaded.env.datasource)
        .with_context(|| format!("Failed to open datasource: {}", loaded.env.datasource))
}

/// Fail unless `dialect` is known and served by the bundled backend.
fn check_backend(dialect: &str) -> Result<()> {
    if dialect == BUNDLED_BACKEND {
        return Ok(());
    }
    DialectRegistry::with_builtins()
        .get(dialect)
        .context("Failed to set up migrator")?;
    bail!("dialect '{dialect}' requires a {dialect} backend; only {BUNDLED_BACKEND} is bundled")
}

/// Migrator over `db` configured from the environment.
pub(crate) fn build_migrator<'db>(
    db: &'db DuckDbBackend,
    loaded: &LoadedEnvironment,
) -> Result<Migrator<'db>> {
    let registry = DialectRegistry::with_builtins();
    Migrator::with_registry(db, &registry, &loaded.env.dialect, loaded.env.settings())
        .context("Failed to set up migrator")
}

/// Migration files of the environment
pub(crate) fn migration_source(loaded: &LoadedEnvironment) -> FileSource {
    FileSource::new(loaded.migrations_dir())
}

/// Call context honouring `--timeout`.
pub(crate) fn call_context(global: &GlobalArgs) -> CallContext {
    match global.timeout {
        Some(secs) => CallContext::background().with_timeout(Duration::from_secs(secs)),
        None => CallContext::background(),
    }
}

/// Plan and run migrations in `direction`, or print the plan on `dryrun`.
pub(crate) fn run_migrations(
    direction: Direction,
    limit: usize,
    target_version: Option<i64>,
    dryrun: bool,
    global: &GlobalArgs,
) -> Result<()> {
    let loaded = load_environment(global)?;
    let db = open_database(&loaded)?;
    let migrator = build_migrator(&db, &loaded)?;
    let source = migration_source(&loaded);
    let ctx = call_context(global);

    if dryrun {
        let plan = match target_version {
            Some(version) => migrator.plan_to_version(&ctx, &source, direction, version),
            None => migrator.plan(&ctx, &source, direction, limit),
        }
        .context("Failed to plan migrations")?;
        if plan.is_empty() {
            println!("Nothing to do!");
        }
        for step in &plan {
            print_step(step);
        }
        return Ok(());
    }

    let applied = match target_version {
        Some(version) => migrator.execute_to_version(&ctx, &source, direction, version),
        None => migrator.execute(&ctx, &source, direction, limit),
    }?;

    let verb = match direction {
        Direction::Up => "Applied",
        Direction::Down => "Rolled back",
    };
    println!("{verb} {applied} {}", plural(applied, "migration"));
    Ok(())
}

/// Print one planned step and its statements.
pub(crate) fn print_step(step: &PlannedMigration) {
    let catch_up = if step.catch_up { ", missing" } else { "" };
    println!(
        "==> Would apply migration {} ({}{catch_up})",
        step.id(),
        step.direction
    );
    for statement in step.statements() {
        println!("{}", statement.trim_end());
    }
}

pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}

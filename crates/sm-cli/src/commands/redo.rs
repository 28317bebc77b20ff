//! Redo command implementation

use anyhow::{Context, Result};
use sm_core::Direction;
use sm_migrate::PlannedMigration;

use crate::cli::{GlobalArgs, RedoArgs};
use crate::commands::common::{
    build_migrator, call_context, load_environment, migration_source, open_database, print_step,
};

/// Execute the redo command
pub fn execute(args: &RedoArgs, global: &GlobalArgs) -> Result<()> {
    let loaded = load_environment(global)?;
    let db = open_database(&loaded)?;
    let migrator = build_migrator(&db, &loaded)?;
    let source = migration_source(&loaded);
    let ctx = call_context(global);

    let plan = migrator
        .plan(&ctx, &source, Direction::Down, 1)
        .context("Failed to plan migrations")?;
    // Catch-up steps come first; the rollback target is the last step.
    let Some(last) = plan.iter().rfind(|step| !step.catch_up) else {
        println!("Nothing to do!");
        return Ok(());
    };

    if args.dryrun {
        for step in &plan {
            print_step(step);
        }
        print_step(&PlannedMigration {
            migration: last.migration.clone(),
            direction: Direction::Up,
            catch_up: false,
        });
        return Ok(());
    }

    migrator
        .execute(&ctx, &source, Direction::Down, 1)
        .with_context(|| format!("Failed to roll back migration {}", last.id()))?;
    migrator
        .execute(&ctx, &source, Direction::Up, 1)
        .with_context(|| format!("Failed to reapply migration {}", last.id()))?;

    println!("Reapplied migration {}", last.id());
    Ok(())
}

//! Status command implementation

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sm_core::MigrationSource;
use std::collections::HashMap;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{
    build_migrator, call_context, load_environment, migration_source, open_database,
};

/// One row of the status report
#[derive(Debug, Serialize)]
struct StatusRow {
    id: String,
    applied_at: Option<DateTime<Utc>>,
}

/// Execute the status command
pub fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let loaded = load_environment(global)?;
    let db = open_database(&loaded)?;
    let migrator = build_migrator(&db, &loaded)?;
    let source = migration_source(&loaded);

    let migrations = source
        .find_migrations()
        .context("Failed to read migrations")?;
    let records = migrator
        .list_applied(&call_context(global))
        .context("Failed to read applied migrations")?;
    let applied: HashMap<String, DateTime<Utc>> = records
        .into_iter()
        .map(|r| (r.id.into_inner(), r.applied_at))
        .collect();

    let rows: Vec<StatusRow> = migrations
        .into_iter()
        .map(|m| {
            let id = m.id.into_inner();
            let applied_at = applied.get(&id).copied();
            StatusRow { id, applied_at }
        })
        .collect();

    match args.output {
        StatusOutput::Table => print_table(&rows),
        StatusOutput::Json => print_json(&rows)?,
    }
    Ok(())
}

fn print_table(rows: &[StatusRow]) {
    let id_width = rows
        .iter()
        .map(|r| r.id.len())
        .max()
        .unwrap_or(9)
        .max(9);

    println!("{:<id_width$}  APPLIED", "MIGRATION");
    println!("{:-<id_width$}  {}", "", "-".repeat(25));
    for row in rows {
        let applied = row
            .applied_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "no".to_string());
        println!("{:<id_width$}  {applied}", row.id);
    }
}

fn print_json(rows: &[StatusRow]) -> Result<()> {
    let json = serde_json::to_string_pretty(rows).context("Failed to serialize status")?;
    println!("{json}");
    Ok(())
}

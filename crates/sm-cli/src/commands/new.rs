//! New command implementation

use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::fs;
use std::io::Write;

use crate::cli::{GlobalArgs, NewArgs};
use crate::commands::common::load_environment;

const TEMPLATE: &str = "-- +migrate Up\n\n-- +migrate Down\n";

/// Execute the new command
pub fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        bail!("Migration name cannot be empty");
    }
    if name.contains(['/', '\\']) {
        bail!("Migration name cannot contain path separators: {name}");
    }

    let loaded = load_environment(global)?;
    let dir = loaded.migrations_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let file_name = format!("{}-{name}.sql", Utc::now().format("%Y%m%d%H%M%S"));
    let path = dir.join(file_name);
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .with_context(|| format!("Failed to create migration: {}", path.display()))?;
    file.write_all(TEMPLATE.as_bytes())
        .with_context(|| format!("Failed to write migration: {}", path.display()))?;

    println!("Created migration {}", path.display());
    Ok(())
}

//! Skip command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, SkipArgs};
use crate::commands::common::{
    build_migrator, call_context, load_environment, migration_source, open_database, plural,
};

/// Execute the skip command
pub fn execute(args: &SkipArgs, global: &GlobalArgs) -> Result<()> {
    let loaded = load_environment(global)?;
    let db = open_database(&loaded)?;
    let migrator = build_migrator(&db, &loaded)?;
    let source = migration_source(&loaded);

    let skipped = migrator.skip(&call_context(global), &source, args.limit)?;
    println!("Skipped {skipped} {}", plural(skipped, "migration"));
    Ok(())
}

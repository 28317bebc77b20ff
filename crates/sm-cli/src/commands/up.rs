//! Up command implementation

use anyhow::Result;
use sm_core::Direction;

use crate::cli::{GlobalArgs, UpArgs};
use crate::commands::common::run_migrations;

/// Execute the up command
pub fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    run_migrations(
        Direction::Up,
        args.limit,
        args.target_version,
        args.dryrun,
        global,
    )
}

//! Down command implementation

use anyhow::Result;
use sm_core::Direction;

use crate::cli::{DownArgs, GlobalArgs};
use crate::commands::common::run_migrations;

/// Execute the down command
pub fn execute(args: &DownArgs, global: &GlobalArgs) -> Result<()> {
    run_migrations(
        Direction::Down,
        args.limit,
        args.target_version,
        args.dryrun,
        global,
    )
}

//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// sqlmig - SQL schema migrations driven by a bookkeeping table
#[derive(Parser, Debug)]
#[command(name = "sm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file to use
    #[arg(
        short,
        long,
        global = true,
        env = "SM_CONFIG",
        default_value = sm_core::DEFAULT_CONFIG_FILE
    )]
    pub config: String,

    /// Environment within the configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "SM_ENV",
        default_value = sm_core::DEFAULT_ENVIRONMENT
    )]
    pub env: String,

    /// Abort database work after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Migrate the database to the most recent version available
    Up(UpArgs),

    /// Undo a database migration
    Down(DownArgs),

    /// Reapply the last migration
    Redo(RedoArgs),

    /// Show migration status
    Status(StatusArgs),

    /// Mark migrations as applied without running them
    Skip(SkipArgs),

    /// Create a new migration file
    New(NewArgs),
}

/// Arguments for the up command
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Apply at most this many migrations (0 for all)
    #[arg(short, long, default_value_t = 0)]
    pub limit: usize,

    /// Migrate up to and including this version
    #[arg(long = "version", value_name = "VERSION", allow_negative_numbers = true)]
    pub target_version: Option<i64>,

    /// Print the migrations that would run without applying them
    #[arg(long)]
    pub dryrun: bool,
}

/// Arguments for the down command
#[derive(Args, Debug)]
pub struct DownArgs {
    /// Undo at most this many migrations (0 for all)
    #[arg(short, long, default_value_t = 1)]
    pub limit: usize,

    /// Migrate down to and including this version
    #[arg(long = "version", value_name = "VERSION", allow_negative_numbers = true)]
    pub target_version: Option<i64>,

    /// Print the migrations that would run without applying them
    #[arg(long)]
    pub dryrun: bool,
}

/// Arguments for the redo command
#[derive(Args, Debug)]
pub struct RedoArgs {
    /// Print the migration that would be reapplied without running it
    #[arg(long)]
    pub dryrun: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

/// Arguments for the skip command
#[derive(Args, Debug)]
pub struct SkipArgs {
    /// Skip at most this many migrations (0 for all)
    #[arg(short, long, default_value_t = 0)]
    pub limit: usize,
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Name appended to the timestamp in the file name
    pub name: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

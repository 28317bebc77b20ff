//! Migration sources backed by a directory or an embedded bundle.
//!
//! Both read every `*.sql` entry directly under their root, use the file
//! name as the migration id, and parse the content with
//! [`MigrationParser`].

mod embedded;
mod file;

pub use embedded::EmbeddedSource;
pub use file::FileSource;

use sm_core::{CoreError, CoreResult, Migration, MigrationId};
use sm_sql::MigrationParser;

const MIGRATION_EXTENSION: &str = ".sql";

fn is_migration_file(name: &str) -> bool {
    name.len() > MIGRATION_EXTENSION.len() && name.ends_with(MIGRATION_EXTENSION)
}

/// Build a migration named `id` from its file text.
fn parse_migration(parser: &MigrationParser, id: &str, text: &str) -> CoreResult<Migration> {
    let parsed = parser.parse(text).map_err(|e| CoreError::MigrationParse {
        id: id.to_string(),
        message: e.to_string(),
    })?;
    Ok(Migration {
        id: MigrationId::parse(id)?,
        up: parsed.up_statements,
        down: parsed.down_statements,
        disable_transaction_up: parsed.disable_transaction_up,
        disable_transaction_down: parsed.disable_transaction_down,
    })
}

use super::{is_migration_file, parse_migration};
use rust_embed::RustEmbed;
use sm_core::source::sort_and_check;
use sm_core::{CoreError, CoreResult, Migration, MigrationSource};
use sm_sql::MigrationParser;
use std::marker::PhantomData;

/// Migrations compiled into the binary with `#[derive(RustEmbed)]`.
///
/// ```ignore
/// #[derive(rust_embed::RustEmbed)]
/// #[folder = "migrations/"]
/// struct Bundle;
///
/// let source = EmbeddedSource::<Bundle>::new();
/// ```
pub struct EmbeddedSource<E: RustEmbed> {
    prefix: String,
    parser: MigrationParser,
    bundle: PhantomData<fn() -> E>,
}

impl<E: RustEmbed> EmbeddedSource<E> {
    /// Source over the root of the bundle
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
            parser: MigrationParser::new(),
            bundle: PhantomData,
        }
    }

    /// Only read files directly under `prefix` inside the bundle
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        let prefix = prefix.trim_matches('/');
        self.prefix = if prefix.is_empty() {
            String::new()
        } else {
            format!("{prefix}/")
        };
        self
    }

    /// Parse files with `parser` instead of the default one
    pub fn with_parser(mut self, parser: MigrationParser) -> Self {
        self.parser = parser;
        self
    }
}

impl<E: RustEmbed> Default for EmbeddedSource<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RustEmbed> MigrationSource for EmbeddedSource<E> {
    fn find_migrations(&self) -> CoreResult<Vec<Migration>> {
        let mut migrations = Vec::new();
        for path in E::iter() {
            let Some(name) = path.strip_prefix(self.prefix.as_str()) else {
                continue;
            };
            if name.contains('/') || !is_migration_file(name) {
                continue;
            }

            let file = E::get(&path).ok_or_else(|| CoreError::SourceUnreachable {
                path: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing from bundle"),
            })?;
            let text = std::str::from_utf8(&file.data).map_err(|e| CoreError::MigrationParse {
                id: name.to_string(),
                message: format!("not valid UTF-8: {e}"),
            })?;
            migrations.push(parse_migration(&self.parser, name, text)?);
        }
        sort_and_check(migrations)
    }
}

use super::{is_migration_file, parse_migration};
use sm_core::source::sort_and_check;
use sm_core::{CoreError, CoreResult, Migration, MigrationSource};
use sm_sql::MigrationParser;
use std::path::{Path, PathBuf};

/// Migrations read from `*.sql` files in a directory (not recursive).
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
    parser: MigrationParser,
}

impl FileSource {
    /// Source over `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            parser: MigrationParser::new(),
        }
    }

    /// Parse files with `parser` instead of the default one
    pub fn with_parser(mut self, parser: MigrationParser) -> Self {
        self.parser = parser;
        self
    }

    /// Directory being read
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn unreachable(&self, source: std::io::Error) -> CoreError {
        CoreError::SourceUnreachable {
            path: self.dir.display().to_string(),
            source,
        }
    }
}

impl MigrationSource for FileSource {
    fn find_migrations(&self) -> CoreResult<Vec<Migration>> {
        let mut migrations = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(|e| self.unreachable(e))? {
            let path = entry.map_err(|e| self.unreachable(e))?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !path.is_file() || !is_migration_file(name) {
                continue;
            }

            let text = std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            })?;
            migrations.push(parse_migration(&self.parser, name, &text)?);
        }
        sort_and_check(migrations)
    }
}

//! Configuration types and parsing for dbconfig.yml
//!
//! The config file maps an environment name (e.g. `development`, `production`)
//! to the connection and bookkeeping settings for that environment:
//!
//! ```yaml
//! development:
//!   dialect: duckdb
//!   datasource: ./dev.duckdb
//!   dir: migrations
//!   table: migrations
//! ```

use crate::error::{CoreError, CoreResult};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Bookkeeping table name used when none is configured.
pub const DEFAULT_TABLE_NAME: &str = "migrations";

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "dbconfig.yml";

/// Environment used when `--env` is not given.
pub const DEFAULT_ENVIRONMENT: &str = "development";

static ENV_VAR_RE: OnceLock<Regex> = OnceLock::new();

/// All environments declared in a dbconfig.yml file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    /// Environment name to settings
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

/// Settings for a single environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Dialect name used to pick bookkeeping SQL templates
    #[serde(default = "default_dialect")]
    pub dialect: String,

    /// Database location; `$VAR` and `${VAR}` are expanded from the environment
    pub datasource: String,

    /// Directory containing migration files, relative to the config file
    #[serde(default = "default_dir")]
    pub dir: String,

    /// Bookkeeping table name
    #[serde(default)]
    pub table: Option<String>,

    /// Schema holding the bookkeeping table
    #[serde(default)]
    pub schema: Option<String>,

    /// Create the schema if it does not exist
    #[serde(default)]
    pub create_schema: bool,

    /// Create the bookkeeping table if it does not exist
    #[serde(default = "default_true")]
    pub create_table: bool,

    /// Tolerate applied migrations missing from the migration directory.
    ///
    /// Removes a safety check; use sparingly.
    #[serde(default, alias = "ignoreunknown")]
    pub ignore_unknown: bool,
}

fn default_dialect() -> String {
    "duckdb".to_string()
}

fn default_true() -> bool {
    true
}

fn default_dir() -> String {
    "migrations".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        if config.environments.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "no environments defined".to_string(),
            });
        }
        Ok(config)
    }

    /// Resolve one environment, expanding variables in its datasource.
    pub fn environment(&self, name: &str) -> CoreResult<EnvironmentConfig> {
        let Some(env) = self.environments.get(name) else {
            return Err(CoreError::EnvironmentNotFound {
                name: name.to_string(),
                available: self
                    .environments
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        };

        let mut env = env.clone();
        env.datasource = expand_env_vars(&env.datasource);
        env.validate(name)?;
        Ok(env)
    }
}

impl EnvironmentConfig {
    fn validate(&self, name: &str) -> CoreResult<()> {
        if self.datasource.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: format!("environment '{name}': datasource cannot be empty"),
            });
        }
        if self.dialect.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: format!("environment '{name}': dialect cannot be empty"),
            });
        }
        if matches!(&self.table, Some(t) if t.trim().is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: format!("environment '{name}': table cannot be empty"),
            });
        }
        Ok(())
    }

    /// Migration directory resolved against the directory holding the config.
    pub fn migrations_dir(&self, config_dir: &Path) -> PathBuf {
        let dir = Path::new(&self.dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            config_dir.join(dir)
        }
    }

    /// Engine settings derived from this environment.
    pub fn settings(&self) -> MigratorSettings {
        let mut settings = MigratorSettings {
            create_schema: self.create_schema,
            create_table: self.create_table,
            ignore_unknown: self.ignore_unknown,
            ..MigratorSettings::default()
        };
        if let Some(table) = &self.table {
            settings = settings.with_table(table);
        }
        if let Some(schema) = &self.schema {
            settings = settings.with_schema(schema);
        }
        settings
    }
}

/// Bookkeeping settings consumed by the migration engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratorSettings {
    /// Name of the bookkeeping table
    pub table_name: String,

    /// Schema holding the bookkeeping table, if any
    pub schema_name: Option<String>,

    /// Create the schema before use
    pub create_schema: bool,

    /// Create the table before use
    pub create_table: bool,

    /// Skip the unknown-record safety check
    pub ignore_unknown: bool,
}

impl Default for MigratorSettings {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            schema_name: None,
            create_schema: false,
            create_table: true,
            ignore_unknown: false,
        }
    }
}

impl MigratorSettings {
    /// Use `name` as the table name; a blank name keeps the current one.
    pub fn with_table(mut self, name: &str) -> Self {
        if !name.trim().is_empty() {
            self.table_name = name.to_string();
        }
        self
    }

    /// Use `name` as the schema; a blank name clears it.
    pub fn with_schema(mut self, name: &str) -> Self {
        self.schema_name = if name.trim().is_empty() {
            None
        } else {
            Some(name.to_string())
        };
        self
    }

    /// Toggle the unknown-record safety check.
    pub fn with_ignore_unknown(mut self, ignore: bool) -> Self {
        self.ignore_unknown = ignore;
        self
    }

    /// Toggle schema and table auto-creation.
    pub fn with_auto_create(mut self, schema: bool, table: bool) -> Self {
        self.create_schema = schema;
        self.create_table = table;
        self
    }
}

/// Expand `$VAR` and `${VAR}` from the process environment.
///
/// Unset variables expand to the empty string.
pub fn expand_env_vars(input: &str) -> String {
    let re = ENV_VAR_RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
            .expect("valid regex literal")
    });
    re.replace_all(input, |caps: &Captures<'_>| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());
        std::env::var(name).unwrap_or_default()
    })
    .into_owned()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

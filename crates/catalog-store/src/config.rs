//! Store configuration
//!
//! Loaded from an optional TOML file and `CATALOG__*` environment
//! variables, e.g. `CATALOG__DATABASE__URL=catalog.db`.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::db::IN_MEMORY_URL;
use crate::errors::{config_error, Result};

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config/catalog.toml";

/// What to do with the schema when a `SessionFactory` is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaAction {
    /// Drop every mapped table, then create the schema
    #[default]
    Create,
    /// Create missing tables; fail if the recorded schema differs
    Update,
    /// Only check that mapped tables and columns exist
    Validate,
    /// Leave the schema alone
    None,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `:memory:` or a file path
    pub url: String,
    pub schema_action: SchemaAction,
    /// Log generated SQL at info level instead of debug
    pub show_sql: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: IN_MEMORY_URL.to_string(),
            schema_action: SchemaAction::default(),
            show_sql: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database: DatabaseConfig,
}

impl StoreConfig {
    /// Private in-memory database, schema created on build
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// File-backed database
    pub fn file(path: impl AsRef<Path>) -> Self {
        let mut config = Self::default();
        config.database.url = path.as_ref().to_string_lossy().into_owned();
        config
    }

    pub fn with_schema_action(mut self, action: SchemaAction) -> Self {
        self.database.schema_action = action;
        self
    }

    pub fn with_show_sql(mut self, show_sql: bool) -> Self {
        self.database.show_sql = show_sql;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database.url == IN_MEMORY_URL
    }

    /// Load from `config/catalog.toml` (optional) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from the given file (optional) and the environment
    ///
    /// Environment variables win over the file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("CATALOG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_error)?;

        settings.try_deserialize().map_err(config_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert!(config.is_in_memory());
        assert_eq!(config.database.schema_action, SchemaAction::Create);
        assert!(!config.database.show_sql);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.database.url, IN_MEMORY_URL);
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[database]\nurl = \"shop.db\"\nschema_action = \"validate\"\nshow_sql = true"
        )
        .unwrap();

        let config = StoreConfig::load_from(&path).unwrap();
        assert_eq!(config.database.url, "shop.db");
        assert_eq!(config.database.schema_action, SchemaAction::Validate);
        assert!(config.database.show_sql);
    }

    #[test]
    fn test_unknown_schema_action_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, "[database]\nschema_action = \"recreate\"\n").unwrap();

        let err = StoreConfig::load_from(&path).unwrap_err();
        assert_eq!(err.kind(), catalog_core::ExErrorKind::Configuration);
    }
}

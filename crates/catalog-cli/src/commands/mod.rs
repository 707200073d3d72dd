pub mod count;
pub mod demo;
pub mod query;
pub mod schema;

use catalog_core::logging_facility::Profile;
use catalog_core::Metamodel;
use catalog_store::config::DEFAULT_CONFIG_FILE;
use catalog_store::{SchemaAction, SessionFactory, StoreConfig};
use clap::Args;
use std::path::PathBuf;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Configuration file (missing file means defaults)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// SQLite database file; existing rows are kept
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Logging profile written to stderr (development, production)
    #[arg(long, global = true)]
    pub log: Option<Profile>,
}

impl GlobalArgs {
    /// Configuration file settings, with `--db` taking precedence
    pub fn store_config(&self) -> Result<StoreConfig, Box<dyn std::error::Error>> {
        let config = StoreConfig::load_from(&self.config)?;
        Ok(match &self.db {
            Some(path) => StoreConfig::file(path)
                .with_schema_action(SchemaAction::Update)
                .with_show_sql(config.database.show_sql),
            None => config,
        })
    }

    /// Session factory over the configured database
    ///
    /// A private in-memory database starts out with the demo products.
    pub fn open_factory(&self) -> Result<SessionFactory, Box<dyn std::error::Error>> {
        let config = self.store_config()?;
        let seed = config.is_in_memory();
        let factory = SessionFactory::build(config, Metamodel::catalog()?)?;
        if seed {
            demo::seed(&factory)?;
        }
        Ok(factory)
    }
}

/// Print one value as a JSON line
pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

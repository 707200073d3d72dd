//! Catalog CLI
//!
//! Command-line interface for the product catalog mapper

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "catalog")]
#[command(about = "Product catalog - inheritance mapping over SQLite", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: commands::GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the generated DDL
    Schema(commands::schema::SchemaArgs),
    /// Save one product of every kind and report counts
    Demo,
    /// Run a query and print the results as JSON lines
    Query(commands::query::QueryArgs),
    /// Print the polymorphic count of an entity
    Count(commands::count::CountArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Some(profile) = cli.global.log {
        catalog_core::logging_facility::init(profile);
    }

    let result = match cli.command {
        Commands::Schema(args) => commands::schema::execute(args),
        Commands::Demo => commands::demo::execute(&cli.global),
        Commands::Query(args) => commands::query::execute(&cli.global, args),
        Commands::Count(args) => commands::count::execute(&cli.global, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

//! Schema command
//!
//! Usage: catalog schema [--drop]

use catalog_core::Metamodel;
use catalog_store::schema::{drop_statements, generate_ddl};
use clap::Args;

use super::CliResult;

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Print the DROP statements first
    #[arg(long)]
    pub drop: bool,
}

/// Print the DDL of the product catalog mapping
pub fn execute(args: SchemaArgs) -> CliResult {
    let model = Metamodel::catalog()?;

    if args.drop {
        for statement in drop_statements(&model)? {
            println!("{};", statement);
        }
        println!();
    }
    for statement in generate_ddl(&model)? {
        println!("{};\n", statement);
    }
    Ok(())
}

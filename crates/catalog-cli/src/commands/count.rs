//! Count command
//!
//! Usage: catalog count <ENTITY> [--db <PATH>]

use clap::Args;
use serde_json::json;

use super::{print_json, CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct CountArgs {
    /// Entity name; subtypes are counted too
    pub entity: String,
}

pub fn execute(global: &GlobalArgs, args: CountArgs) -> CliResult {
    let factory = global.open_factory()?;
    let session = factory.open_session();
    print_json(&json!({
        "entity": args.entity,
        "count": session.count(&args.entity)?,
    }))
}

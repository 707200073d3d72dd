//! Query command
//!
//! Usage: catalog query <ENTITY|QUERY> [--db <PATH>]
//!
//! A bare entity name reads every instance of it and its subtypes; anything
//! else is parsed as query text, e.g. `"from Product where id = 2"`.

use catalog_core::Projection;
use clap::Args;
use serde_json::json;

use super::{print_json, CliResult, GlobalArgs};

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Entity name or query text
    pub query: String,
}

pub fn execute(global: &GlobalArgs, args: QueryArgs) -> CliResult {
    let factory = global.open_factory()?;
    let session = factory.open_session();

    let text = if args.query.trim().contains(char::is_whitespace) {
        args.query.clone()
    } else {
        format!("from {}", args.query.trim())
    };
    let query = session.create_query(&text)?;

    if query.spec().projection == Projection::Count {
        return print_json(&json!({
            "entity": query.spec().entity,
            "count": query.count()?,
        }));
    }
    for item in query.list()? {
        print_json(&item)?;
    }
    Ok(())
}

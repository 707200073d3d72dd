//! Demo command
//!
//! Usage: catalog demo [--db <PATH>]
//!
//! Saves one product of every concrete kind in a single transaction, then
//! prints one JSON line per hierarchy with its polymorphic count and one
//! per table with its physical row count.

use catalog_core::{CampingStove, Chair, Metamodel, Phone, Product, RingProduct, Tent};
use catalog_store::schema::table_layouts;
use catalog_store::{db, Result, SessionFactory};
use serde::Serialize;

use super::{print_json, CliResult, GlobalArgs};

#[derive(Serialize)]
struct HierarchyCount<'a> {
    hierarchy: &'a str,
    strategy: String,
    count: u64,
}

#[derive(Serialize)]
struct TableRows<'a> {
    table: &'a str,
    rows: i64,
}

/// Save one product of every concrete kind
pub fn seed(factory: &SessionFactory) -> Result<()> {
    let session = factory.open_session();
    let tx = session.begin_transaction()?;

    session.save(&mut Product::new("Basic product").with_description("Plain catalog entry"))?;
    session.save(
        &mut RingProduct::new("Engagement ring")
            .with_description("White gold band")
            .with_stone("Diamond", "1ct"),
    )?;
    session.save(
        &mut Phone::new("Samsung S4")
            .with_screen_size("5 inch")
            .with_storage("16Gb"),
    )?;
    session.save(&mut CampingStove::new("Trangia").with_fuel_type("Methylated spirits"))?;
    session.save(
        &mut Tent::new("Hubba Hubba")
            .with_weight(1.54)
            .with_capacity(2),
    )?;
    session.save(&mut Chair::new("Windsor chair").with_material("Oak"))?;

    tx.commit()?;
    session.close();
    Ok(())
}

pub fn execute(global: &GlobalArgs) -> CliResult {
    let factory = SessionFactory::build(global.store_config()?, Metamodel::catalog()?)?;
    seed(&factory)?;

    let session = factory.open_session();
    for root in factory.metamodel().hierarchies() {
        print_json(&HierarchyCount {
            hierarchy: &root.name,
            strategy: root.strategy.to_string(),
            count: session.count(&root.name)?,
        })?;
    }
    for table in table_layouts(factory.metamodel())? {
        print_json(&TableRows {
            table: &table.name,
            rows: db::count_rows(factory.connection(), &table.name)?,
        })?;
    }
    Ok(())
}

//! Insert and polymorphic select planning, and their execution
//!
//! Planning is pure: it turns mapping metadata into SQL. Execution runs a
//! plan on a connection the caller provides, usually inside a session
//! transaction.

mod insert;
mod select;

pub use insert::{insert_plan, InsertStatement};
pub use select::{select_plan, SelectPlan};

use rusqlite::{params_from_iter, Connection};

use crate::errors::{from_rusqlite, Result};
use crate::hydration::{read_row, to_sql_value, LoadedRow};

/// Run one insert; returns the number of rows written
pub fn execute_insert(conn: &Connection, insert: &InsertStatement) -> Result<usize> {
    let params = insert.values.iter().map(to_sql_value);
    conn.execute(&insert.sql(), params_from_iter(params))
        .map_err(|e| from_rusqlite(e).with_entity(insert.table.clone()))
}

/// Run a select plan, optionally bound to an identifier
pub fn execute_select(
    conn: &Connection,
    plan: &SelectPlan,
    id: Option<i64>,
) -> Result<Vec<LoadedRow>> {
    let mut stmt = conn.prepare(&plan.sql).map_err(from_rusqlite)?;
    let mut rows = stmt.query(params_from_iter(id)).map_err(from_rusqlite)?;

    let mut loaded = Vec::new();
    while let Some(row) = rows.next().map_err(from_rusqlite)? {
        loaded.push(read_row(row, plan)?);
    }
    Ok(loaded)
}

/// Count the rows a select plan reads
pub fn execute_count(conn: &Connection, plan: &SelectPlan, id: Option<i64>) -> Result<i64> {
    conn.query_row(&plan.count_sql(), params_from_iter(id), |row| row.get(0))
        .map_err(from_rusqlite)
}

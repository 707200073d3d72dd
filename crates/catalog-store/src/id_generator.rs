//! Per-hierarchy identifier generation
//!
//! One counter row per hierarchy root in `id_sequences`. Identifiers are
//! therefore unique across every table of a hierarchy, including the
//! independent tables of a table-per-concrete-class hierarchy.

use rusqlite::Connection;

use crate::errors::{from_rusqlite, Result};

/// Allocate the next identifier for a hierarchy
///
/// Runs on the caller's connection, so the allocation commits or rolls back
/// together with the insert that uses it.
pub fn next_id(conn: &Connection, hierarchy: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO id_sequences (hierarchy, next_val) VALUES (?1, 1)
         ON CONFLICT(hierarchy) DO UPDATE SET next_val = next_val + 1",
        [hierarchy],
    )
    .map_err(from_rusqlite)?;

    conn.query_row(
        "SELECT next_val FROM id_sequences WHERE hierarchy = ?1",
        [hierarchy],
        |row| row.get(0),
    )
    .map_err(from_rusqlite)
}

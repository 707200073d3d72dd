//! Database connection management
//!
//! Provides utilities for opening and managing SQLite connections

use crate::errors::{from_rusqlite, Result};
use crate::sql;
use rusqlite::Connection;
use std::path::Path;

/// URL selecting a private in-memory database
pub const IN_MEMORY_URL: &str = ":memory:";

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Open the database a configured URL names
pub fn open_url(url: &str) -> Result<Connection> {
    if url == IN_MEMORY_URL {
        open_in_memory()
    } else {
        open(url)
    }
}

/// Configure a connection with the settings the mapper relies on
pub fn configure(conn: &Connection, in_memory: bool) -> Result<()> {
    // Joined subtype tables reference their parent rows
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(from_rusqlite)?;

    if !in_memory {
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(from_rusqlite)?;
    }

    Ok(())
}

/// Number of rows physically stored in a table
pub fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", sql::ident(table)),
        [],
        |row| row.get(0),
    )
    .map_err(from_rusqlite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_enables_foreign_keys() {
        let conn = open_url(IN_MEMORY_URL).unwrap();
        configure(&conn, true).unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_count_rows() {
        let conn = open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE \"Chair\" (id INTEGER); INSERT INTO chair VALUES (1);")
            .unwrap();
        assert_eq!(count_rows(&conn, "Chair").unwrap(), 1);
    }
}

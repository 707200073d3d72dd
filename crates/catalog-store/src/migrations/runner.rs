//! Migration runner

use catalog_core::mapping::Metamodel;
use rusqlite::{Connection, OptionalExtension};

use crate::errors::{checksum_mismatch, from_rusqlite, migration_error, Result};
use crate::migrations::checksums::compute_checksum;
use crate::schema::{drop_statements, generate_ddl};

/// Ledger id of the migration holding the generated mapping DDL
pub const MAPPED_SCHEMA_MIGRATION: &str = "001_mapped_schema";

/// Create the mapped schema if it has not been applied yet
///
/// A ledger entry with a different checksum means the mapping changed
/// since the schema was created; that is an error, not an upgrade.
pub fn apply_migrations(conn: &mut Connection, model: &Metamodel) -> Result<()> {
    create_schema_version_table(conn)?;

    let sql = format!("{};", generate_ddl(model)?.join(";\n"));
    let checksum = compute_checksum(&sql);

    match recorded_checksum(conn, MAPPED_SCHEMA_MIGRATION)? {
        Some(recorded) if recorded == checksum => {
            tracing::debug!(
                migration_id = MAPPED_SCHEMA_MIGRATION,
                "schema already up to date"
            );
            Ok(())
        }
        Some(recorded) => Err(checksum_mismatch(
            MAPPED_SCHEMA_MIGRATION,
            &recorded,
            &checksum,
        )),
        None => apply_migration(conn, MAPPED_SCHEMA_MIGRATION, &sql, &checksum),
    }
}

/// Drop every mapped table together with the id sequences and the ledger
pub fn reset_schema(conn: &Connection, model: &Metamodel) -> Result<()> {
    let mut statements = drop_statements(model)?;
    statements.push("DROP TABLE IF EXISTS schema_version".to_string());
    conn.execute_batch(&format!("{};", statements.join(";\n")))
        .map_err(from_rusqlite)?;
    Ok(())
}

/// Checksum recorded for a migration, if it was applied
pub fn recorded_checksum(conn: &Connection, migration_id: &str) -> Result<Option<String>> {
    let exists: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
            [],
            |_| Ok(true),
        )
        .optional()
        .map_err(from_rusqlite)?
        .unwrap_or(false);
    if !exists {
        return Ok(None);
    }

    conn.query_row(
        "SELECT checksum FROM schema_version WHERE migration_id = ?1",
        [migration_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(from_rusqlite)
}

fn create_schema_version_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY,
            migration_id TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL,
            checksum TEXT NOT NULL
        )",
        [],
    )
    .map_err(from_rusqlite)?;

    Ok(())
}

fn apply_migration(
    conn: &mut Connection,
    migration_id: &str,
    sql: &str,
    checksum: &str,
) -> Result<()> {
    let tx = conn.transaction().map_err(from_rusqlite)?;

    tx.execute_batch(sql)
        .map_err(|e| migration_error(migration_id, e))?;

    let now = chrono::Utc::now().timestamp();
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
        rusqlite::params![migration_id, now, checksum],
    )
    .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::info!(migration_id, checksum, "applied schema migration");
    Ok(())
}

//! Error handling for catalog-store
//!
//! Wraps catalog-core ExError with store-specific helpers

use catalog_core::errors::{ExError, ExErrorKind};
use rusqlite::ErrorCode;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error caused by a failing statement
pub fn migration_error(migration_id: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed", migration_id))
        .with_source(from_rusqlite(err))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::SchemaMismatch)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: recorded {}, mapping now produces {}",
            migration_id, expected, actual
        ))
}

/// Create a schema validation error
pub fn schema_mismatch(table: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::SchemaMismatch)
        .with_op("validate_schema")
        .with_message(format!("Table {}: {}", table, reason))
}

/// Create a configuration error
pub fn config_error(err: config::ConfigError) -> ExError {
    ExError::new(ExErrorKind::Configuration)
        .with_op("load_config")
        .with_message(err.to_string())
}

/// Create a database error from rusqlite::Error
///
/// Constraint failures get their own kind so callers can tell them apart
/// from I/O and SQL errors.
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            ExErrorKind::ConstraintViolation
        }
        _ => ExErrorKind::Persistence,
    };
    ExError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}

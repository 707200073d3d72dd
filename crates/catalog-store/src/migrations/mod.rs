//! Schema migration ledger
//!
//! Provides:
//! - The generated mapping DDL applied as a single checksummed migration
//! - Idempotent application
//! - Drift detection when the mapping changes under an existing database

mod checksums;
mod runner;

pub use checksums::compute_checksum;
pub use runner::{apply_migrations, recorded_checksum, reset_schema, MAPPED_SCHEMA_MIGRATION};

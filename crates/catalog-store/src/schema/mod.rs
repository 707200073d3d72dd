//! Physical schema derived from the mapping metadata
//!
//! Provides:
//! - Table layouts per inheritance strategy
//! - DDL generation (create/drop)
//! - Validation of an existing database against the mapping

mod ddl;
mod layout;
mod validate;

pub use ddl::{drop_statements, generate_ddl};
pub use layout::{mapped_tables, table_layouts, ColumnLayout, TableLayout, ID_SEQUENCES_TABLE};
pub use validate::validate_schema;

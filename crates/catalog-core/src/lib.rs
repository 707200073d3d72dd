//! Catalog Core - mapping metadata and domain model for the product catalog
//!
//! This crate provides:
//! - Inheritance mapping metadata (`Metamodel`) for single-table, joined and
//!   table-per-concrete-class hierarchies
//! - The product entities and the polymorphic `CatalogItem`
//! - A minimal `from <Entity>` query parser
//! - The error and logging facilities shared with the store and CLI

pub mod errors;
pub mod logging_facility;
pub mod mapping;
pub mod model;
pub mod query;

#[doc(hidden)]
pub use catalog_core_types;

// Re-export commonly used types
pub use errors::{CatalogError, ExError, ExErrorKind, Result};
pub use mapping::{ColumnDef, EntityMapping, InheritanceStrategy, Metamodel, SqlType};
pub use model::{
    BaseRecord, CampingStove, CatalogItem, Chair, Entity, Phone, Product, Record, RingProduct,
    Tent, Value,
};
pub use query::{parse_query, Projection, QuerySpec};

//! Inheritance mapping metadata
//!
//! Entities are declared as `EntityMapping`s and validated into a
//! `Metamodel`, which the store uses to generate DDL and plan inserts and
//! polymorphic selects.

mod catalog;
mod entity_mapping;
mod metamodel;
mod strategy;

pub use entity_mapping::EntityMapping;
pub use metamodel::{EntityMeta, Metamodel, DEFAULT_DISCRIMINATOR_COLUMN, ID_COLUMN, TYPE_COLUMN};
pub use strategy::{ColumnDef, InheritanceStrategy, SqlType};

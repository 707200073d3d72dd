//! Catalog Store - SQLite persistence for inheritance-mapped entities
//!
//! Provides:
//! - Connection management and configuration loading
//! - Schema DDL generation and validation from a `Metamodel`
//! - A schema migration ledger with checksums
//! - Per-hierarchy identifier generation
//! - Insert and polymorphic select planning for the three strategies
//! - `SessionFactory` / `Session` / `SessionTransaction`

pub mod config;
pub mod db;
pub mod errors;
pub mod hydration;
pub mod id_generator;
pub mod migrations;
pub mod persister;
pub mod schema;
pub mod session;
mod sql;

// Re-export key types
pub use config::{SchemaAction, StoreConfig};
pub use errors::Result;
pub use session::{Query, Session, SessionFactory, SessionTransaction};

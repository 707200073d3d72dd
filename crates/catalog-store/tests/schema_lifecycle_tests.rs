// Integration tests for schema actions on file-backed databases
// Create, update and validate against a database that outlives the factory,
// and detection of a mapping that drifted from the recorded schema.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use catalog_core::mapping::{EntityMapping, InheritanceStrategy, Metamodel, SqlType};
use catalog_core::{Chair, ExErrorKind, Phone};
use catalog_store::migrations::{recorded_checksum, MAPPED_SCHEMA_MIGRATION};
use catalog_store::{SchemaAction, SessionFactory, StoreConfig};
use std::path::Path;

fn build(path: &Path, action: SchemaAction) -> catalog_store::Result<SessionFactory> {
    SessionFactory::build(
        StoreConfig::file(path).with_schema_action(action),
        Metamodel::catalog().unwrap(),
    )
}

fn seed(path: &Path) {
    let factory = build(path, SchemaAction::Create).unwrap();
    let session = factory.open_session();
    session.save(&mut Phone::new("Samsung S4")).unwrap();
    session.save(&mut Chair::new("Windsor chair")).unwrap();
    session.close();
    factory.close().unwrap();
}

#[test]
fn test_update_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    seed(&path);

    let factory = build(&path, SchemaAction::Update).unwrap();
    let session = factory.open_session();
    assert_eq!(session.count("ElectricalProduct").unwrap(), 1);

    // Sequences continue where the previous factory stopped
    let id = session.save(&mut Phone::new("Nokia 3310")).unwrap();
    assert_eq!(id, 2);
}

#[test]
fn test_create_drops_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    seed(&path);

    let factory = build(&path, SchemaAction::Create).unwrap();
    let session = factory.open_session();
    assert_eq!(session.count("ElectricalProduct").unwrap(), 0);
    assert_eq!(session.count("FurnitureProduct").unwrap(), 0);
}

#[test]
fn test_validate_accepts_created_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    seed(&path);

    let factory = build(&path, SchemaAction::Validate).unwrap();
    assert_eq!(factory.open_session().count("FurnitureProduct").unwrap(), 1);
}

#[test]
fn test_validate_rejects_empty_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.db");

    let err = build(&path, SchemaAction::Validate).err().unwrap();
    assert_eq!(err.kind(), ExErrorKind::SchemaMismatch);
}

#[test]
fn test_none_leaves_schema_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.db");

    let factory = build(&path, SchemaAction::None).unwrap();
    assert_eq!(
        recorded_checksum(factory.connection(), MAPPED_SCHEMA_MIGRATION).unwrap(),
        None
    );
    let err = factory.open_session().count("Chair").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);
}

#[test]
fn test_update_detects_mapping_drift() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    seed(&path);

    // The same database opened with a mapping that no longer matches
    let drifted = Metamodel::build(vec![EntityMapping::root(
        "Gadget",
        InheritanceStrategy::Joined,
    )
    .column("label", SqlType::Text)])
    .unwrap();
    let err = SessionFactory::build(
        StoreConfig::file(&path).with_schema_action(SchemaAction::Update),
        drifted,
    )
    .err()
    .unwrap();

    assert_eq!(err.kind(), ExErrorKind::SchemaMismatch);
    assert_eq!(err.op(), Some("migration_checksum"));
}

#[test]
fn test_config_file_selects_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("shop.db");
    let config_path = dir.path().join("catalog.toml");
    std::fs::write(
        &config_path,
        format!(
            "[database]\nurl = {:?}\nschema_action = \"update\"\n",
            db_path.to_string_lossy()
        ),
    )
    .unwrap();

    let config = StoreConfig::load_from(&config_path).unwrap();
    let factory = SessionFactory::build(config, Metamodel::catalog().unwrap()).unwrap();
    factory
        .open_session()
        .save(&mut Chair::new("Stool"))
        .unwrap();
    factory.close().unwrap();

    assert!(db_path.exists());
}

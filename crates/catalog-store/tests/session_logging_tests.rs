// Session operations emit start/end events tagged with the session id

#![allow(clippy::unwrap_used, clippy::expect_used)]

use catalog_core::logging_facility::test_capture::init_test_capture;
use catalog_core::Tent;
use catalog_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ENTITY, FIELD_ENTITY_ID, FIELD_ERR_CODE,
    FIELD_ROW_COUNT, FIELD_SESSION_ID, FIELD_SQL,
};
use catalog_store::SessionFactory;

#[test]
fn test_save_emits_start_and_end() {
    let capture = init_test_capture();
    let factory = SessionFactory::in_memory().unwrap();
    let session = factory.open_session();
    let session_id = session.id().as_str().to_string();

    session.save(&mut Tent::new("Nallo")).unwrap();

    let events: Vec<_> = capture
        .events_for_op("save")
        .into_iter()
        .filter(|e| e.field(FIELD_SESSION_ID) == Some(session_id.as_str()))
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[1].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[1].field(FIELD_ENTITY), Some("Tent"));
    assert_eq!(events[1].field(FIELD_ENTITY_ID), Some("1"));
}

#[test]
fn test_failed_query_emits_end_error() {
    let capture = init_test_capture();
    let factory = SessionFactory::in_memory().unwrap();
    let session = factory.open_session();
    let session_id = session.id().as_str().to_string();

    session.query("Boat").unwrap_err();

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("query")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_SESSION_ID) == Some(session_id.as_str())
    });
    assert_eq!(errors, 1);
    let error = capture
        .events_for_op("query")
        .into_iter()
        .find(|e| {
            e.field(FIELD_SESSION_ID) == Some(session_id.as_str())
                && e.event.as_deref() == Some(EVENT_END_ERROR)
        })
        .unwrap();
    assert_eq!(error.field(FIELD_ERR_CODE), Some("ERR_UNKNOWN_ENTITY"));
}

#[test]
fn test_sql_is_logged() {
    let capture = init_test_capture();
    let factory = SessionFactory::in_memory().unwrap();
    let session = factory.open_session();
    let session_id = session.id().as_str().to_string();

    session.count("FurnitureProduct").unwrap();

    let logged = capture.count_events(|e| {
        e.field(FIELD_SESSION_ID) == Some(session_id.as_str())
            && e.field(FIELD_SQL).is_some_and(|sql| sql.contains("\"Chair\""))
    });
    assert_eq!(logged, 1);
}

#[test]
fn test_loaded_rows_are_counted() {
    let capture = init_test_capture();
    let factory = SessionFactory::in_memory().unwrap();
    let session = factory.open_session();
    let session_id = session.id().as_str().to_string();
    session.save(&mut Tent::new("Nallo")).unwrap();
    session.save(&mut Tent::new("Akto")).unwrap();

    session.query("CampingProduct").unwrap();

    let counted: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.field(FIELD_SESSION_ID) == Some(session_id.as_str()))
        .filter_map(|e| e.field(FIELD_ROW_COUNT).map(str::to_string))
        .collect();
    assert_eq!(counted, vec!["2".to_string()]);
}

#[test]
fn test_failed_save_is_logged_without_entity_id() {
    let capture = init_test_capture();
    let factory = SessionFactory::in_memory().unwrap();
    let session = factory.open_session();
    let session_id = session.id().as_str().to_string();
    let mut tent = Tent::new("Nallo");
    session.save(&mut tent).unwrap();

    session.save(&mut tent).unwrap_err();

    let failed = capture
        .events_for_op("save")
        .into_iter()
        .find(|e| {
            e.field(FIELD_SESSION_ID) == Some(session_id.as_str())
                && e.event.as_deref() == Some(EVENT_END_ERROR)
        })
        .unwrap();
    assert_eq!(failed.field(FIELD_ERR_CODE), Some("ERR_ALREADY_PERSISTED"));
    assert_eq!(failed.field(FIELD_ENTITY), Some("Tent"));
    assert_eq!(failed.field(FIELD_ENTITY_ID), None);
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

use catalog_core::errors::CatalogError;
use catalog_core::logging_facility::test_capture::init_test_capture;
use catalog_core::{log_op_end, log_op_error, log_op_start};
use catalog_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_carries_entity_field() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, entity = "Phone");

    let starts: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .collect();

    assert_eq!(starts.len(), 1, "Should capture exactly one start event");
    assert_eq!(starts[0].field("entity"), Some("Phone"));
    assert!(starts[0].component.is_some());
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42, row_count = 2);

    let ends: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].field("duration_ms"), Some("42"));
    assert_eq!(ends[0].field("row_count"), Some("2"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = CatalogError::UnknownEntity {
        entity: "Boat".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let errors: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(errors.len(), 1, "Should have exactly one error event");
    assert_eq!(errors[0].field("err_code"), Some("ERR_UNKNOWN_ENTITY"));
    assert_eq!(errors[0].level, tracing::Level::ERROR);
}

#[test]
fn test_start_and_end_pair_per_operation() {
    let capture = init_test_capture();
    let op_name = "test_boundary_pair_unique_4";

    log_op_start!(op_name, entity = "Tent");
    log_op_end!(op_name, duration_ms = 1);

    let count = |event: &str| {
        capture.count_events(|e| {
            e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(event)
        })
    };
    assert_eq!(count(EVENT_START), 1);
    assert_eq!(count(EVENT_END), 1);
    assert_eq!(count(EVENT_END_ERROR), 0);
}

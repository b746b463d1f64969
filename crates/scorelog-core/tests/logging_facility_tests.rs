#![allow(clippy::unwrap_used, clippy::expect_used)]

use scorelog_core::errors::{ExError, ExErrorKind, ReportError};
use scorelog_core::logging_facility::test_capture::init_test_capture;
use scorelog_core::{log_op_end, log_op_error, log_op_start};
use scorelog_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE,
};
use tracing::Level;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, partition = "2024-03");

    let start_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .collect();

    assert_eq!(start_events.len(), 1);
    assert_eq!(
        start_events[0].fields.get("partition"),
        Some(&"2024-03".to_string())
    );
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].fields.get(FIELD_DURATION_MS), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = ExError::new(ExErrorKind::Persistence).with_message("disk full");
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1, "Should have exactly one error event");
    assert_eq!(error_events[0].level, Level::ERROR);
    assert_eq!(
        error_events[0].fields.get(FIELD_ERR_CODE),
        Some(&"ERR_PERSISTENCE".to_string())
    );
}

#[test]
fn test_validation_errors_log_as_warnings() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_validation_unique_4";

    log_op_error!(
        op_name,
        ReportError::MissingField { field: "note" },
        duration_ms = 0
    );

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::WARN);
    assert_eq!(
        events[0].fields.get(FIELD_ERR_CODE),
        Some(&"ERR_MISSING_FIELD".to_string())
    );
}

#[test]
fn test_boundary_ownership_single_start_end() {
    let capture = init_test_capture();
    let op_name = "test_boundary_ownership_unique_5";

    log_op_start!(op_name, partition = "2024-03");
    log_op_end!(op_name, duration_ms = 7, report_id = 1);

    let events = capture.events_for_op(op_name);
    let starts = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .count();
    let ends = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .count();

    assert_eq!(starts, 1);
    assert_eq!(ends, 1);
}

#[test]
fn test_macro_fields_match_schema_keys() {
    let capture = init_test_capture();
    let op_name = "test_macro_fields_match_schema_unique_6";

    log_op_end!(op_name, duration_ms = 3);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert!(events[0]
        .component
        .as_deref()
        .is_some_and(|c| c.contains("logging_facility_tests")));
    assert!(events[0].is(op_name, EVENT_END));
    assert!(events[0].fields.contains_key(FIELD_DURATION_MS));
}

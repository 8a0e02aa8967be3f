#![allow(clippy::unwrap_used, clippy::expect_used)]

use pagewatch_core::core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use pagewatch_core::errors::{ExError, WatchError};
use pagewatch_core::logging_facility::test_capture::init_test_capture;
use pagewatch_core::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, watch_name = "status-page");

    let start_events: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START))
        .collect();

    assert_eq!(start_events.len(), 1);
    assert_eq!(start_events[0].field("watch_name"), Some("status-page"));
    assert!(start_events[0]
        .component
        .as_deref()
        .unwrap()
        .contains("logging_facility_tests"));
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, since = Instant::now(), outcome = "unchanged");

    let end_events: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    let duration: u64 = end_events[0].field("duration_ms").unwrap().parse().unwrap();
    assert!(duration < 60_000);
    assert_eq!(end_events[0].field("outcome"), Some("unchanged"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = WatchError::HttpStatus {
        url: "https://example.com/page".to_string(),
        status: 503,
    };
    log_op_error!(op_name, err, since = Instant::now());

    let error_events: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1);
    let event = &error_events[0];
    assert_eq!(event.level, tracing::Level::ERROR);
    assert_eq!(event.field("err_kind"), Some("HttpStatus"));
    assert_eq!(event.field("err_code"), Some("ERR_HTTP_STATUS"));
    assert!(event.field("error").unwrap().contains("HTTP 503"));
}

#[test]
fn test_events_with_field_filters_by_value() {
    let capture = init_test_capture();

    log_op_start!("test_filter_unique_4", cycle_id = "cycle-filter-a");
    log_op_start!("test_filter_unique_4", cycle_id = "cycle-filter-b");

    let only_a = capture.events_with_field("cycle_id", "cycle-filter-a");
    assert_eq!(only_a.len(), 1);
    assert_eq!(only_a[0].op.as_deref(), Some("test_filter_unique_4"));
}


#[test]
fn test_log_op_error_reports_stamped_context() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_context_unique_5";

    let err = WatchError::DeliveryFailed {
        message: "webhook rejected".to_string(),
        status: Some(429),
    };
    log_op_error!(
        op_name,
        ExError::from(err).with_watch_name("release-notes"),
        since = Instant::now(),
        watch_name = "release-notes"
    );

    let failures = capture.markers_for("release-notes", op_name, EVENT_END_ERROR);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].field("err_code"), Some("ERR_DELIVERY"));
    assert!(failures[0]
        .field("error")
        .unwrap()
        .contains("(watch: release-notes)"));
}

#[test]
fn test_cycle_events_groups_by_cycle_id() {
    let capture = init_test_capture();

    log_op_start!("test_cycle_events_unique_6", cycle_id = "cycle-group-a");
    log_op_end!("test_cycle_events_unique_6", since = Instant::now(), cycle_id = "cycle-group-a");
    log_op_start!("test_cycle_events_unique_6", cycle_id = "cycle-group-b");

    let events = capture.cycle_events("cycle-group-a");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[1].event.as_deref(), Some(EVENT_END));
}

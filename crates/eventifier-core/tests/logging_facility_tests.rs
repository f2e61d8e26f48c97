#![allow(clippy::unwrap_used, clippy::expect_used)]

use eventifier_core::errors::{EventifierError, ExError, ExErrorKind, Stage};
use eventifier_core::logging_facility::test_capture::init_test_capture;
use eventifier_core::{log_op_end, log_op_error, log_op_start, log_record_skipped};
use eventifier_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, records = 3);

    let starts: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .collect();
    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].field("records"), Some("3"));
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42, emitted = 2);

    let ends: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].field("duration_ms"), Some("42"));
    assert_eq!(ends[0].field("emitted"), Some("2"));
}

#[test]
fn test_log_op_error_includes_code_and_stage() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = EventifierError::RecordMalformed {
        reason: "missing id".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 1);

    let errors: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field("err_code"), Some("ERR_RECORD_MALFORMED"));
    assert_eq!(errors[0].field("stage"), Some("record"));
}

#[test]
fn test_log_op_error_accepts_ex_error() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = ExError::new(ExErrorKind::Io)
        .with_stage(Stage::Emit)
        .with_message("disk full");
    log_op_error!(op_name, err, duration_ms = 0, user_id = "7");

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("err_code"), Some("ERR_IO"));
    assert_eq!(events[0].field("stage"), Some("emit"));
    assert_eq!(events[0].field("user_id"), Some("7"));
}

#[test]
fn test_start_end_pairing() {
    let capture = init_test_capture();
    let op_name = "test_start_end_pairing_unique_5";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 5);

    capture.assert_event_exists(op_name, EVENT_START);
    capture.assert_event_exists(op_name, EVENT_END);
    assert_eq!(capture.events_for_op(op_name).len(), 2);
}

#[test]
fn test_last_outcome_prefers_latest_end() {
    let capture = init_test_capture();
    let op_name = "test_last_outcome_unique_6";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 1);
    log_op_error!(
        op_name,
        ExError::new(ExErrorKind::SnapshotUnreadable).with_stage(Stage::Snapshot),
        duration_ms = 2
    );

    let outcome = capture.last_outcome(op_name).expect("outcome");
    assert_eq!(outcome.event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(outcome.field("stage"), Some("snapshot"));
}

#[test]
fn test_record_skipped_is_keyed_by_run() {
    let capture = init_test_capture();
    let run_id = "run-skip-unique-7";

    let err = ExError::new(ExErrorKind::RecordMalformed)
        .with_stage(Stage::Record)
        .with_message("missing or null id");
    log_record_skipped!(run_id, 3usize, err);

    let events = capture.events_for_run(run_id);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, tracing::Level::WARN);
    assert_eq!(events[0].field("index"), Some("3"));
    assert_eq!(events[0].field("err_code"), Some("ERR_RECORD_MALFORMED"));
    assert!(events[0]
        .field("message")
        .is_some_and(|m| m.contains("missing or null id")));
}

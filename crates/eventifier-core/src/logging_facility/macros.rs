//! Canonical logging macros
//!
//! Operation events carry `component`, `op` and `event`; a detection run
//! reads as a `start` followed by exactly one `end` or `end_error`. Records
//! dropped from a run are logged separately at warn level.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:ident $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::eventifier_core_types::schema::$event,
            $($($field)*)?
        );
    };
}

/// Log the start of an operation
///
/// ```
/// # use eventifier_core::log_op_start;
/// log_op_start!("detect_run");
/// log_op_start!("detect_run", records = 12);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(info, $op, EVENT_START $(, $($field)*)?)
    };
}

/// Log the successful end of an operation; `duration_ms` is mandatory
///
/// ```
/// # use eventifier_core::log_op_end;
/// log_op_end!("detect_run", duration_ms = 42, emitted = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info, $op, EVENT_END,
            duration_ms = $duration $(, $($field)*)?
        )
    };
}

/// Log the failed end of an operation with the error's code, kind and stage
///
/// Accepts anything convertible into [`ExError`](crate::errors::ExError).
///
/// ```
/// # use eventifier_core::{log_op_error, errors::EventifierError};
/// let err = EventifierError::RecordMalformed { reason: "missing id".to_string() };
/// log_op_error!("process_record", err, duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error, $op, EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            stage = ex_err.stage().map(|s| s.as_str()).unwrap_or("-")
            $(, $($field)*)?
        )
    }};
}

/// Log a record dropped from a run, keyed by its position in the snapshot
///
/// ```
/// # use eventifier_core::log_record_skipped;
/// # use eventifier_core::errors::{ExError, ExErrorKind, Stage};
/// let err = ExError::new(ExErrorKind::RecordMalformed).with_stage(Stage::Record);
/// log_record_skipped!("run-1", 4usize, err);
/// ```
#[macro_export]
macro_rules! log_record_skipped {
    ($run_id:expr, $index:expr, $err:expr) => {{
        let ex_err: &$crate::errors::ExError = &$err;
        tracing::warn!(
            component = module_path!(),
            run_id = $run_id,
            index = $index,
            err_code = ex_err.code(),
            stage = ex_err.stage().map(|s| s.as_str()).unwrap_or("-"),
            "record skipped: {}",
            ex_err
        );
    }};
}

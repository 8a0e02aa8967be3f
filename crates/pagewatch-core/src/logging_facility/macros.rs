//! Operation marker macros
//!
//! Every bootstrap, cycle, fetch and notify is bracketed by a `start` event
//! and either an `end` or an `end_error` event. The closing macros take the
//! `Instant` the operation started at and log `duration_ms` from it. Extra
//! fields use the usual `tracing` syntax. Callers need `tracing` in their own
//! dependencies.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use pagewatch_core::log_op_start;
/// log_op_start!("watch_cycle");
/// log_op_start!("watch_cycle", watch_name = "status-page");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START
            $(, $($field)+)?
        )
    };
}

/// Log the successful end of an operation started at `since`
///
/// # Example
///
/// ```
/// # use pagewatch_core::log_op_end;
/// let start = std::time::Instant::now();
/// log_op_end!("watch_cycle", since = start, outcome = "unchanged");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, since = $start:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $crate::logging_facility::elapsed_ms($start)
            $(, $($field)+)?
        )
    };
}

/// Log the failure of an operation started at `since`
///
/// `$err` is a [`WatchError`](crate::errors::WatchError) or an
/// [`ExError`](crate::errors::ExError) that already carries extra context;
/// either way the event reports the stable kind and code.
///
/// # Example
///
/// ```
/// # use pagewatch_core::{log_op_error, errors::{ExError, WatchError}};
/// let start = std::time::Instant::now();
/// let err = WatchError::HttpStatus { url: "https://example.com".into(), status: 502 };
/// log_op_error!("fetch", ExError::from(err).with_watch_name("example"), since = start);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, since = $start:expr $(, $($field:tt)+)?) => {{
        let ex_err: $crate::errors::ExError = ::core::convert::Into::into($err);
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $crate::logging_facility::elapsed_ms($start),
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            error = %ex_err
            $(, $($field)+)?
        )
    }};
}

//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical across every log line the
//! watcher emits, so JSON output can be filtered reliably.

// Canonical field keys written by the `log_op_*` macros
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";

// Correlation keys every watch event carries
pub const FIELD_WATCH_NAME: &str = "watch_name";
pub const FIELD_CYCLE_ID: &str = "cycle_id";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Operation names
pub const OP_VALIDATE_SCHEDULE: &str = "validate_schedule";
pub const OP_LOAD_SETTINGS: &str = "load_settings";
pub const OP_BOOTSTRAP: &str = "bootstrap";
pub const OP_WATCH_CYCLE: &str = "watch_cycle";
pub const OP_FETCH: &str = "fetch";
pub const OP_NOTIFY: &str = "notify";

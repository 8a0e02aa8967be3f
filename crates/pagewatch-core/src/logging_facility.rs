//! Structured logging facility for pagewatch
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use pagewatch_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```
//!
//! # Logging Macros
//!
//! - `log_op_start!(op, ...)` - Log operation start
//! - `log_op_end!(op, since = start, ...)` - Log operation end
//! - `log_op_error!(op, err, since = start, ...)` - Log operation error
//!
//! A watch cycle is bracketed by a `watch_cycle` start and end (or
//! end_error) event; the outcome is logged between the two.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};

use std::time::Instant;

/// Whole milliseconds since `start`, as logged in `duration_ms`
pub fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

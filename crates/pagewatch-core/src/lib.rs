//! pagewatch core - detect-and-report kernel
//!
//! This crate holds everything in a watch cycle that does not touch the
//! network:
//! - Watch target and content snapshot models
//! - The in-process version cache
//! - Bounded retry policy for transient failures
//! - Zero-context line diff, change classification and notification rendering
//! - The error and logging facilities shared with the engine and CLI

pub mod cache;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod render;
pub mod retry;

pub use pagewatch_core_types as core_types;

pub use cache::{CacheStats, VersionCache};
pub use diff::{diff_lines, has_change, ChangeHunk, DiffResult, HunkLine, LineKind};
pub use errors::{ExError, ExErrorKind, Result, WatchError};
pub use model::{ContentSnapshot, WatchTarget};
pub use render::format_notification;
pub use retry::{retry_async, RetryPolicy};

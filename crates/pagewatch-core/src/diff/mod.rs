//! Line diff between two content snapshots.
//!
//! Produces unified-diff hunks with zero lines of context, the shape the
//! notification formatter renders.
//!
//! ## Entry point
//!
//! ```
//! use pagewatch_core::diff::{diff_lines, has_change};
//!
//! let diff = diff_lines("line1\nline2\n", "line1\nCHANGED\n");
//! assert!(has_change(&diff));
//! assert_eq!(diff.hunks[0].header(), "@@ -2,1 +2,1 @@");
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical hunks.
//! - **No context**: only changed lines appear; an unchanged line always ends a hunk.
//! - **Delimiter fidelity**: each line keeps its own `\n`, `\r\n`, `\r` or missing
//!   terminator, so line-ending-only edits are reported.

pub mod classify;
pub mod engine;
pub mod model;

pub use classify::has_change;
pub use engine::diff_lines;
pub use model::{ChangeHunk, DiffResult, HunkLine, LineKind};

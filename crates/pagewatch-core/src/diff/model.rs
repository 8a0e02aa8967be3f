//! Diff output types.

use serde::{Deserialize, Serialize};

/// Which side of the diff a line belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LineKind {
    /// Present in the old snapshot only
    Removed,
    /// Present in the new snapshot only
    Added,
}

impl LineKind {
    /// The unified diff prefix character
    pub fn marker(&self) -> char {
        match self {
            LineKind::Removed => '-',
            LineKind::Added => '+',
        }
    }
}

/// One changed line with its exact original terminator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HunkLine {
    pub kind: LineKind,
    /// Line content without its terminator
    pub text: String,
    /// `"\n"`, `"\r\n"`, or `""` for a last line with no newline
    pub delimiter: String,
}

impl HunkLine {
    pub fn removed(text: impl Into<String>, delimiter: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Removed,
            text: text.into(),
            delimiter: delimiter.into(),
        }
    }

    pub fn added(text: impl Into<String>, delimiter: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Added,
            text: text.into(),
            delimiter: delimiter.into(),
        }
    }

    /// True for the last line of a text that does not end in a newline
    pub fn lacks_newline(&self) -> bool {
        self.delimiter.is_empty()
    }
}

/// A contiguous run of changed lines with unified diff positions.
///
/// Numbering follows unified diff: starts are 1-based, and when a side has
/// zero lines its start is the line after which the change happens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeHunk {
    pub old_start: usize,
    pub old_lines: usize,
    pub new_start: usize,
    pub new_lines: usize,
    /// Removed lines first, then added lines, in source order
    pub lines: Vec<HunkLine>,
}

impl ChangeHunk {
    /// `@@ -<old_start>,<old_lines> +<new_start>,<new_lines> @@`
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_lines, self.new_start, self.new_lines
        )
    }

    /// Line terminators in line order, parallel to `lines`
    pub fn delimiters(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.delimiter.as_str()).collect()
    }

    pub fn removed(&self) -> impl Iterator<Item = &HunkLine> {
        self.lines.iter().filter(|l| l.kind == LineKind::Removed)
    }

    pub fn added(&self) -> impl Iterator<Item = &HunkLine> {
        self.lines.iter().filter(|l| l.kind == LineKind::Added)
    }
}

/// Ordered hunks between an old and a new snapshot; empty means identical.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffResult {
    pub hunks: Vec<ChangeHunk>,
}

impl DiffResult {
    pub fn new(hunks: Vec<ChangeHunk>) -> Self {
        Self { hunks }
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hunks.len()
    }

    /// Total removed lines across all hunks
    pub fn deletions(&self) -> usize {
        self.hunks.iter().map(|h| h.old_lines).sum()
    }

    /// Total added lines across all hunks
    pub fn additions(&self) -> usize {
        self.hunks.iter().map(|h| h.new_lines).sum()
    }
}

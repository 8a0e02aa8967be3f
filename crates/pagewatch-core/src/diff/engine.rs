//! Line diff computation.
//!
//! The core entry point is [`diff_lines`], which accepts two texts and
//! produces a [`DiffResult`] of zero-context hunks.

use std::ops::Range;

use similar::{capture_diff_slices, Algorithm, DiffTag};

use crate::diff::model::{ChangeHunk, DiffResult, HunkLine, LineKind};

/// A hunk being accumulated while walking the diff ops.
struct PendingHunk {
    old: Range<usize>,
    new: Range<usize>,
    lines: Vec<HunkLine>,
}

impl PendingHunk {
    fn starting_at(old: usize, new: usize) -> Self {
        Self {
            old: old..old,
            new: new..new,
            lines: Vec::new(),
        }
    }

    fn finish(self) -> ChangeHunk {
        ChangeHunk {
            old_start: unified_start(&self.old),
            old_lines: self.old.len(),
            new_start: unified_start(&self.new),
            new_lines: self.new.len(),
            lines: self.lines,
        }
    }
}

/// 1-based start, or the preceding line number for an empty range.
fn unified_start(range: &Range<usize>) -> usize {
    if range.is_empty() {
        range.start
    } else {
        range.start + 1
    }
}

/// Split `text` into lines, each keeping its `\n` terminator.
///
/// Only `\n` ends a line. A lone `\r` stays part of the line text.
fn tokenize(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Split a line token into its text and its terminator.
fn split_delimiter(line: &str) -> (&str, &str) {
    let text = line
        .strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line);
    (text, &line[text.len()..])
}

fn push_lines(lines: &mut Vec<HunkLine>, kind: LineKind, tokens: &[&str]) {
    for token in tokens {
        let (text, delimiter) = split_delimiter(token);
        lines.push(HunkLine {
            kind,
            text: text.to_string(),
            delimiter: delimiter.to_string(),
        });
    }
}

/// Compute zero-context unified diff hunks between `old` and `new`.
///
/// Lines are compared including their terminators, so `"a\n"` and
/// `"a\r\n"` differ. Unchanged lines are never emitted; any run of
/// unchanged lines closes the current hunk.
pub fn diff_lines(old: &str, new: &str) -> DiffResult {
    if old == new {
        return DiffResult::default();
    }

    let old_tokens = tokenize(old);
    let new_tokens = tokenize(new);
    let ops = capture_diff_slices(Algorithm::Myers, &old_tokens, &new_tokens);

    let mut hunks = Vec::new();
    let mut pending: Option<PendingHunk> = None;

    for op in &ops {
        let old_range = op.old_range();
        let new_range = op.new_range();

        if op.tag() == DiffTag::Equal {
            if !old_range.is_empty() {
                if let Some(hunk) = pending.take() {
                    hunks.push(hunk.finish());
                }
            }
            continue;
        }

        let hunk = pending
            .get_or_insert_with(|| PendingHunk::starting_at(old_range.start, new_range.start));
        hunk.old.end = old_range.end;
        hunk.new.end = new_range.end;

        push_lines(&mut hunk.lines, LineKind::Removed, &old_tokens[old_range]);
        push_lines(&mut hunk.lines, LineKind::Added, &new_tokens[new_range]);
    }

    if let Some(hunk) = pending.take() {
        hunks.push(hunk.finish());
    }

    DiffResult::new(hunks)
}

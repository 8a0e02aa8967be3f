//! Change notification rendering
//!
//! Turns the hunks of one cycle into the Markdown message posted to the
//! webhook: a bold title line followed by a `diff` code block.

use crate::diff::model::ChangeHunk;

/// Standard unified diff marker for a last line without a terminator
pub const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

/// Render one hunk: header line, then each changed line with its marker and
/// original delimiter.
///
/// A line with no delimiter is followed by the no-newline marker on its own
/// line so the next line (or the closing fence) cannot fuse with it.
pub fn render_hunk(hunk: &ChangeHunk) -> String {
    let mut out = hunk.header();
    out.push('\n');
    for line in &hunk.lines {
        out.push(line.kind.marker());
        out.push_str(&line.text);
        if line.lacks_newline() {
            out.push('\n');
            out.push_str(NO_NEWLINE_MARKER);
            out.push('\n');
        } else {
            out.push_str(&line.delimiter);
        }
    }
    out
}

/// Render the notification body for `name`.
///
/// Deterministic in its inputs. Every hunk is followed by one newline, so
/// consecutive hunks are separated by a blank line. No truncation happens
/// here; a sink with a size limit reports the oversized message as a
/// delivery failure.
pub fn format_notification(name: &str, hunks: &[ChangeHunk]) -> String {
    let body: String = hunks
        .iter()
        .map(|hunk| format!("{}\n", render_hunk(hunk)))
        .collect();
    format!("Changes detected for **{name}**\n```diff\n{body}\n```")
}

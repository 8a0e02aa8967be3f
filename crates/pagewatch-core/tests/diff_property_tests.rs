//! Property tests for the diff engine, classifier and notification renderer.

use pagewatch_core::diff::{diff_lines, has_change, ChangeHunk, DiffResult, HunkLine, LineKind};
use pagewatch_core::render::{format_notification, NO_NEWLINE_MARKER};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Text made of short lines from a tiny alphabet, so generated pairs share
/// lines often enough to produce interesting hunks. Every line ends in `\n`
/// or `\r\n` except possibly the last one. Some lines carry a lone `\r`,
/// which must not end a line.
fn text_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(
            (
                prop_oneof![
                    Just(""),
                    Just("a"),
                    Just("b"),
                    Just("c d"),
                    Just("<p>"),
                    Just("a\rb"),
                ],
                prop_oneof![Just("\n"), Just("\r\n")],
            ),
            0..12,
        ),
        prop::option::of(prop_oneof![Just("a"), Just("tail"), Just("tail\r"), Just("\r")]),
    )
        .prop_map(|(lines, last)| {
            let mut out: String = lines.into_iter().map(|(t, d)| format!("{t}{d}")).collect();
            if let Some(last) = last {
                out.push_str(last);
            }
            out
        })
}

/// Split into line tokens, each keeping its terminator.
fn line_tokens(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

fn render_line(line: &HunkLine) -> String {
    format!("{}{}", line.text, line.delimiter)
}

/// Apply hunks to `old`, checking that removed lines match what is there.
fn apply(old: &str, diff: &DiffResult) -> String {
    let tokens = line_tokens(old);
    let mut out = String::new();
    let mut cursor = 0;
    for hunk in &diff.hunks {
        let start = if hunk.old_lines == 0 {
            hunk.old_start
        } else {
            hunk.old_start - 1
        };
        assert!(start >= cursor, "hunks out of order");
        for token in &tokens[cursor..start] {
            out.push_str(token);
        }
        let removed: Vec<String> = hunk.removed().map(render_line).collect();
        let expected: Vec<String> = tokens[start..start + hunk.old_lines]
            .iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(removed, expected, "removed lines do not match old text");
        for line in hunk.added() {
            out.push_str(&render_line(line));
        }
        cursor = start + hunk.old_lines;
    }
    for token in &tokens[cursor..] {
        out.push_str(token);
    }
    out
}

fn parse_header(header: &str) -> (usize, usize, usize, usize) {
    let inner = header
        .strip_prefix("@@ -")
        .and_then(|h| h.strip_suffix(" @@"))
        .expect("hunk header");
    let (old, new) = inner.split_once(" +").expect("header halves");
    let (old_start, old_lines) = old.split_once(',').expect("old range");
    let (new_start, new_lines) = new.split_once(',').expect("new range");
    (
        old_start.parse().unwrap(),
        old_lines.parse().unwrap(),
        new_start.parse().unwrap(),
        new_lines.parse().unwrap(),
    )
}

/// Parse a rendered notification back into a name and hunks.
fn parse_notification(message: &str) -> (String, Vec<ChangeHunk>) {
    let rest = message
        .strip_prefix("Changes detected for **")
        .expect("title prefix");
    let (name, rest) = rest.split_once("**\n```diff\n").expect("code fence");
    let mut body = rest.strip_suffix("\n```").expect("closing fence");
    let marker_line = format!("{NO_NEWLINE_MARKER}\n");

    let mut hunks = Vec::new();
    while !body.is_empty() {
        let (header, after) = body.split_once('\n').expect("header line");
        let (old_start, old_lines, new_start, new_lines) = parse_header(header);
        body = after;

        let mut lines = Vec::new();
        for _ in 0..old_lines + new_lines {
            let kind = match body.as_bytes()[0] {
                b'-' => LineKind::Removed,
                b'+' => LineKind::Added,
                other => panic!("unexpected line marker {:?}", other as char),
            };
            let end = body.find('\n').expect("line terminator");
            let raw = &body[1..=end];
            body = &body[end + 1..];
            let (text, delimiter) = if let Some(after_marker) = body.strip_prefix(&marker_line) {
                body = after_marker;
                (&raw[..raw.len() - 1], "")
            } else if let Some(text) = raw.strip_suffix("\r\n") {
                (text, "\r\n")
            } else {
                (&raw[..raw.len() - 1], "\n")
            };
            lines.push(HunkLine {
                kind,
                text: text.to_string(),
                delimiter: delimiter.to_string(),
            });
        }
        body = body.strip_prefix('\n').expect("blank line after hunk");

        hunks.push(ChangeHunk {
            old_start,
            old_lines,
            new_start,
            new_lines,
            lines,
        });
    }
    (name.to_string(), hunks)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_equal_texts_have_no_hunks(text in text_strategy()) {
        let diff = diff_lines(&text, &text);
        prop_assert!(diff.is_empty());
        prop_assert!(!has_change(&diff));
    }

    #[test]
    fn prop_classifier_matches_hunk_presence(old in text_strategy(), new in text_strategy()) {
        let diff = diff_lines(&old, &new);
        prop_assert_eq!(has_change(&diff), !diff.hunks.is_empty());
        prop_assert_eq!(has_change(&diff), old != new);
    }

    #[test]
    fn prop_hunks_rebuild_new_text(old in text_strategy(), new in text_strategy()) {
        let diff = diff_lines(&old, &new);
        prop_assert_eq!(apply(&old, &diff), new);
    }

    #[test]
    fn prop_hunks_have_no_context_lines(old in text_strategy(), new in text_strategy()) {
        let diff = diff_lines(&old, &new);
        for hunk in &diff.hunks {
            prop_assert!(!hunk.lines.is_empty());
            prop_assert_eq!(hunk.removed().count(), hunk.old_lines);
            prop_assert_eq!(hunk.added().count(), hunk.new_lines);
        }
    }

    #[test]
    fn prop_notification_round_trips(
        name in "[a-z][a-z0-9-]{0,11}",
        old in text_strategy(),
        new in text_strategy(),
    ) {
        let diff = diff_lines(&old, &new);
        let message = format_notification(&name, &diff.hunks);
        let (parsed_name, parsed_hunks) = parse_notification(&message);
        prop_assert_eq!(parsed_name, name);
        prop_assert_eq!(parsed_hunks, diff.hunks);
    }
}

use crate::diff::model::DiffResult;

/// Whether a diff is worth a notification.
///
/// Any hunk at all counts, including a single changed character or a
/// changed line ending. There is no significance threshold.
pub fn has_change(diff: &DiffResult) -> bool {
    !diff.hunks.is_empty()
}

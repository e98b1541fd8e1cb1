//! Caret-to-line mapping.

use core_types::NodeId;

use crate::host::{HostRange, SelectionHost};

/// Zero-based caret coordinate. `column` counts characters, not bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CaretPosition {
    pub line: usize,
    pub column: usize,
}

/// Line index of the caret inside `editor`, or `None` when there is no
/// selection or it is anchored outside `editor`.
pub fn compute_caret_line<H: SelectionHost + ?Sized>(host: &H, editor: NodeId) -> Option<usize> {
    compute_caret_position(host, editor).map(|p| p.line)
}

/// Line and column of the caret inside `editor`.
pub fn compute_caret_position<H: SelectionHost + ?Sized>(
    host: &H,
    editor: NodeId,
) -> Option<CaretPosition> {
    let range = host.selection()?;
    caret_position_for_range(host, editor, &range)
}

/// Like [`compute_caret_position`] for an already queried selection.
///
/// Collapsed and extended selections are treated alike: the position is that
/// of the trailing edge, `range.end`.
pub fn caret_position_for_range<H: SelectionHost + ?Sized>(
    host: &H,
    editor: NodeId,
    range: &HostRange,
) -> Option<CaretPosition> {
    if !host.contains(editor, range.start.node) {
        return None;
    }
    let before = host.text_before(editor, range.end);
    Some(caret_position_in(&before))
}

/// Position of a caret sitting right after `prefix`.
///
/// ```
/// use line_core::{CaretPosition, caret_position_in};
///
/// assert_eq!(caret_position_in(""), CaretPosition { line: 0, column: 0 });
/// assert_eq!(caret_position_in("a\nbb"), CaretPosition { line: 1, column: 2 });
/// ```
pub fn caret_position_in(prefix: &str) -> CaretPosition {
    let line = memchr::memchr_iter(b'\n', prefix.as_bytes()).count();
    let line_start = memchr::memrchr(b'\n', prefix.as_bytes())
        .map(|nl| nl + 1)
        .unwrap_or(0);
    let column = prefix[line_start..].chars().count();
    CaretPosition { line, column }
}

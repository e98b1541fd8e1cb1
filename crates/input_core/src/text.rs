//! UTF-8 text utilities for caret handling.
//!
//! Every caret offset in this crate is a byte index that must sit on a
//! character boundary; these helpers keep it there.

use std::borrow::Cow;

/// Clamp an arbitrary byte index to a valid UTF-8 character boundary.
///
/// Indices past the end clamp to `s.len()`; indices inside a multi-byte
/// character move back to the start of that character.
///
/// # Examples
///
/// ```
/// use input_core::clamp_to_char_boundary;
///
/// let s = "a€b"; // '€' is 3 bytes
/// assert_eq!(clamp_to_char_boundary(s, 2), 1);
/// assert_eq!(clamp_to_char_boundary(s, 4), 4);
/// assert_eq!(clamp_to_char_boundary(s, 100), 5);
/// ```
#[inline]
pub fn clamp_to_char_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Previous caret position before `i`, or 0 at the start.
///
/// ```
/// use input_core::prev_cursor_boundary;
///
/// assert_eq!(prev_cursor_boundary("a€b", 4), 1);
/// assert_eq!(prev_cursor_boundary("a€b", 0), 0);
/// ```
pub fn prev_cursor_boundary(s: &str, i: usize) -> usize {
    let i = clamp_to_char_boundary(s, i);
    if i == 0 {
        return 0;
    }
    s[..i]
        .char_indices()
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

/// Next caret position after `i`, or `s.len()` at the end.
///
/// ```
/// use input_core::next_cursor_boundary;
///
/// assert_eq!(next_cursor_boundary("a€b", 1), 4);
/// assert_eq!(next_cursor_boundary("a€b", 5), 5);
/// ```
pub fn next_cursor_boundary(s: &str, i: usize) -> usize {
    let i = clamp_to_char_boundary(s, i);
    if i >= s.len() {
        return s.len();
    }

    let mut it = s[i..].char_indices();
    let _ = it.next();
    it.next().map(|(idx, _)| i + idx).unwrap_or(s.len())
}

/// Rebuild the list of caret positions inside `value[range_start..range_end]`,
/// both ends included.
///
/// ```
/// use input_core::rebuild_cursor_boundaries;
///
/// let mut out = Vec::new();
/// rebuild_cursor_boundaries("x\na€b", 2, 7, &mut out);
/// assert_eq!(out, vec![2, 3, 6, 7]);
/// ```
pub fn rebuild_cursor_boundaries(
    value: &str,
    range_start: usize,
    range_end: usize,
    out: &mut Vec<usize>,
) {
    out.clear();
    let end = clamp_to_char_boundary(value, range_end);
    let start = clamp_to_char_boundary(value, range_start).min(end);

    out.extend(value[start..end].char_indices().map(|(i, _)| start + i));
    if out.first().copied() != Some(start) {
        out.insert(0, start);
    }
    if out.last().copied() != Some(end) {
        out.push(end);
    }
}

/// Normalize newlines (CRLF/CR → LF).
///
/// Borrows when nothing needs to change.
///
/// ```
/// use input_core::normalize_newlines;
///
/// assert_eq!(normalize_newlines("a\r\nb\rc"), "a\nb\nc");
/// ```
pub fn normalize_newlines(s: &str) -> Cow<'_, str> {
    if !s.contains('\r') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut it = s.chars().peekable();
    while let Some(ch) = it.next() {
        match ch {
            '\r' => {
                if it.peek() == Some(&'\n') {
                    let _ = it.next();
                }
                out.push('\n');
            }
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Byte offset where the line containing `i` starts.
pub fn line_start(s: &str, i: usize) -> usize {
    let i = clamp_to_char_boundary(s, i);
    s[..i].rfind('\n').map(|nl| nl + 1).unwrap_or(0)
}

/// Byte offset where the line containing `i` ends (before its line break).
pub fn line_end(s: &str, i: usize) -> usize {
    let i = clamp_to_char_boundary(s, i);
    s[i..].find('\n').map(|nl| i + nl).unwrap_or(s.len())
}

/// Byte offset of the `column`-th character of the line starting at
/// `line_start`, clamped to the end of that line.
pub fn offset_for_column(s: &str, line_start: usize, column: usize) -> usize {
    let end = line_end(s, line_start);
    s[line_start..end]
        .char_indices()
        .nth(column)
        .map(|(i, _)| line_start + i)
        .unwrap_or(end)
}

/// Find the caret position closest to `x` inside one line.
///
/// `boundaries` holds the candidate caret offsets of the line (see
/// [`rebuild_cursor_boundaries`]); `measure_range_prefix` returns the width of
/// `value[range_start..idx]`. Binary search for the last boundary left of `x`,
/// then snap to whichever neighbour is nearer.
pub fn caret_from_x_with_boundaries_in_range(
    value: &str,
    boundaries: &[usize],
    range_start: usize,
    x: f32,
    mut measure_range_prefix: impl FnMut(&str) -> f32,
) -> usize {
    if value.is_empty() || boundaries.is_empty() {
        return range_start;
    }

    let x = x.max(0.0);
    let mut lo = 0usize;
    let mut hi = boundaries.len() - 1;

    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        let w = measure_range_prefix(&value[range_start..boundaries[mid]]).max(0.0);
        if w <= x {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    let left_idx = boundaries[lo];
    let left_w = measure_range_prefix(&value[range_start..left_idx]).max(0.0);

    if lo + 1 < boundaries.len() {
        let right_idx = boundaries[lo + 1];
        let right_w = measure_range_prefix(&value[range_start..right_idx]).max(0.0);
        if x - left_w > right_w - x {
            return right_idx;
        }
    }

    left_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_boundary_basic() {
        let s = "a€b";
        assert_eq!(clamp_to_char_boundary(s, 0), 0);
        assert_eq!(clamp_to_char_boundary(s, 3), 1);
        assert_eq!(clamp_to_char_boundary(s, 5), 5);
        assert_eq!(clamp_to_char_boundary(s, 100), 5);
    }

    #[test]
    fn prev_next_cursor_basic() {
        let s = "a€b";
        assert_eq!(prev_cursor_boundary(s, 5), 4);
        assert_eq!(prev_cursor_boundary(s, 1), 0);
        assert_eq!(next_cursor_boundary(s, 0), 1);
        assert_eq!(next_cursor_boundary(s, 4), 5);
    }

    #[test]
    fn line_start_and_end_bracket_the_caret_line() {
        let s = "a\nbb\nccc";
        assert_eq!(line_start(s, 0), 0);
        assert_eq!(line_end(s, 0), 1);
        assert_eq!(line_start(s, 3), 2);
        assert_eq!(line_end(s, 3), 4);
        assert_eq!(line_start(s, s.len()), 5);
        assert_eq!(line_end(s, s.len()), s.len());
    }

    #[test]
    fn line_helpers_on_empty_text() {
        assert_eq!(line_start("", 0), 0);
        assert_eq!(line_end("", 0), 0);
        assert_eq!(offset_for_column("", 0, 4), 0);
    }

    #[test]
    fn offset_for_column_clamps_to_line_end() {
        let s = "abcd\nx\n€€";
        assert_eq!(offset_for_column(s, 0, 2), 2);
        assert_eq!(offset_for_column(s, 5, 3), 6);
        assert_eq!(offset_for_column(s, 7, 1), 10);
    }

    #[test]
    fn normalize_newlines_basic() {
        assert_eq!(normalize_newlines("hello"), "hello");
        assert_eq!(normalize_newlines("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn caret_from_x_picks_nearest_boundary_within_a_line() {
        let value = "ab\nhello";
        let measure = |s: &str| s.chars().count() as f32 * 10.0;
        let mut boundaries = Vec::new();
        rebuild_cursor_boundaries(value, 3, value.len(), &mut boundaries);

        let at = |x: f32| caret_from_x_with_boundaries_in_range(value, &boundaries, 3, x, measure);
        assert_eq!(at(0.0), 3);
        assert_eq!(at(4.0), 3);
        assert_eq!(at(6.0), 4);
        assert_eq!(at(999.0), value.len());
    }
}

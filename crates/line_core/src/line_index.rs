//! Line structure of a document.

use std::ops::Range;

pub const LINE_BREAK: u8 = b'\n';

/// Number of lines in `text`: line breaks plus one. Never zero.
///
/// ```
/// use line_core::compute_line_count;
///
/// assert_eq!(compute_line_count(""), 1);
/// assert_eq!(compute_line_count("a\nbb\nccc"), 3);
/// assert_eq!(compute_line_count("trailing\n"), 2);
/// ```
pub fn compute_line_count(text: &str) -> usize {
    memchr::memchr_iter(LINE_BREAK, text.as_bytes()).count() + 1
}

/// Byte ranges of every line of a document, line breaks excluded.
///
/// Rebuilt from scratch whenever the document changes; never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineTable {
    lines: Vec<Range<usize>>,
}

impl LineTable {
    pub fn build(text: &str) -> Self {
        let mut lines = Vec::with_capacity(compute_line_count(text));
        let mut start = 0usize;
        for nl in memchr::memchr_iter(LINE_BREAK, text.as_bytes()) {
            lines.push(start..nl);
            start = nl + 1;
        }
        lines.push(start..text.len());
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always `false`: an empty document still has one line.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[Range<usize>] {
        &self.lines
    }

    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        self.lines.get(line).cloned()
    }

    /// Line containing the byte `offset`. A line break belongs to the line it
    /// terminates; offsets past the end map to the last line.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        let i = self.lines.partition_point(|r| r.start <= offset);
        i.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_count_matches_line_breaks_plus_one() {
        for text in ["", "\n", "\n\n", "abc", "a\nb", "a\r\nb", "€\n€\n"] {
            let breaks = text.chars().filter(|c| *c == '\n').count();
            assert_eq!(compute_line_count(text), breaks + 1, "{text:?}");
        }
    }

    #[test]
    fn table_of_empty_document_has_one_empty_line() {
        let table = LineTable::build("");
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
        assert_eq!(table.line_range(0), Some(0..0));
    }

    #[test]
    fn table_ranges_exclude_line_breaks() {
        let table = LineTable::build("a\nbb\n\nccc");
        assert_eq!(table.lines(), &[0..1, 2..4, 5..5, 6..9]);
        assert_eq!(table.len(), compute_line_count("a\nbb\n\nccc"));
    }

    #[test]
    fn trailing_line_break_opens_an_empty_last_line() {
        let table = LineTable::build("a\n");
        assert_eq!(table.lines(), &[0..1, 2..2]);
        assert_eq!(table.line_of_offset(2), 1);
    }

    #[test]
    fn line_of_offset_maps_boundaries() {
        let table = LineTable::build("a\nbb\nccc");
        assert_eq!(table.line_of_offset(0), 0);
        assert_eq!(table.line_of_offset(1), 0);
        assert_eq!(table.line_of_offset(2), 1);
        assert_eq!(table.line_of_offset(4), 1);
        assert_eq!(table.line_of_offset(5), 2);
        assert_eq!(table.line_of_offset(100), 2);
    }
}

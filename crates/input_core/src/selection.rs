//! Text selection representation.

/// A selection inside an editable surface, as a byte range.
///
/// The range is always normalized such that `start <= end`, regardless of
/// the direction in which the user extended it. `end` is therefore the
/// trailing edge in document order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionRange {
    /// Start byte offset of the selection (inclusive).
    pub start: usize,
    /// End byte offset of the selection (exclusive).
    pub end: usize,
}

impl SelectionRange {
    /// Create a new selection range from two boundaries in any order.
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A zero-width selection at `at`.
    #[inline]
    pub fn collapsed(at: usize) -> Self {
        Self { start: at, end: at }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// The selected substring.
    ///
    /// # Panics
    ///
    /// Panics if `start` or `end` are out of bounds or not on character boundaries.
    #[inline]
    pub fn slice<'a>(&self, value: &'a str) -> &'a str {
        &value[self.start..self.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backward_selection_is_normalized() {
        let range = SelectionRange::new(10, 5);
        assert_eq!(range, SelectionRange { start: 5, end: 10 });
        assert_eq!(range.len(), 5);
    }

    #[test]
    fn collapsed_selection_is_empty() {
        assert!(SelectionRange::collapsed(3).is_empty());
        assert!(!SelectionRange::new(3, 5).is_empty());
    }

    #[test]
    fn slice_spans_lines() {
        let text = "a\nbb\nccc";
        assert_eq!(SelectionRange::new(2, 6).slice(text), "bb\nc");
    }
}

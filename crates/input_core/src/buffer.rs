//! Text, caret and selection state of one editable surface.
//!
//! The buffer is UI-agnostic: it performs no layout or measurement. Hosts
//! translate pointer positions into byte offsets and then call into it.

use crate::selection::SelectionRange;
use crate::text::{
    clamp_to_char_boundary, line_end, line_start, next_cursor_boundary, normalize_newlines,
    offset_for_column, prev_cursor_boundary,
};

/// Editable document state.
///
/// # Example
///
/// ```
/// use input_core::EditBuffer;
///
/// let mut buf = EditBuffer::new("x\ny\nz");
/// buf.set_caret(2, false);
/// buf.insert_text("    ");
///
/// assert_eq!(buf.value(), "x\n    y\nz");
/// assert_eq!(buf.caret(), 6);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EditBuffer {
    value: String,

    /// Caret as a byte index into `value` (always on a char boundary).
    caret: usize,

    /// When `Some(anchor)`, the selection is `min(anchor, caret)..max(anchor, caret)`.
    selection_anchor: Option<usize>,

    /// Vertical scroll offset in px.
    scroll_y: f32,
}

impl EditBuffer {
    /// Seed a buffer. Newlines are normalized to LF and the caret starts at 0.
    pub fn new(initial: impl Into<String>) -> Self {
        let initial = initial.into();
        let value = match normalize_newlines(&initial) {
            std::borrow::Cow::Borrowed(_) => initial,
            std::borrow::Cow::Owned(normalized) => normalized,
        };
        Self {
            value,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    /// Non-collapsed selection, if any.
    pub fn selection(&self) -> Option<SelectionRange> {
        selection_range(&self.value, self.selection_anchor, self.caret)
    }

    /// The selection as a range, collapsed at the caret when nothing is selected.
    pub fn selection_or_caret(&self) -> SelectionRange {
        self.selection()
            .unwrap_or_else(|| SelectionRange::collapsed(self.caret))
    }

    /// Set the vertical scroll offset, clamped to `0..=max_scroll`.
    ///
    /// Returns `true` if the offset changed.
    pub fn set_scroll_y(&mut self, scroll_y: f32, max_scroll: f32) -> bool {
        let max_scroll = if max_scroll.is_finite() { max_scroll.max(0.0) } else { 0.0 };
        let scroll_y = if scroll_y.is_finite() { scroll_y } else { 0.0 };
        let next = scroll_y.clamp(0.0, max_scroll);
        let changed = (next - self.scroll_y).abs() > f32::EPSILON;
        self.scroll_y = next;
        changed
    }

    /// Insert text at the caret, replacing the selection if there is one.
    ///
    /// Newlines are normalized (CRLF/CR → LF). The caret collapses after the
    /// inserted text. Returns `true` if the value changed.
    pub fn insert_text(&mut self, s: &str) -> bool {
        self.clamp();
        let s = normalize_newlines(s);
        if s.is_empty() {
            return self.delete_selection_if_any();
        }

        self.delete_selection_if_any();

        let caret = self.caret;
        self.value.insert_str(caret, &s);
        self.caret = clamp_to_char_boundary(&self.value, caret + s.len());
        true
    }

    /// Delete the selection, or the character before the caret.
    pub fn backspace(&mut self) -> bool {
        self.clamp();
        if self.delete_selection_if_any() {
            return true;
        }
        if self.caret == 0 {
            return false;
        }

        let prev = prev_cursor_boundary(&self.value, self.caret);
        self.value.drain(prev..self.caret);
        self.caret = prev;
        true
    }

    /// Delete the selection, or the character after the caret.
    pub fn delete(&mut self) -> bool {
        self.clamp();
        if self.delete_selection_if_any() {
            return true;
        }
        if self.caret >= self.value.len() {
            return false;
        }

        let next = next_cursor_boundary(&self.value, self.caret);
        self.value.drain(self.caret..next);
        true
    }

    pub fn move_caret_left(&mut self, selecting: bool) {
        self.clamp();
        if !selecting && let Some(sel) = self.selection() {
            self.caret = sel.start;
            self.selection_anchor = None;
            return;
        }
        let target = prev_cursor_boundary(&self.value, self.caret);
        self.move_to(target, selecting);
    }

    pub fn move_caret_right(&mut self, selecting: bool) {
        self.clamp();
        if !selecting && let Some(sel) = self.selection() {
            self.caret = sel.end;
            self.selection_anchor = None;
            return;
        }
        let target = next_cursor_boundary(&self.value, self.caret);
        self.move_to(target, selecting);
    }

    /// Move the caret `delta` logical lines, keeping its character column
    /// where the target line is long enough.
    pub fn move_caret_vertically(&mut self, delta: isize, selecting: bool) {
        self.clamp();
        if delta == 0 {
            return;
        }

        let cur_start = line_start(&self.value, self.caret);
        let column = self.value[cur_start..self.caret].chars().count();

        let mut start = cur_start;
        if delta < 0 {
            for _ in 0..delta.unsigned_abs() {
                if start == 0 {
                    self.move_to(0, selecting);
                    return;
                }
                start = line_start(&self.value, start - 1);
            }
        } else {
            for _ in 0..delta.unsigned_abs() {
                let end = line_end(&self.value, start);
                if end >= self.value.len() {
                    let len = self.value.len();
                    self.move_to(len, selecting);
                    return;
                }
                start = end + 1;
            }
        }

        let target = offset_for_column(&self.value, start, column);
        self.move_to(target, selecting);
    }

    pub fn move_caret_to_line_start(&mut self, selecting: bool) {
        self.clamp();
        let target = line_start(&self.value, self.caret);
        self.move_to(target, selecting);
    }

    pub fn move_caret_to_line_end(&mut self, selecting: bool) {
        self.clamp();
        let target = line_end(&self.value, self.caret);
        self.move_to(target, selecting);
    }

    pub fn move_caret_to_start(&mut self, selecting: bool) {
        self.clamp();
        self.move_to(0, selecting);
    }

    pub fn move_caret_to_end(&mut self, selecting: bool) {
        self.clamp();
        let len = self.value.len();
        self.move_to(len, selecting);
    }

    pub fn select_all(&mut self) {
        self.clamp();
        self.selection_anchor = Some(0);
        self.caret = self.value.len();
        self.normalize_selection_anchor();
    }

    /// Set the caret to a byte position, extending the selection if `selecting`.
    pub fn set_caret(&mut self, caret: usize, selecting: bool) {
        self.clamp();
        let caret = clamp_to_char_boundary(&self.value, caret);
        self.move_to(caret, selecting);
    }

    fn move_to(&mut self, caret: usize, selecting: bool) {
        if selecting {
            if self.selection_anchor.is_none() {
                self.selection_anchor = Some(self.caret);
            }
            self.caret = caret;
            self.normalize_selection_anchor();
        } else {
            self.caret = caret;
            self.selection_anchor = None;
        }
    }

    fn normalize_selection_anchor(&mut self) {
        let Some(anchor) = self.selection_anchor else {
            return;
        };
        let anchor = clamp_to_char_boundary(&self.value, anchor);
        // A collapsed selection drops its anchor so it does not stick around.
        self.selection_anchor = (anchor != self.caret).then_some(anchor);
    }

    fn delete_selection_if_any(&mut self) -> bool {
        let Some(sel) = self.selection() else {
            self.selection_anchor = None;
            return false;
        };

        self.value.drain(sel.start..sel.end);
        self.caret = clamp_to_char_boundary(&self.value, sel.start);
        self.selection_anchor = None;
        true
    }

    fn clamp(&mut self) {
        self.caret = clamp_to_char_boundary(&self.value, self.caret);
        if let Some(a) = self.selection_anchor {
            self.selection_anchor = Some(clamp_to_char_boundary(&self.value, a));
        }
        self.scroll_y = self.scroll_y.max(0.0);
    }

}

fn selection_range(value: &str, anchor: Option<usize>, caret: usize) -> Option<SelectionRange> {
    let anchor = anchor?;

    let a = clamp_to_char_boundary(value, anchor);
    let c = clamp_to_char_boundary(value, caret);
    if a == c {
        return None;
    }

    Some(SelectionRange::new(a, c))
}

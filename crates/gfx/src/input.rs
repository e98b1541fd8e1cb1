//! Translation of egui key input into editor actions.

use core_types::KeyCode;
use egui::{Key, Modifiers};
use input_core::EditBuffer;

/// What the host's default handling of a key press did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEffect {
    None,
    /// The text changed.
    Edited,
    /// Only the caret or selection moved.
    Moved,
    /// The editor should lose focus.
    Blur,
}

pub fn key_code(key: Key) -> KeyCode {
    match key {
        Key::Tab => KeyCode::Tab,
        Key::Enter => KeyCode::Enter,
        Key::Backspace => KeyCode::Backspace,
        Key::Delete => KeyCode::Delete,
        Key::ArrowLeft => KeyCode::ArrowLeft,
        Key::ArrowRight => KeyCode::ArrowRight,
        Key::ArrowUp => KeyCode::ArrowUp,
        Key::ArrowDown => KeyCode::ArrowDown,
        Key::Home => KeyCode::Home,
        Key::End => KeyCode::End,
        Key::PageUp => KeyCode::PageUp,
        Key::PageDown => KeyCode::PageDown,
        Key::Escape => KeyCode::Escape,
        _ => KeyCode::Other,
    }
}

/// Default action of a key press the widget did not consume.
///
/// `page_rows` is how far PageUp/PageDown move. `skip_enter` is set when the
/// same frame already delivered the newline as text.
pub fn apply_default_key(
    buffer: &mut EditBuffer,
    key: Key,
    modifiers: Modifiers,
    page_rows: usize,
    skip_enter: bool,
) -> KeyEffect {
    let selecting = modifiers.shift;
    let jump = modifiers.command || modifiers.ctrl;
    let edited = |changed: bool| {
        if changed {
            KeyEffect::Edited
        } else {
            KeyEffect::None
        }
    };

    match key {
        Key::Enter if !skip_enter => edited(buffer.insert_text("\n")),
        Key::Backspace => edited(buffer.backspace()),
        Key::Delete => edited(buffer.delete()),
        Key::ArrowLeft => {
            buffer.move_caret_left(selecting);
            KeyEffect::Moved
        }
        Key::ArrowRight => {
            buffer.move_caret_right(selecting);
            KeyEffect::Moved
        }
        Key::ArrowUp => {
            buffer.move_caret_vertically(-1, selecting);
            KeyEffect::Moved
        }
        Key::ArrowDown => {
            buffer.move_caret_vertically(1, selecting);
            KeyEffect::Moved
        }
        Key::PageUp => {
            buffer.move_caret_vertically(-(page_rows.max(1) as isize), selecting);
            KeyEffect::Moved
        }
        Key::PageDown => {
            buffer.move_caret_vertically(page_rows.max(1) as isize, selecting);
            KeyEffect::Moved
        }
        Key::Home if jump => {
            buffer.move_caret_to_start(selecting);
            KeyEffect::Moved
        }
        Key::End if jump => {
            buffer.move_caret_to_end(selecting);
            KeyEffect::Moved
        }
        Key::Home => {
            buffer.move_caret_to_line_start(selecting);
            KeyEffect::Moved
        }
        Key::End => {
            buffer.move_caret_to_line_end(selecting);
            KeyEffect::Moved
        }
        Key::A if jump => {
            buffer.select_all();
            KeyEffect::Moved
        }
        Key::Escape => KeyEffect::Blur,
        _ => KeyEffect::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_at(text: &str, caret: usize) -> EditBuffer {
        let mut b = EditBuffer::new(text);
        b.set_caret(caret, false);
        b
    }

    #[test]
    fn enter_inserts_newline_unless_already_typed() {
        let mut b = buffer_at("ab", 1);
        assert_eq!(apply_default_key(&mut b, Key::Enter, Modifiers::NONE, 10, false), KeyEffect::Edited);
        assert_eq!(b.value(), "a\nb");

        assert_eq!(apply_default_key(&mut b, Key::Enter, Modifiers::NONE, 10, true), KeyEffect::None);
        assert_eq!(b.value(), "a\nb");
    }

    #[test]
    fn backspace_at_start_changes_nothing() {
        let mut b = buffer_at("ab", 0);
        assert_eq!(apply_default_key(&mut b, Key::Backspace, Modifiers::NONE, 10, false), KeyEffect::None);
        let mut b = buffer_at("ab", 2);
        assert_eq!(apply_default_key(&mut b, Key::Backspace, Modifiers::NONE, 10, false), KeyEffect::Edited);
        assert_eq!(b.value(), "a");
    }

    #[test]
    fn navigation_moves_the_caret() {
        let mut b = buffer_at("one\ntwo\nthree", 0);
        apply_default_key(&mut b, Key::ArrowDown, Modifiers::NONE, 10, false);
        assert_eq!(b.caret(), 4);
        apply_default_key(&mut b, Key::End, Modifiers::NONE, 10, false);
        assert_eq!(b.caret(), 7);
        apply_default_key(&mut b, Key::End, Modifiers::CTRL, 10, false);
        assert_eq!(b.caret(), 13);
        apply_default_key(&mut b, Key::PageUp, Modifiers::NONE, 1, false);
        assert_eq!(b.caret(), 7);
        apply_default_key(&mut b, Key::PageUp, Modifiers::NONE, 10, false);
        assert_eq!(b.caret(), 0);
    }

    #[test]
    fn shift_extends_selection() {
        let mut b = buffer_at("abc", 0);
        apply_default_key(&mut b, Key::ArrowRight, Modifiers::SHIFT, 10, false);
        apply_default_key(&mut b, Key::ArrowRight, Modifiers::SHIFT, 10, false);
        let sel = b.selection().unwrap();
        assert_eq!((sel.start, sel.end), (0, 2));
    }

    #[test]
    fn tab_has_no_default_edit() {
        let mut b = buffer_at("x", 0);
        assert_eq!(apply_default_key(&mut b, Key::Tab, Modifiers::NONE, 10, false), KeyEffect::None);
        assert_eq!(b.value(), "x");
        assert_eq!(key_code(Key::Tab), KeyCode::Tab);
        assert_eq!(key_code(Key::F1), KeyCode::Other);
    }
}

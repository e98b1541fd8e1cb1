use std::cell::RefCell;
use std::collections::HashMap;

use egui::{Color32, Context, FontId};

/// Width and line metrics of editor text.
pub trait TextMeasurer {
    /// Width of `text` laid out on one line.
    fn measure(&self, text: &str) -> f32;

    fn line_height(&self) -> f32;
}

/// `egui`-backed measurer for the editor's monospace font.
pub struct EguiTextMeasurer {
    ctx: Context,
    font_px: f32,
    line_spacing: f32,
    char_width_cache: RefCell<HashMap<char, f32>>,
}

impl EguiTextMeasurer {
    pub fn new(ctx: &Context, font_px: f32, line_spacing: f32) -> Self {
        Self {
            ctx: ctx.clone(),
            font_px,
            line_spacing,
            char_width_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn font_id(&self) -> FontId {
        FontId::monospace(self.font_px)
    }

    fn layout_width(&self, text: &str) -> f32 {
        self.ctx.fonts(|f| {
            f.layout_no_wrap(text.to_owned(), self.font_id(), Color32::WHITE)
                .rect
                .width()
        })
    }

    /// Width of a single character, cached per character. Whitespace gets
    /// the width of a non-breaking space so trailing blanks still advance.
    fn char_width(&self, ch: char) -> f32 {
        if let Some(w) = self.char_width_cache.borrow().get(&ch).copied() {
            return w;
        }

        let w = match ch {
            ' ' | '\u{00A0}' => self.layout_width("\u{00A0}"),
            '\t' => self.char_width(' ') * 4.0,
            _ => self.layout_width(ch.encode_utf8(&mut [0; 4])),
        };
        // Absolute fallback for glyphs the font cannot size.
        let w = if w.is_finite() && w > 0.0 {
            w
        } else {
            (self.font_px * 0.6).max(1.0)
        };

        self.char_width_cache.borrow_mut().insert(ch, w);
        w
    }
}

impl TextMeasurer for EguiTextMeasurer {
    fn measure(&self, text: &str) -> f32 {
        text.chars().map(|ch| self.char_width(ch)).sum()
    }

    fn line_height(&self) -> f32 {
        self.font_px * self.line_spacing
    }
}

/// Fixed-advance measurer for tests that run without fonts.
#[cfg(test)]
pub(crate) struct FixedMeasurer {
    pub char_width: f32,
    pub line_height: f32,
}

#[cfg(test)]
impl TextMeasurer for FixedMeasurer {
    fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

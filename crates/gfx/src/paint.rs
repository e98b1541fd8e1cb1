use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, StrokeKind, Vec2};
use line_core::LineTable;
use surface::{Rgba, ThemeConfig};

use crate::host::{Focus, PageHost, TEXT_PADDING};
use crate::text_measurer::TextMeasurer;

/// Horizontal padding on each side of the gutter's digits.
pub const GUTTER_PADDING: f32 = 6.0;

pub fn color(c: Rgba) -> Color32 {
    let [r, g, b, a] = c;
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

pub struct PaintCtx<'a> {
    pub painter: &'a Painter,
    pub theme: &'a ThemeConfig,
    pub font_id: FontId,
}

/// Paint gutter, highlight, text and caret of surface `index`, clipped to
/// its container.
pub fn paint_surface<M: TextMeasurer>(ctx: &PaintCtx<'_>, host: &PageHost<M>, index: usize) {
    let Some(s) = host.surface(index) else {
        return;
    };
    let layout = s.layout;
    if !layout.container.is_positive() {
        return;
    }

    let theme = ctx.theme;
    let lh = host.measurer().line_height();
    let painter = ctx.painter.with_clip_rect(layout.container);

    painter.rect_filled(layout.gutter, 0.0, color(theme.gutter_background));
    painter.rect_stroke(
        layout.container,
        0.0,
        Stroke::new(1.0, color(theme.gutter_background)),
        StrokeKind::Inside,
    );

    let editor_painter = painter.with_clip_rect(layout.editor.intersect(layout.container));
    if let Some(r) = s.highlight.as_rectangle() {
        let rect = Rect::from_min_size(
            layout.container.min + Vec2::new(r.x, r.y),
            Vec2::new(r.width, r.height),
        );
        editor_painter.rect_filled(rect, 0.0, color(theme.highlight));
    }

    let value = s.buffer.value();
    let text_left = layout.editor.left() + TEXT_PADDING;
    let text_top = layout.editor.top() + TEXT_PADDING - s.buffer.scroll_y();
    for (i, range) in LineTable::build(value).lines().iter().enumerate() {
        let y = text_top + i as f32 * lh;
        if y + lh < layout.editor.top() || y > layout.editor.bottom() {
            continue;
        }
        let line = &value[range.clone()];
        if line.is_empty() {
            continue;
        }
        let line = if line.contains('\t') {
            line.replace('\t', "    ")
        } else {
            line.to_string()
        };
        editor_painter.text(
            Pos2::new(text_left, y),
            Align2::LEFT_TOP,
            line,
            ctx.font_id.clone(),
            color(theme.text),
        );
    }

    let gutter_painter = painter.with_clip_rect(layout.gutter.intersect(layout.container));
    let gutter_top = layout.gutter.top() + TEXT_PADDING - s.gutter_scroll;
    for (i, label) in s.gutter.labels().iter().enumerate() {
        let y = gutter_top + i as f32 * lh;
        if y + lh < layout.gutter.top() || y > layout.gutter.bottom() {
            continue;
        }
        let c = if label.active {
            theme.gutter_active_text
        } else {
            theme.gutter_text
        };
        gutter_painter.text(
            Pos2::new(layout.gutter.right() - GUTTER_PADDING, y),
            Align2::RIGHT_TOP,
            label.number.to_string(),
            ctx.font_id.clone(),
            color(c),
        );
    }

    if host.focus() == Focus::Editor(index) {
        let caret = host.caret_box(index, s.buffer.caret());
        editor_painter.rect_filled(caret, 0.0, color(theme.text));
    }
}

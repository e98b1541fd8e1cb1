//! `PageHost`: the egui-side implementation of every host capability.
//!
//! Each mounted surface owns an [`EditBuffer`] as its document. Node ids are
//! allocated four per surface, in mount order, so a node maps back to its
//! surface and role without a lookup table.

use core_types::{FieldId, NodeId, Rectangle};
use egui::{Pos2, Rect};
use input_core::{EditBuffer, clamp_to_char_boundary, line_start};
use line_core::{
    BoundaryPoint, EditHost, GeometryHost, GutterModel, HighlightRect, HostRange, MountHost,
    RenderHost, SelectionHost, SurfaceNodes, caret_position_in,
};

use crate::text_measurer::TextMeasurer;

/// Inner padding between the editor's edge and its text.
pub const TEXT_PADDING: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Container,
    Gutter,
    Editor,
    Highlight,
}

/// Where the host selection currently lives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    None,
    /// Caret inside the editor of surface `usize`.
    Editor(usize),
    /// Caret anchored on a gutter label of surface `usize`, outside its editor.
    Gutter(usize),
}

/// Screen rectangles assigned to one surface by the last layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceLayout {
    pub container: Rect,
    pub gutter: Rect,
    pub editor: Rect,
}

impl Default for SurfaceLayout {
    fn default() -> Self {
        Self {
            container: Rect::NOTHING,
            gutter: Rect::NOTHING,
            editor: Rect::NOTHING,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MountedSurface {
    pub field: FieldId,
    pub nodes: SurfaceNodes,
    pub buffer: EditBuffer,
    pub layout: SurfaceLayout,
    pub gutter: GutterModel,
    pub gutter_scroll: f32,
    pub highlight: HighlightRect,
}

impl MountedSurface {
    /// Height of the whole document's text.
    pub fn content_height(&self, line_height: f32) -> f32 {
        let lines = self.buffer.value().matches('\n').count() + 1;
        lines as f32 * line_height + 2.0 * TEXT_PADDING
    }

    pub fn max_scroll(&self, line_height: f32) -> f32 {
        (self.content_height(line_height) - self.layout.editor.height()).max(0.0)
    }
}

pub struct PageHost<M> {
    surfaces: Vec<MountedSurface>,
    focus: Focus,
    measurer: M,
}

impl<M: TextMeasurer> PageHost<M> {
    pub fn new(measurer: M) -> Self {
        Self {
            surfaces: Vec::new(),
            focus: Focus::None,
            measurer,
        }
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn surfaces(&self) -> &[MountedSurface] {
        &self.surfaces
    }

    pub fn surface(&self, index: usize) -> Option<&MountedSurface> {
        self.surfaces.get(index)
    }

    pub fn surface_mut(&mut self, index: usize) -> Option<&mut MountedSurface> {
        self.surfaces.get_mut(index)
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    pub fn set_layout(&mut self, index: usize, layout: SurfaceLayout) {
        if let Some(s) = self.surfaces.get_mut(index) {
            s.layout = layout;
        }
    }

    /// Surface and role of `node`.
    pub fn resolve(&self, node: NodeId) -> Option<(usize, Role)> {
        let raw = node.0.checked_sub(1)?;
        let index = (raw / 4) as usize;
        if index >= self.surfaces.len() {
            return None;
        }
        let role = match raw % 4 {
            0 => Role::Container,
            1 => Role::Gutter,
            2 => Role::Editor,
            _ => Role::Highlight,
        };
        Some((index, role))
    }

    /// Byte offset in surface `index` closest to the screen position `pos`.
    pub fn offset_at(&self, index: usize, pos: Pos2) -> usize {
        let Some(s) = self.surfaces.get(index) else {
            return 0;
        };
        let value = s.buffer.value();
        let lh = self.measurer.line_height();
        let text_top = s.layout.editor.top() + TEXT_PADDING - s.buffer.scroll_y();
        let line = ((pos.y - text_top) / lh).floor().max(0.0) as usize;

        let mut start = 0usize;
        for _ in 0..line {
            match value[start..].find('\n') {
                Some(nl) => start += nl + 1,
                None => break,
            }
        }
        let end = value[start..].find('\n').map_or(value.len(), |nl| start + nl);

        let mut boundaries = Vec::new();
        input_core::rebuild_cursor_boundaries(value, start, end, &mut boundaries);
        let x = pos.x - (s.layout.editor.left() + TEXT_PADDING);
        input_core::caret_from_x_with_boundaries_in_range(value, &boundaries, start, x, |prefix| {
            self.measurer.measure(prefix)
        })
    }

    /// Caret box of byte `offset` in surface `index`, in screen coordinates.
    pub fn caret_box(&self, index: usize, offset: usize) -> Rect {
        let Some(s) = self.surfaces.get(index) else {
            return Rect::NOTHING;
        };
        let value = s.buffer.value();
        let offset = clamp_to_char_boundary(value, offset);
        let line = caret_position_in(&value[..offset]).line;
        let x = self.measurer.measure(&value[line_start(value, offset)..offset]);
        let lh = self.measurer.line_height();
        let min = Pos2::new(
            s.layout.editor.left() + TEXT_PADDING + x,
            s.layout.editor.top() + TEXT_PADDING + line as f32 * lh - s.buffer.scroll_y(),
        );
        Rect::from_min_size(min, egui::vec2(1.0, lh))
    }

    fn surface_of(&self, node: NodeId, role: Role) -> Option<&MountedSurface> {
        match self.resolve(node)? {
            (index, r) if r == role => self.surfaces.get(index),
            _ => None,
        }
    }
}

fn to_rectangle(r: Rect) -> Rectangle {
    if r == Rect::NOTHING {
        return Rectangle::ZERO;
    }
    Rectangle::new(r.left(), r.top(), r.width(), r.height())
}

impl<M: TextMeasurer> SelectionHost for PageHost<M> {
    fn selection(&self) -> Option<HostRange> {
        match self.focus {
            Focus::None => None,
            Focus::Editor(index) => {
                let s = self.surfaces.get(index)?;
                let sel = s.buffer.selection_or_caret();
                Some(HostRange {
                    start: BoundaryPoint::new(s.nodes.editor, sel.start),
                    end: BoundaryPoint::new(s.nodes.editor, sel.end),
                })
            }
            Focus::Gutter(index) => {
                let s = self.surfaces.get(index)?;
                Some(HostRange::collapsed(BoundaryPoint::new(s.nodes.gutter, 0)))
            }
        }
    }

    fn contains(&self, root: NodeId, node: NodeId) -> bool {
        if root == node {
            return true;
        }
        match (self.resolve(root), self.resolve(node)) {
            (Some((a, Role::Container)), Some((b, _))) => a == b,
            _ => false,
        }
    }

    fn text_content(&self, node: NodeId) -> String {
        match self.resolve(node) {
            Some((index, Role::Editor)) => self.surfaces[index].buffer.value().to_string(),
            Some((index, Role::Gutter)) => self.surfaces[index]
                .gutter
                .labels()
                .iter()
                .map(|l| l.number.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            _ => String::new(),
        }
    }

    fn text_before(&self, root: NodeId, point: BoundaryPoint) -> String {
        let text = self.text_content(root);
        if point.node != root {
            return text;
        }
        let end = clamp_to_char_boundary(&text, point.offset);
        text[..end].to_string()
    }
}

impl<M: TextMeasurer> GeometryHost for PageHost<M> {
    fn caret_rect(&self, range: &HostRange) -> Rectangle {
        match self.resolve(range.end.node) {
            Some((index, Role::Editor)) => to_rectangle(self.caret_box(index, range.end.offset)),
            _ => Rectangle::ZERO,
        }
    }

    fn bounding_rect(&self, node: NodeId) -> Rectangle {
        let Some((index, role)) = self.resolve(node) else {
            return Rectangle::ZERO;
        };
        let s = &self.surfaces[index];
        match role {
            Role::Container => to_rectangle(s.layout.container),
            Role::Gutter => to_rectangle(s.layout.gutter),
            Role::Editor => to_rectangle(s.layout.editor),
            Role::Highlight => {
                let origin = to_rectangle(s.layout.container);
                s.highlight
                    .as_rectangle()
                    .map(|r| Rectangle::new(origin.x + r.x, origin.y + r.y, r.width, r.height))
                    .unwrap_or(Rectangle::ZERO)
            }
        }
    }

    fn computed_line_height(&self, node: NodeId) -> Option<f32> {
        self.surface_of(node, Role::Editor)
            .map(|_| self.measurer.line_height())
    }

    fn scroll_top(&self, node: NodeId) -> f32 {
        match self.resolve(node) {
            Some((index, Role::Editor)) => self.surfaces[index].buffer.scroll_y(),
            Some((index, Role::Gutter)) => self.surfaces[index].gutter_scroll,
            _ => 0.0,
        }
    }
}

impl<M: TextMeasurer> RenderHost for PageHost<M> {
    fn rebuild_gutter(&mut self, gutter: NodeId, line_count: usize) {
        if let Some((index, Role::Gutter)) = self.resolve(gutter) {
            self.surfaces[index].gutter = GutterModel::rebuild(line_count);
        }
    }

    fn mark_gutter_active(&mut self, gutter: NodeId, line: Option<usize>) {
        if let Some((index, Role::Gutter)) = self.resolve(gutter) {
            self.surfaces[index].gutter.mark_active(line);
        }
    }

    fn place_highlight(&mut self, highlight: NodeId, rect: &HighlightRect) {
        if let Some((index, Role::Highlight)) = self.resolve(highlight) {
            self.surfaces[index].highlight = *rect;
        }
    }

    fn set_scroll_top(&mut self, node: NodeId, scroll_top: f32) {
        let lh = self.measurer.line_height();
        match self.resolve(node) {
            Some((index, Role::Gutter)) => {
                self.surfaces[index].gutter_scroll = scroll_top;
            }
            Some((index, Role::Editor)) => {
                let s = &mut self.surfaces[index];
                let max = s.max_scroll(lh);
                s.buffer.set_scroll_y(scroll_top, max);
            }
            _ => {}
        }
    }
}

impl<M: TextMeasurer> EditHost for PageHost<M> {
    fn insert_at_caret(&mut self, editor: NodeId, text: &str) -> bool {
        let Some((index, Role::Editor)) = self.resolve(editor) else {
            return false;
        };
        if self.focus != Focus::Editor(index) {
            return false;
        }
        self.surfaces[index].buffer.insert_text(text);
        true
    }
}

impl<M: TextMeasurer> MountHost for PageHost<M> {
    fn mount_surface(&mut self, field: FieldId, initial: &str) -> SurfaceNodes {
        let base = self.surfaces.len() as u32 * 4;
        let nodes = SurfaceNodes {
            container: NodeId(base + 1),
            gutter: NodeId(base + 2),
            editor: NodeId(base + 3),
            highlight: NodeId(base + 4),
        };
        self.surfaces.push(MountedSurface {
            field,
            nodes,
            buffer: EditBuffer::new(initial),
            layout: SurfaceLayout::default(),
            gutter: GutterModel::default(),
            gutter_scroll: 0.0,
            highlight: HighlightRect::Hidden,
        });
        log::debug!(target: "gfx.host", "mounted {field} as {:?}", nodes.container);
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_measurer::FixedMeasurer;
    use line_core::{compute_caret_line, recompute};

    const CW: f32 = 10.0;
    const LH: f32 = 20.0;

    fn host_with(text: &str) -> (PageHost<FixedMeasurer>, SurfaceNodes) {
        let mut host = PageHost::new(FixedMeasurer {
            char_width: CW,
            line_height: LH,
        });
        let nodes = host.mount_surface(FieldId(1), text);
        let container = Rect::from_min_size(Pos2::new(100.0, 50.0), egui::vec2(400.0, 200.0));
        host.set_layout(
            0,
            SurfaceLayout {
                container,
                gutter: Rect::from_min_size(container.min, egui::vec2(30.0, 200.0)),
                editor: Rect::from_min_max(Pos2::new(130.0, 50.0), container.max),
            },
        );
        (host, nodes)
    }

    #[test]
    fn node_ids_resolve_to_surface_and_role() {
        let (mut host, first) = host_with("");
        let second = host.mount_surface(FieldId(2), "");
        assert_eq!(host.resolve(first.gutter), Some((0, Role::Gutter)));
        assert_eq!(host.resolve(second.container), Some((1, Role::Container)));
        assert_eq!(host.resolve(second.highlight), Some((1, Role::Highlight)));
        assert_eq!(host.resolve(NodeId(0)), None);
        assert_eq!(host.resolve(NodeId(9)), None);
    }

    #[test]
    fn selection_follows_focus() {
        let (mut host, nodes) = host_with("a\nbb");
        assert_eq!(host.selection(), None);

        host.set_focus(Focus::Editor(0));
        host.surface_mut(0).unwrap().buffer.set_caret(4, false);
        assert_eq!(compute_caret_line(&host, nodes.editor), Some(1));

        host.set_focus(Focus::Gutter(0));
        assert_eq!(compute_caret_line(&host, nodes.editor), None);
    }

    #[test]
    fn caret_box_tracks_line_column_and_scroll() {
        let (mut host, _) = host_with("a\nbb\nccc");
        let r = host.caret_box(0, 4);
        assert_eq!(r.left(), 130.0 + TEXT_PADDING + 2.0 * CW);
        assert_eq!(r.top(), 50.0 + TEXT_PADDING + LH);
        assert_eq!(r.height(), LH);

        // Content is 3 lines; shrink the editor so it can scroll.
        let s = host.surface_mut(0).unwrap();
        s.layout.editor = Rect::from_min_size(Pos2::new(130.0, 50.0), egui::vec2(370.0, 30.0));
        let max = s.max_scroll(LH);
        s.buffer.set_scroll_y(10.0, max);
        assert_eq!(host.caret_box(0, 4).top(), 50.0 + TEXT_PADDING + LH - 10.0);
    }

    #[test]
    fn offset_at_maps_points_back_to_text() {
        let (host, _) = host_with("a\nbb\nccc");
        let text_left = 130.0 + TEXT_PADDING;
        let text_top = 50.0 + TEXT_PADDING;
        // Middle of line 2, just right of the second character.
        let p = Pos2::new(text_left + 2.2 * CW, text_top + 2.5 * LH);
        assert_eq!(host.offset_at(0, p), 7);
        // Past the end of a short line snaps to its end.
        let p = Pos2::new(text_left + 50.0 * CW, text_top + 0.5 * LH);
        assert_eq!(host.offset_at(0, p), 1);
        // Below the last line lands on the last line.
        let p = Pos2::new(text_left, text_top + 40.0 * LH);
        assert_eq!(host.offset_at(0, p), 5);
    }

    #[test]
    fn highlight_spans_editor_relative_to_container() {
        let (mut host, nodes) = host_with("x\ny");
        host.set_focus(Focus::Editor(0));
        host.surface_mut(0).unwrap().buffer.set_caret(3, false);

        let frame = recompute(&host, &nodes, "x\ny");
        assert_eq!(
            frame.highlight,
            HighlightRect::Visible {
                top: TEXT_PADDING + LH,
                left: 30.0,
                width: 370.0,
                height: LH,
            }
        );
    }

    #[test]
    fn insert_requires_editor_focus() {
        let (mut host, nodes) = host_with("y");
        assert!(!host.insert_at_caret(nodes.editor, "    "));

        host.set_focus(Focus::Editor(0));
        assert!(host.insert_at_caret(nodes.editor, "    "));
        assert_eq!(host.surface(0).unwrap().buffer.value(), "    y");
        assert!(!host.insert_at_caret(nodes.gutter, "x"));
    }

    #[test]
    fn gutter_scroll_is_independent_of_editor_clamp() {
        let (mut host, nodes) = host_with("1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n11\n12");
        host.set_scroll_top(nodes.editor, 1_000.0);
        let max = host.surface(0).unwrap().max_scroll(LH);
        assert_eq!(host.scroll_top(nodes.editor), max);

        host.set_scroll_top(nodes.gutter, max);
        assert_eq!(host.scroll_top(nodes.gutter), max);
    }

    #[test]
    fn stored_crlf_value_is_mirrored_as_shown() {
        use surface::{BackingStore, FieldStore, PageNode, SurfaceController};

        let mut host = PageHost::new(FixedMeasurer {
            char_width: CW,
            line_height: LH,
        });
        let mut store = FieldStore::new();
        store.write(FieldId(1), "a\r\nb");
        let page = PageNode::document(vec![PageNode::textarea(1, "gutterline", "ignored")]);

        let mut controller = SurfaceController::default();
        controller.attach_page(&mut host, &mut store, &page, "gutterline");

        let shown = host.surface(0).unwrap().buffer.value().to_string();
        assert_eq!(shown, "a\nb");
        assert_eq!(store.value(FieldId(1)), Some(shown.as_str()));
        assert_eq!(controller.widget(FieldId(1)).unwrap().line_count(), 2);
    }
}

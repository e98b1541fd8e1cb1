//! In-memory host for tests.
//!
//! Every surface is laid out in a fixed grid: a container of
//! [`FakeHost::CONTAINER_WIDTH`] x [`FakeHost::CONTAINER_HEIGHT`], stacked
//! vertically; a gutter column of [`FakeHost::GUTTER_WIDTH`]; the editor
//! filling the rest. Text is monospaced and never wraps.

use core_types::{FieldId, NodeId, Rectangle};

use crate::gutter::{GutterLabel, GutterModel};
use crate::highlight::HighlightRect;
use crate::host::{
    BoundaryPoint, EditHost, GeometryHost, HostRange, MountHost, RenderHost, SelectionHost,
    SurfaceNodes,
};

#[derive(Clone, Debug, PartialEq)]
pub enum RenderCall {
    RebuildGutter(NodeId, usize),
    MarkActive(NodeId, Option<usize>),
    PlaceHighlight(NodeId, HighlightRect),
    SetScrollTop(NodeId, f32),
}

#[derive(Clone, Debug)]
pub struct FakeSurface {
    pub field: Option<FieldId>,
    pub nodes: SurfaceNodes,
    pub text: String,
    pub line_height: Option<f32>,
    pub editor_scroll: f32,
    pub gutter_scroll: f32,
    pub gutter_labels: Vec<GutterLabel>,
    pub gutter_active: Option<usize>,
    pub highlight: HighlightRect,
}

#[derive(Clone, Debug, Default)]
pub struct FakeHost {
    surfaces: Vec<FakeSurface>,
    selection: Option<HostRange>,
    render_log: Vec<RenderCall>,
}

impl FakeHost {
    pub const OUTSIDE: NodeId = NodeId(9_999);
    pub const CONTAINER_WIDTH: f32 = 400.0;
    pub const CONTAINER_HEIGHT: f32 = 300.0;
    pub const GUTTER_WIDTH: f32 = 40.0;
    pub const EDITOR_TOP_PAD: f32 = 4.0;
    pub const LINE_HEIGHT: f32 = 18.0;
    pub const CHAR_WIDTH: f32 = 8.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// A host with one unbound surface holding `text`.
    pub fn with_text(text: &str) -> Self {
        let mut host = Self::new();
        host.add_surface(None, text);
        host
    }

    pub fn add_surface(&mut self, field: Option<FieldId>, text: &str) -> SurfaceNodes {
        let base = self.surfaces.len() as u32 * 10;
        let nodes = SurfaceNodes {
            container: NodeId(base + 1),
            gutter: NodeId(base + 2),
            editor: NodeId(base + 3),
            highlight: NodeId(base + 4),
        };
        self.surfaces.push(FakeSurface {
            field,
            nodes,
            text: text.to_string(),
            line_height: Some(Self::LINE_HEIGHT),
            editor_scroll: 0.0,
            gutter_scroll: 0.0,
            gutter_labels: Vec::new(),
            gutter_active: None,
            highlight: HighlightRect::Hidden,
        });
        nodes
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn nodes(&self, surface: usize) -> SurfaceNodes {
        self.surfaces[surface].nodes
    }

    pub fn surface(&self, surface: usize) -> &FakeSurface {
        &self.surfaces[surface]
    }

    pub fn surface_mut(&mut self, surface: usize) -> &mut FakeSurface {
        &mut self.surfaces[surface]
    }

    pub fn surface_for_field(&self, field: FieldId) -> Option<usize> {
        self.surfaces.iter().position(|s| s.field == Some(field))
    }

    /// Collapsed caret at byte `offset` of surface `surface`'s editor.
    pub fn place_caret(&mut self, surface: usize, offset: usize) {
        let editor = self.surfaces[surface].nodes.editor;
        self.place_caret_in(editor, offset);
    }

    /// Collapsed caret at an arbitrary node, e.g. a gutter or [`Self::OUTSIDE`].
    pub fn place_caret_in(&mut self, node: NodeId, offset: usize) {
        self.selection = Some(HostRange::collapsed(BoundaryPoint::new(node, offset)));
    }

    /// Selection between two editor offsets, in either direction.
    pub fn select(&mut self, surface: usize, anchor: usize, focus: usize) {
        let editor = self.surfaces[surface].nodes.editor;
        self.selection = Some(HostRange {
            start: BoundaryPoint::new(editor, anchor.min(focus)),
            end: BoundaryPoint::new(editor, anchor.max(focus)),
        });
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Simulate the user typing `s` at the caret of `surface`.
    pub fn type_text(&mut self, surface: usize, s: &str) -> bool {
        let editor = self.surfaces[surface].nodes.editor;
        self.insert_at_caret(editor, s)
    }

    /// Replace the editor's text wholesale (e.g. a paste over everything).
    pub fn set_text(&mut self, surface: usize, text: &str) {
        self.surfaces[surface].text = text.to_string();
        let editor = self.surfaces[surface].nodes.editor;
        if let Some(sel) = self.selection.as_mut()
            && sel.end.node == editor
        {
            sel.start.offset = sel.start.offset.min(text.len());
            sel.end.offset = sel.end.offset.min(text.len());
        }
    }

    pub fn scroll_editor(&mut self, surface: usize, scroll_top: f32) {
        self.surfaces[surface].editor_scroll = scroll_top;
    }

    pub fn take_render_log(&mut self) -> Vec<RenderCall> {
        std::mem::take(&mut self.render_log)
    }

    fn index_of(&self, node: NodeId) -> Option<usize> {
        self.surfaces.iter().position(|s| s.nodes.contains(node))
    }

    fn container_rect(index: usize) -> Rectangle {
        Rectangle::new(
            0.0,
            index as f32 * (Self::CONTAINER_HEIGHT + 100.0),
            Self::CONTAINER_WIDTH,
            Self::CONTAINER_HEIGHT,
        )
    }
}

fn floor_char_boundary(s: &str, i: usize) -> usize {
    let mut i = i.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

impl SelectionHost for FakeHost {
    fn selection(&self) -> Option<HostRange> {
        self.selection
    }

    fn contains(&self, root: NodeId, node: NodeId) -> bool {
        if root == node {
            return true;
        }
        self.surfaces
            .iter()
            .any(|s| s.nodes.container == root && s.nodes.contains(node))
    }

    fn text_content(&self, node: NodeId) -> String {
        let Some(s) = self.index_of(node).map(|i| &self.surfaces[i]) else {
            return String::new();
        };
        if node == s.nodes.editor {
            s.text.clone()
        } else if node == s.nodes.gutter {
            s.gutter_labels
                .iter()
                .map(|l| l.number.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            String::new()
        }
    }

    fn text_before(&self, root: NodeId, point: BoundaryPoint) -> String {
        let text = self.text_content(root);
        if point.node != root {
            return text;
        }
        let end = floor_char_boundary(&text, point.offset);
        text[..end].to_string()
    }
}

impl GeometryHost for FakeHost {
    fn caret_rect(&self, range: &HostRange) -> Rectangle {
        let Some(index) = self.index_of(range.end.node) else {
            return Rectangle::ZERO;
        };
        let s = &self.surfaces[index];
        if range.end.node != s.nodes.editor {
            return Rectangle::ZERO;
        }

        let before = self.text_before(s.nodes.editor, range.end);
        let line = before.matches('\n').count();
        let column = before.rsplit('\n').next().unwrap_or("").chars().count();
        let editor = self.bounding_rect(s.nodes.editor);
        Rectangle::new(
            editor.x + column as f32 * Self::CHAR_WIDTH,
            editor.y + Self::EDITOR_TOP_PAD + line as f32 * Self::LINE_HEIGHT - s.editor_scroll,
            1.0,
            Self::LINE_HEIGHT,
        )
    }

    fn bounding_rect(&self, node: NodeId) -> Rectangle {
        let Some(index) = self.index_of(node) else {
            return Rectangle::ZERO;
        };
        let s = &self.surfaces[index];
        let container = Self::container_rect(index);
        if node == s.nodes.container {
            container
        } else if node == s.nodes.gutter {
            Rectangle::new(container.x, container.y, Self::GUTTER_WIDTH, container.height)
        } else if node == s.nodes.editor {
            Rectangle::new(
                container.x + Self::GUTTER_WIDTH,
                container.y,
                container.width - Self::GUTTER_WIDTH,
                container.height,
            )
        } else {
            s.highlight
                .as_rectangle()
                .map(|r| Rectangle::new(container.x + r.x, container.y + r.y, r.width, r.height))
                .unwrap_or(Rectangle::ZERO)
        }
    }

    fn computed_line_height(&self, node: NodeId) -> Option<f32> {
        let s = &self.surfaces[self.index_of(node)?];
        if node == s.nodes.editor {
            s.line_height
        } else {
            None
        }
    }

    fn scroll_top(&self, node: NodeId) -> f32 {
        let Some(s) = self.index_of(node).map(|i| &self.surfaces[i]) else {
            return 0.0;
        };
        if node == s.nodes.editor {
            s.editor_scroll
        } else if node == s.nodes.gutter {
            s.gutter_scroll
        } else {
            0.0
        }
    }
}

impl RenderHost for FakeHost {
    fn rebuild_gutter(&mut self, gutter: NodeId, line_count: usize) {
        self.render_log.push(RenderCall::RebuildGutter(gutter, line_count));
        if let Some(i) = self.index_of(gutter) {
            let s = &mut self.surfaces[i];
            s.gutter_labels = GutterModel::rebuild(line_count).labels().to_vec();
            s.gutter_active = None;
        }
    }

    fn mark_gutter_active(&mut self, gutter: NodeId, line: Option<usize>) {
        self.render_log.push(RenderCall::MarkActive(gutter, line));
        if let Some(i) = self.index_of(gutter) {
            let s = &mut self.surfaces[i];
            for label in &mut s.gutter_labels {
                label.active = false;
            }
            s.gutter_active = None;
            if let Some(line) = line
                && let Some(label) = s.gutter_labels.get_mut(line)
            {
                label.active = true;
                s.gutter_active = Some(line);
            }
        }
    }

    fn place_highlight(&mut self, highlight: NodeId, rect: &HighlightRect) {
        self.render_log.push(RenderCall::PlaceHighlight(highlight, *rect));
        if let Some(i) = self.index_of(highlight) {
            self.surfaces[i].highlight = *rect;
        }
    }

    fn set_scroll_top(&mut self, node: NodeId, scroll_top: f32) {
        self.render_log.push(RenderCall::SetScrollTop(node, scroll_top));
        if let Some(i) = self.index_of(node) {
            let s = &mut self.surfaces[i];
            if node == s.nodes.gutter {
                s.gutter_scroll = scroll_top;
            } else if node == s.nodes.editor {
                s.editor_scroll = scroll_top;
            }
        }
    }
}

impl EditHost for FakeHost {
    fn insert_at_caret(&mut self, editor: NodeId, text: &str) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        if sel.start.node != editor || sel.end.node != editor {
            return false;
        }
        let Some(i) = self.index_of(editor) else {
            return false;
        };

        let doc = &mut self.surfaces[i].text;
        let start = floor_char_boundary(doc, sel.start.offset);
        let end = floor_char_boundary(doc, sel.end.offset).max(start);
        doc.replace_range(start..end, text);

        let caret = BoundaryPoint::new(editor, start + text.len());
        self.selection = Some(HostRange::collapsed(caret));
        true
    }
}

impl MountHost for FakeHost {
    fn mount_surface(&mut self, field: FieldId, initial: &str) -> SurfaceNodes {
        self.add_surface(Some(field), initial)
    }
}

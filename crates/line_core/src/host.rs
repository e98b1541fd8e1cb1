//! Capabilities the engine needs from a rendering host.
//!
//! The engine never owns text layout or a selection model. Everything it
//! knows about the caret and about geometry comes through these traits, so a
//! browser-like host, the egui host in `gfx`, and the in-memory `FakeHost`
//! are interchangeable.

use core_types::{FieldId, NodeId, Rectangle};

use crate::highlight::HighlightRect;

/// A position inside the host's node tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundaryPoint {
    pub node: NodeId,
    /// Byte offset inside `node`'s text.
    pub offset: usize,
}

impl BoundaryPoint {
    pub const fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// The host's current selection, boundaries in document order.
///
/// `start` is the anchoring boundary checked for containment; `end` is the
/// trailing edge the caret line is derived from. A collapsed caret has
/// `start == end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostRange {
    pub start: BoundaryPoint,
    pub end: BoundaryPoint,
}

impl HostRange {
    pub const fn collapsed(at: BoundaryPoint) -> Self {
        Self { start: at, end: at }
    }
}

/// The four host nodes one widget is composed of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceNodes {
    /// Positioning context of the gutter, editor and highlight.
    pub container: NodeId,
    /// Column of line-number labels.
    pub gutter: NodeId,
    /// The editable surface. Its text content is the document.
    pub editor: NodeId,
    /// Overlay tracking the caret line.
    pub highlight: NodeId,
}

impl SurfaceNodes {
    pub fn contains(&self, node: NodeId) -> bool {
        node == self.container || node == self.gutter || node == self.editor || node == self.highlight
    }
}

/// Read access to the host's selection and text.
pub trait SelectionHost {
    /// The current selection, or `None` when nothing is selected anywhere.
    fn selection(&self) -> Option<HostRange>;

    /// Whether `node` is `root` or one of its descendants.
    fn contains(&self, root: NodeId, node: NodeId) -> bool;

    /// Full text content of `node`.
    fn text_content(&self, node: NodeId) -> String;

    /// Text of `root` from its start up to `point`. Points outside `root`
    /// resolve to the end of `root`.
    fn text_before(&self, root: NodeId, point: BoundaryPoint) -> String;
}

/// Read access to live layout.
pub trait GeometryHost {
    /// Bounding box of the given selection's caret in host coordinates.
    fn caret_rect(&self, range: &HostRange) -> Rectangle;

    /// Bounding box of `node` in host coordinates.
    fn bounding_rect(&self, node: NodeId) -> Rectangle;

    /// Computed line height of `node`. `None` or NaN when the host cannot
    /// express it as a number.
    fn computed_line_height(&self, node: NodeId) -> Option<f32>;

    /// Vertical scroll offset of `node`.
    fn scroll_top(&self, node: NodeId) -> f32;
}

/// Write access to the rendered surfaces of a widget.
pub trait RenderHost {
    /// Replace every label of `gutter` with labels `1..=line_count`, none active.
    fn rebuild_gutter(&mut self, gutter: NodeId, line_count: usize);

    /// Clear every active marker of `gutter`, then mark the label at `line`.
    fn mark_gutter_active(&mut self, gutter: NodeId, line: Option<usize>);

    /// Position or hide the highlight overlay.
    fn place_highlight(&mut self, highlight: NodeId, rect: &HighlightRect);

    fn set_scroll_top(&mut self, node: NodeId, scroll_top: f32);
}

/// Text insertion into an editable surface.
pub trait EditHost {
    /// Insert `text` at the caret inside `editor`, replacing any selection,
    /// and leave the caret collapsed after it.
    ///
    /// Returns `false` without changing anything when there is no caret
    /// inside `editor`.
    fn insert_at_caret(&mut self, editor: NodeId, text: &str) -> bool;
}

/// Creation of the composed widget next to a backing field.
pub trait MountHost {
    /// Create container, gutter, editor and highlight nodes for `field`, with
    /// the editor's text content seeded from `initial`.
    fn mount_surface(&mut self, field: FieldId, initial: &str) -> SurfaceNodes;
}

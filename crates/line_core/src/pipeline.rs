//! One recompute cycle: line index, gutter, caret, highlight.
//!
//! A [`Frame`] is a pure function of the host's current text, selection and
//! layout. Widgets may keep the last one around to skip redundant host
//! calls, but recomputing always gives the authoritative answer.

use crate::caret::{CaretPosition, caret_position_for_range};
use crate::gutter::{GutterModel, apply_gutter};
use crate::highlight::{HighlightGeometry, HighlightRect, apply_highlight, compute_rect};
use crate::host::{GeometryHost, RenderHost, SelectionHost, SurfaceNodes};
use crate::line_index::compute_line_count;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub line_count: usize,
    pub caret: Option<CaretPosition>,
    pub gutter: GutterModel,
    pub highlight: HighlightRect,
}

/// Full recompute after the document changed.
///
/// Rebuilds the gutter for `text` before marking the caret line on it.
pub fn recompute<H>(host: &H, nodes: &SurfaceNodes, text: &str) -> Frame
where
    H: SelectionHost + GeometryHost + ?Sized,
{
    let line_count = compute_line_count(text);
    let gutter = GutterModel::rebuild(line_count);
    let frame = locate_caret(host, nodes, line_count, gutter);
    log::trace!(
        target: "line_core.pipeline",
        "recompute {:?}: {} lines, caret {:?}",
        nodes.editor,
        frame.line_count,
        frame.caret
    );
    frame
}

/// Caret-only recompute: the document is unchanged since `previous`, so the
/// gutter keeps its labels and only the active marker moves.
pub fn refresh_caret<H>(host: &H, nodes: &SurfaceNodes, previous: &Frame) -> Frame
where
    H: SelectionHost + GeometryHost + ?Sized,
{
    let line_count = previous.line_count.max(1);
    let gutter = if previous.gutter.len() == line_count {
        previous.gutter.clone()
    } else {
        GutterModel::rebuild(line_count)
    };
    locate_caret(host, nodes, line_count, gutter)
}

fn locate_caret<H>(host: &H, nodes: &SurfaceNodes, line_count: usize, mut gutter: GutterModel) -> Frame
where
    H: SelectionHost + GeometryHost + ?Sized,
{
    let selection = host.selection();
    let caret = selection
        .as_ref()
        .and_then(|range| caret_position_for_range(host, nodes.editor, range));

    gutter.mark_active(caret.map(|c| c.line));

    let highlight = match (caret, selection) {
        (Some(caret), Some(range)) => {
            let geometry = HighlightGeometry::measure(host, nodes, &range);
            compute_rect(Some(caret.line), &geometry)
        }
        _ => HighlightRect::Hidden,
    };

    Frame {
        line_count,
        caret,
        gutter,
        highlight,
    }
}

/// Push a frame to the host's surfaces.
///
/// With `rebuild_gutter` the gutter labels are replaced first; otherwise only
/// the active marker is moved.
pub fn render_frame<H: RenderHost + ?Sized>(
    host: &mut H,
    nodes: &SurfaceNodes,
    frame: &Frame,
    rebuild_gutter: bool,
) {
    if rebuild_gutter {
        apply_gutter(host, nodes.gutter, &frame.gutter);
    } else {
        host.mark_gutter_active(nodes.gutter, frame.gutter.active());
    }
    apply_highlight(host, nodes.highlight, &frame.highlight);
}

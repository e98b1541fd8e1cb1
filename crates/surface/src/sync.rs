//! Sync bridge: keeps the backing field, gutter and highlight in step with
//! the editor.

use line_core::{
    GeometryHost, RenderHost, SelectionHost, recompute, refresh_caret, render_frame,
};

use crate::field::BackingStore;
use crate::widget::Widget;

/// Content changed: mirror the editor text into the backing field, then run
/// the full pipeline.
///
/// The gutter is rebuilt before the caret line is marked on it, since a
/// rebuild wipes any marker already applied.
pub fn sync_content<H, S>(host: &mut H, store: &mut S, widget: &mut Widget)
where
    H: SelectionHost + GeometryHost + RenderHost + ?Sized,
    S: BackingStore + ?Sized,
{
    let text = host.text_content(widget.nodes.editor);
    store.write(widget.field, &text);
    log::trace!(target: "surface.sync", "{} <- {} bytes", widget.field, text.len());
    render_document(host, widget, &text);
}

/// Rebuild gutter and highlight from `text` without touching the backing
/// field.
pub fn render_document<H>(host: &mut H, widget: &mut Widget, text: &str)
where
    H: SelectionHost + GeometryHost + RenderHost + ?Sized,
{
    let frame = recompute(host, &widget.nodes, text);
    render_frame(host, &widget.nodes, &frame, true);
    widget.frame = frame;
}

/// Caret moved: move the active gutter marker and the highlight only.
pub fn sync_caret<H>(host: &mut H, widget: &mut Widget)
where
    H: SelectionHost + GeometryHost + RenderHost + ?Sized,
{
    let frame = refresh_caret(host, &widget.nodes, &widget.frame);
    let rebuild = frame.gutter.len() != widget.frame.gutter.len();
    render_frame(host, &widget.nodes, &frame, rebuild);
    widget.frame = frame;
}

/// Editor scrolled: the gutter follows, then the highlight is re-placed.
pub fn sync_scroll<H>(host: &mut H, widget: &mut Widget)
where
    H: SelectionHost + GeometryHost + RenderHost + ?Sized,
{
    let scroll_top = host.scroll_top(widget.nodes.editor);
    host.set_scroll_top(widget.nodes.gutter, scroll_top);
    sync_caret(host, widget);
}

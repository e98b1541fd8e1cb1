//! Current-line highlight overlay.
//!
//! The overlay's vertical position always comes from the live caret box,
//! never from `line * line_height`, so it stays right when lines wrap.

use core_types::{NodeId, Rectangle};

use crate::host::{GeometryHost, HostRange, RenderHost, SurfaceNodes};

/// Line height used when the host cannot report a usable one.
pub const DEFAULT_LINE_HEIGHT: f32 = 20.0;

/// Placement of the overlay in the container's local coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum HighlightRect {
    #[default]
    Hidden,
    Visible {
        top: f32,
        left: f32,
        width: f32,
        height: f32,
    },
}

impl HighlightRect {
    pub fn is_visible(&self) -> bool {
        matches!(self, HighlightRect::Visible { .. })
    }

    /// The placement as a rectangle, `None` when hidden.
    pub fn as_rectangle(&self) -> Option<Rectangle> {
        match *self {
            HighlightRect::Hidden => None,
            HighlightRect::Visible {
                top,
                left,
                width,
                height,
            } => Some(Rectangle::new(left, top, width, height)),
        }
    }
}

/// Live geometry the overlay is derived from, all in host coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HighlightGeometry {
    pub caret: Rectangle,
    pub container: Rectangle,
    pub editor: Rectangle,
    pub line_height: Option<f32>,
}

impl HighlightGeometry {
    pub fn measure<H: GeometryHost + ?Sized>(
        host: &H,
        nodes: &SurfaceNodes,
        range: &HostRange,
    ) -> Self {
        Self {
            caret: host.caret_rect(range),
            container: host.bounding_rect(nodes.container),
            editor: host.bounding_rect(nodes.editor),
            line_height: host.computed_line_height(nodes.editor),
        }
    }
}

/// The computed line height, or [`DEFAULT_LINE_HEIGHT`] when it is missing,
/// not a number, or not positive.
pub fn resolve_line_height(computed: Option<f32>) -> f32 {
    computed
        .filter(|h| h.is_finite() && *h > 0.0)
        .unwrap_or(DEFAULT_LINE_HEIGHT)
}

/// Overlay placement for a caret on `caret_line`.
///
/// The overlay spans the editor's full width, starting at the editor's left
/// edge, one line tall, at the caret's top edge.
pub fn compute_rect(caret_line: Option<usize>, geometry: &HighlightGeometry) -> HighlightRect {
    if caret_line.is_none() {
        return HighlightRect::Hidden;
    }

    let HighlightGeometry {
        caret,
        container,
        editor,
        line_height,
    } = *geometry;

    HighlightRect::Visible {
        top: finite_or_zero(caret.top() - container.top()),
        left: finite_or_zero(editor.left() - container.left()),
        width: finite_or_zero(editor.width).max(0.0),
        height: resolve_line_height(line_height),
    }
}

/// Position the overlay, or hide it so no stale highlight stays visible.
pub fn apply_highlight<H: RenderHost + ?Sized>(host: &mut H, highlight: NodeId, rect: &HighlightRect) {
    host.place_highlight(highlight, rect);
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(line_height: Option<f32>) -> HighlightGeometry {
        HighlightGeometry {
            caret: Rectangle::new(70.0, 145.0, 1.0, 18.0),
            container: Rectangle::new(10.0, 100.0, 400.0, 300.0),
            editor: Rectangle::new(50.0, 100.0, 360.0, 300.0),
            line_height,
        }
    }

    #[test]
    fn no_caret_hides_the_overlay() {
        assert_eq!(compute_rect(None, &geometry(Some(18.0))), HighlightRect::Hidden);
    }

    #[test]
    fn overlay_is_relative_to_the_container_and_spans_the_editor() {
        assert_eq!(
            compute_rect(Some(2), &geometry(Some(18.0))),
            HighlightRect::Visible {
                top: 45.0,
                left: 40.0,
                width: 360.0,
                height: 18.0,
            }
        );
    }

    #[test]
    fn top_ignores_the_line_index() {
        let g = geometry(Some(18.0));
        assert_eq!(compute_rect(Some(0), &g), compute_rect(Some(40), &g));
    }

    #[test]
    fn unusable_line_height_falls_back_to_default() {
        for lh in [None, Some(f32::NAN), Some(f32::INFINITY), Some(0.0), Some(-3.0)] {
            let rect = compute_rect(Some(0), &geometry(lh));
            let Some(r) = rect.as_rectangle() else {
                panic!("overlay hidden for {lh:?}");
            };
            assert_eq!(r.height, DEFAULT_LINE_HEIGHT);
        }
    }

    #[test]
    fn non_finite_geometry_still_yields_finite_fields() {
        let mut g = geometry(Some(18.0));
        g.caret.y = f32::NAN;
        g.editor.width = f32::NEG_INFINITY;
        let r = compute_rect(Some(0), &g).as_rectangle().unwrap();
        assert!(r.is_finite());
        assert_eq!(r.y, 0.0);
        assert_eq!(r.width, 0.0);
    }
}

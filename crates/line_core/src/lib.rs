//! # line_core
//!
//! Host-independent engine behind the line-number gutter and the
//! current-line highlight of an editable surface.
//!
//! Everything here works against the capability traits in [`host`]:
//! - [`SelectionHost`] answers where the caret is and what text precedes it
//! - [`GeometryHost`] reports boxes, line heights and scroll offsets
//! - [`RenderHost`] applies gutter and overlay changes
//!
//! The engine never reads layout it did not ask the host for, and it never
//! panics on odd host answers: no selection, a caret outside the editor, or
//! non-finite geometry all degrade to "nothing highlighted".
//!
//! A full update is [`recompute`] followed by [`render_frame`]; caret-only
//! movement can use [`refresh_caret`] instead.

mod caret;
mod gutter;
mod highlight;
pub mod host;
mod line_index;
mod pipeline;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use caret::{
    CaretPosition, caret_position_for_range, caret_position_in, compute_caret_line,
    compute_caret_position,
};
pub use gutter::{GutterLabel, GutterModel, apply_gutter, gutter_digits, render_gutter};
pub use highlight::{
    DEFAULT_LINE_HEIGHT, HighlightGeometry, HighlightRect, apply_highlight, compute_rect,
    resolve_line_height,
};
pub use host::{
    BoundaryPoint, EditHost, GeometryHost, HostRange, MountHost, RenderHost, SelectionHost,
    SurfaceNodes,
};
pub use line_index::{LINE_BREAK, LineTable, compute_line_count};
pub use pipeline::{Frame, recompute, refresh_caret, render_frame};

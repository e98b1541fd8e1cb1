//! # input_core
//!
//! UI-agnostic model of an editable text surface.
//!
//! - [`EditBuffer`]: document text, caret, selection, and vertical scroll of one surface
//! - [`SelectionRange`]: a normalized byte range whose `end` is the trailing edge
//!
//! This crate does not depend on any graphics framework, layout, or host
//! selection API. Hosts that have no native editable surface (the egui host in
//! `gfx`) keep one [`EditBuffer`] per widget and answer caret queries from it.

mod buffer;
mod selection;
mod text;

pub use buffer::EditBuffer;
pub use selection::SelectionRange;

// Re-export text utilities for hosts that map pointer positions to carets
// with their own measurement functions.
pub use text::{
    caret_from_x_with_boundaries_in_range, clamp_to_char_boundary, line_end, line_start,
    next_cursor_boundary, normalize_newlines, offset_for_column, prev_cursor_boundary,
    rebuild_cursor_boundaries,
};

//! Line-number gutter model.
//!
//! The gutter is rebuilt from scratch on every content change, which keeps
//! it O(line count) per keystroke. That is fine for the small documents this
//! editor targets; very large documents would want incremental diffing.

use core_types::NodeId;

use crate::host::RenderHost;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GutterLabel {
    /// 1-based number shown to the user.
    pub number: usize,
    pub active: bool,
}

/// Ordered line-number labels, at most one of them active.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GutterModel {
    labels: Vec<GutterLabel>,
    active: Option<usize>,
}

impl GutterModel {
    /// Fresh labels `1..=line_count`, none active.
    pub fn rebuild(line_count: usize) -> Self {
        let labels = (1..=line_count)
            .map(|number| GutterLabel {
                number,
                active: false,
            })
            .collect();
        Self {
            labels,
            active: None,
        }
    }

    /// Clear the previous marker, then mark `line` if it is in range.
    pub fn mark_active(&mut self, line: Option<usize>) {
        if let Some(prev) = self.active.take()
            && let Some(label) = self.labels.get_mut(prev)
        {
            label.active = false;
        }

        let Some(line) = line.filter(|&l| l < self.labels.len()) else {
            return;
        };
        self.labels[line].active = true;
        self.active = Some(line);
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn labels(&self) -> &[GutterLabel] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Build the gutter for `line_count` lines with `active_line` marked.
pub fn render_gutter(line_count: usize, active_line: Option<usize>) -> GutterModel {
    let mut model = GutterModel::rebuild(line_count);
    model.mark_active(active_line);
    model
}

/// Push a full rebuild of `model` to the host, then its active marker.
///
/// The order matters: a rebuild replaces every label and would wipe a
/// marker applied before it.
pub fn apply_gutter<H: RenderHost + ?Sized>(host: &mut H, gutter: NodeId, model: &GutterModel) {
    host.rebuild_gutter(gutter, model.len());
    host.mark_gutter_active(gutter, model.active());
}

/// Number of digit cells a gutter column should reserve.
pub fn gutter_digits(line_count: usize) -> usize {
    line_count.max(1).ilog10() as usize + 1
}

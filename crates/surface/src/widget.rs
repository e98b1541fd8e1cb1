use core_types::FieldId;
use line_core::{Frame, SurfaceNodes};

/// One mounted editor bound to one backing field.
///
/// `frame` is the last frame pushed to the host. It is a rendering cache
/// only: every event recomputes from host state.
#[derive(Clone, Debug, PartialEq)]
pub struct Widget {
    pub field: FieldId,
    pub nodes: SurfaceNodes,
    pub frame: Frame,
}

impl Widget {
    pub fn new(field: FieldId, nodes: SurfaceNodes) -> Self {
        Self {
            field,
            nodes,
            frame: Frame::default(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.frame.line_count
    }

    pub fn active_line(&self) -> Option<usize> {
        self.frame.gutter.active()
    }
}

use core_types::KeyCode;

/// Host input delivered to a widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The editor's text changed by any means.
    ContentChanged,
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Pointer press anywhere inside the widget.
    Click,
    /// The editor scrolled.
    Scroll,
}

/// What a dispatched event did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// The host must suppress its default handling of the event.
    pub consumed: bool,
    /// The backing field was rewritten.
    pub synced: bool,
}

impl Dispatch {
    pub const IGNORED: Dispatch = Dispatch {
        consumed: false,
        synced: false,
    };
}

//! # surface
//!
//! Glue between a rendering host and the `line_core` engine: one widget per
//! backing field, the event contract, and the sync bridge that mirrors the
//! editor into its field.

mod config;
mod controller;
mod discovery;
mod event;
mod field;
pub mod sync;
mod widget;

pub use config::{
    ConfigError, DEFAULT_CONFIG_FILE, DiscoveryConfig, EditorConfig, Rgba, SurfaceConfig,
    ThemeConfig,
};
pub use controller::{SurfaceController, SurfaceHost};
pub use discovery::{DiscoveredField, PageNode, discover_fields};
pub use event::{Dispatch, SurfaceEvent};
pub use field::{BackingField, BackingStore, FieldStore};
pub use widget::Widget;

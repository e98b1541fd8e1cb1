use std::collections::HashMap;

use core_types::{FieldId, KeyCode, NodeId};
use line_core::{EditHost, GeometryHost, MountHost, RenderHost, SelectionHost, SurfaceNodes};

use crate::config::EditorConfig;
use crate::discovery::{PageNode, discover_fields};
use crate::event::{Dispatch, SurfaceEvent};
use crate::field::BackingStore;
use crate::sync;
use crate::widget::Widget;

/// Everything a host must provide to carry widgets.
pub trait SurfaceHost: SelectionHost + GeometryHost + RenderHost + EditHost + MountHost {}

impl<T> SurfaceHost for T where T: SelectionHost + GeometryHost + RenderHost + EditHost + MountHost {}

/// Owns one [`Widget`] per backing field and routes host events to it.
#[derive(Clone, Debug)]
pub struct SurfaceController {
    widgets: HashMap<FieldId, Widget>,
    owners: HashMap<NodeId, FieldId>,
    indent: String,
    indent_key: KeyCode,
}

impl Default for SurfaceController {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl SurfaceController {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            widgets: HashMap::new(),
            owners: HashMap::new(),
            indent: config.indent.clone(),
            indent_key: config.indent_key(),
        }
    }

    pub fn indent_key(&self) -> KeyCode {
        self.indent_key
    }

    /// Mount a widget for `field`: hide the field, create the widget's nodes
    /// seeded with `initial`, and render gutter and highlight once.
    ///
    /// Attaching an already attached field returns its existing nodes.
    pub fn attach<H, S>(
        &mut self,
        host: &mut H,
        store: &mut S,
        field: FieldId,
        initial: &str,
    ) -> SurfaceNodes
    where
        H: SurfaceHost + ?Sized,
        S: BackingStore + ?Sized,
    {
        if let Some(existing) = self.widgets.get(&field) {
            log::debug!(target: "surface.controller", "{field} already attached");
            return existing.nodes;
        }

        store.hide(field);
        let nodes = host.mount_surface(field, initial);
        for node in [nodes.container, nodes.gutter, nodes.editor, nodes.highlight] {
            self.owners.insert(node, field);
        }

        let mut widget = Widget::new(field, nodes);
        let text = host.text_content(nodes.editor);
        // The host may have normalized the seed; the field mirrors what it shows.
        if store.value(field) != Some(text.as_str()) {
            store.write(field, &text);
        }
        sync::render_document(host, &mut widget, &text);
        log::debug!(
            target: "surface.controller",
            "attached {field}: {} lines",
            widget.line_count()
        );
        self.widgets.insert(field, widget);
        nodes
    }

    /// Discover every eligible field on `page` and attach a widget to each.
    ///
    /// A field the store already knows is seeded from its stored value; a
    /// new one from the page text. Returns the number of fields found.
    pub fn attach_page<H, S>(
        &mut self,
        host: &mut H,
        store: &mut S,
        page: &PageNode,
        class_name: &str,
    ) -> usize
    where
        H: SurfaceHost + ?Sized,
        S: BackingStore + ?Sized,
    {
        let found = discover_fields(page, class_name);
        for discovered in &found {
            let initial = match store.value(discovered.field) {
                Some(value) => value.to_string(),
                None => {
                    store.write(discovered.field, &discovered.initial);
                    discovered.initial.clone()
                }
            };
            self.attach(host, store, discovered.field, &initial);
        }
        found.len()
    }

    pub fn dispatch<H, S>(
        &mut self,
        host: &mut H,
        store: &mut S,
        field: FieldId,
        event: SurfaceEvent,
    ) -> Dispatch
    where
        H: SurfaceHost + ?Sized,
        S: BackingStore + ?Sized,
    {
        let Some(widget) = self.widgets.get_mut(&field) else {
            log::debug!(target: "surface.controller", "{event:?} for unknown {field}");
            return Dispatch::IGNORED;
        };
        log::trace!(target: "surface.controller", "{field}: {event:?}");

        match event {
            SurfaceEvent::ContentChanged => {
                sync::sync_content(host, store, widget);
                Dispatch {
                    consumed: false,
                    synced: true,
                }
            }
            SurfaceEvent::KeyDown(key) if key == self.indent_key => {
                let inserted = host.insert_at_caret(widget.nodes.editor, &self.indent);
                if inserted {
                    sync::sync_content(host, store, widget);
                }
                Dispatch {
                    consumed: true,
                    synced: inserted,
                }
            }
            SurfaceEvent::KeyDown(_) => Dispatch::IGNORED,
            SurfaceEvent::KeyUp(_) | SurfaceEvent::Click => {
                sync::sync_caret(host, widget);
                Dispatch::IGNORED
            }
            SurfaceEvent::Scroll => {
                sync::sync_scroll(host, widget);
                Dispatch::IGNORED
            }
        }
    }

    /// Re-place the gutter marker and highlight of `field` after the host's
    /// layout changed under it, e.g. on resize.
    pub fn refresh<H>(&mut self, host: &mut H, field: FieldId)
    where
        H: SurfaceHost + ?Sized,
    {
        if let Some(widget) = self.widgets.get_mut(&field) {
            sync::sync_caret(host, widget);
        }
    }

    /// Like [`Self::dispatch`], addressed by any node of the widget.
    pub fn dispatch_node<H, S>(
        &mut self,
        host: &mut H,
        store: &mut S,
        node: NodeId,
        event: SurfaceEvent,
    ) -> Dispatch
    where
        H: SurfaceHost + ?Sized,
        S: BackingStore + ?Sized,
    {
        match self.field_for_node(node) {
            Some(field) => self.dispatch(host, store, field, event),
            None => Dispatch::IGNORED,
        }
    }

    pub fn field_for_node(&self, node: NodeId) -> Option<FieldId> {
        self.owners.get(&node).copied()
    }

    pub fn widget(&self, field: FieldId) -> Option<&Widget> {
        self.widgets.get(&field)
    }

    /// Attached field ids in ascending order.
    pub fn fields(&self) -> Vec<FieldId> {
        let mut ids: Vec<_> = self.widgets.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Forget the widget of `field`. Its host nodes are left in place.
    pub fn detach(&mut self, field: FieldId) -> Option<Widget> {
        let widget = self.widgets.remove(&field)?;
        self.owners.retain(|_, owner| *owner != field);
        Some(widget)
    }
}

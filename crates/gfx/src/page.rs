//! One page of gutterline editors, shown inside an egui `Ui`.

use core_types::FieldId;
use egui::{Context, Event, Id, Key, Modifiers, Pos2, Rect, Sense, Ui, Vec2};
use line_core::{GeometryHost, RenderHost, SurfaceNodes, gutter_digits};
use surface::{
    BackingStore, Dispatch, FieldStore, PageNode, SurfaceConfig, SurfaceController, SurfaceEvent,
};

use crate::host::{Focus, PageHost, SurfaceLayout, TEXT_PADDING};
use crate::input::{KeyEffect, apply_default_key, key_code};
use crate::paint::{GUTTER_PADDING, PaintCtx, paint_surface};
use crate::text_measurer::{EguiTextMeasurer, TextMeasurer};

/// Visible rows of a surface, whatever its line count.
pub const MIN_ROWS: usize = 4;
pub const MAX_ROWS: usize = 24;
/// Vertical gap between stacked surfaces.
pub const SURFACE_SPACING: f32 = 12.0;

pub struct EditorPage {
    host: PageHost<EguiTextMeasurer>,
    controller: SurfaceController,
    store: FieldStore,
    config: SurfaceConfig,
}

impl EditorPage {
    /// Attach a widget to every eligible field of `page`.
    ///
    /// Fields already present in `store` keep their stored value.
    pub fn new(ctx: &Context, config: SurfaceConfig, page: &PageNode, mut store: FieldStore) -> Self {
        let measurer =
            EguiTextMeasurer::new(ctx, config.editor.font_size, config.editor.line_spacing);
        let mut host = PageHost::new(measurer);
        let mut controller = SurfaceController::new(&config.editor);
        let found =
            controller.attach_page(&mut host, &mut store, page, &config.discovery.class_name);
        log::info!(target: "gfx.page", "attached {found} editors");

        Self {
            host,
            controller,
            store,
            config,
        }
    }

    pub fn host(&self) -> &PageHost<EguiTextMeasurer> {
        &self.host
    }

    pub fn controller(&self) -> &SurfaceController {
        &self.controller
    }

    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn into_store(self) -> FieldStore {
        self.store
    }

    /// Current backing-field value of `field`.
    pub fn value(&self, field: FieldId) -> Option<&str> {
        self.store.value(field)
    }

    /// Lay out, route input to, and paint every editor.
    pub fn show(&mut self, ui: &mut Ui) {
        let (pressed, press_pos) =
            ui.input(|i| (i.pointer.primary_pressed(), i.pointer.interact_pos()));
        let mut press_claimed = false;

        for index in 0..self.host.len() {
            let layout = self.allocate(ui, index);
            press_claimed |= self.route_pointer(ui, index, layout);
        }

        if pressed && !press_claimed && press_pos.is_some() {
            self.move_focus(Focus::None);
        }

        self.route_keys(ui);

        let paint = PaintCtx {
            painter: ui.painter(),
            theme: &self.config.theme,
            font_id: self.host.measurer().font_id(),
        };
        for index in 0..self.host.len() {
            paint_surface(&paint, &self.host, index);
        }
    }

    fn allocate(&mut self, ui: &mut Ui, index: usize) -> SurfaceLayout {
        let Some(s) = self.host.surface(index) else {
            return SurfaceLayout::default();
        };
        let measurer = self.host.measurer();
        let lh = measurer.line_height();
        let lines = s.gutter.len().max(1);

        let rows = lines.clamp(MIN_ROWS, MAX_ROWS);
        let height = rows as f32 * lh + 2.0 * TEXT_PADDING;
        let gutter_w = gutter_digits(lines) as f32 * measurer.measure("0") + 2.0 * GUTTER_PADDING;

        let (container, _) =
            ui.allocate_exact_size(Vec2::new(ui.available_width(), height), Sense::hover());
        ui.add_space(SURFACE_SPACING);

        let layout = SurfaceLayout {
            container,
            gutter: Rect::from_min_size(container.min, Vec2::new(gutter_w, height)),
            editor: Rect::from_min_max(
                Pos2::new(container.left() + gutter_w, container.top()),
                container.max,
            ),
        };

        let field = s.field;
        let changed = s.layout != layout;
        self.host.set_layout(index, layout);
        if changed {
            self.controller.refresh(&mut self.host, field);
        }
        layout
    }

    /// Clicks, drags and wheel scrolling over surface `index`. Returns
    /// whether a primary press landed on it.
    fn route_pointer(&mut self, ui: &mut Ui, index: usize, layout: SurfaceLayout) -> bool {
        let Some(s) = self.host.surface(index) else {
            return false;
        };
        let (field, nodes) = (s.field, s.nodes);
        let editor_id = editor_widget_id(field);
        let editor_resp = ui.interact(layout.editor, editor_id, Sense::click_and_drag());

        let (pressed, shift, pos, hover, wheel) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.modifiers.shift,
                i.pointer.interact_pos(),
                i.pointer.hover_pos(),
                i.smooth_scroll_delta.y,
            )
        });

        let mut claimed = false;
        if pressed && let Some(pos) = pos {
            if layout.editor.contains(pos) {
                let offset = self.host.offset_at(index, pos);
                let selecting = shift && self.host.focus() == Focus::Editor(index);
                if let Some(s) = self.host.surface_mut(index) {
                    s.buffer.set_caret(offset, selecting);
                }
                ui.memory_mut(|m| m.request_focus(editor_id));
                self.move_focus(Focus::Editor(index));
                claimed = true;
            } else if layout.gutter.contains(pos) {
                self.move_focus(Focus::Gutter(index));
                claimed = true;
            }
        } else if editor_resp.dragged()
            && self.host.focus() == Focus::Editor(index)
            && let Some(pos) = editor_resp.interact_pointer_pos()
        {
            let offset = self.host.offset_at(index, pos);
            if let Some(s) = self.host.surface_mut(index) {
                s.buffer.set_caret(offset, true);
            }
            self.dispatch(field, SurfaceEvent::Click);
        }

        if wheel != 0.0 && hover.is_some_and(|p| layout.editor.contains(p)) {
            self.scroll_editor(field, nodes, wheel);
        }
        claimed
    }

    fn route_keys(&mut self, ui: &mut Ui) {
        let Focus::Editor(index) = self.host.focus() else {
            return;
        };
        let Some(field) = self.host.surface(index).map(|s| s.field) else {
            return;
        };

        let editor_id = editor_widget_id(field);
        let events = ui.input_mut(|i| {
            let events = i.events.clone();
            // Tab and Escape belong to the editor while it has focus.
            i.consume_key(Modifiers::NONE, Key::Tab);
            i.consume_key(Modifiers::SHIFT, Key::Tab);
            i.consume_key(Modifiers::NONE, Key::Escape);
            events
        });
        ui.memory_mut(|m| {
            m.set_focus_lock_filter(
                editor_id,
                egui::EventFilter {
                    tab: true,
                    horizontal_arrows: true,
                    vertical_arrows: true,
                    escape: true,
                },
            )
        });

        let saw_text_newline = events
            .iter()
            .any(|e| matches!(e, Event::Text(t) | Event::Paste(t) if t.contains(['\n', '\r'])));
        let page_rows = self.visible_rows(index);

        for evt in &events {
            if self.host.focus() != Focus::Editor(index) {
                break;
            }
            match evt {
                Event::Text(t) | Event::Paste(t) => {
                    let changed = self
                        .host
                        .surface_mut(index)
                        .is_some_and(|s| s.buffer.insert_text(t));
                    if changed {
                        self.dispatch(field, SurfaceEvent::ContentChanged);
                    }
                }
                Event::Key {
                    key,
                    pressed: false,
                    ..
                } => {
                    self.dispatch(field, SurfaceEvent::KeyUp(key_code(*key)));
                }
                Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => {
                    let d = self.dispatch(field, SurfaceEvent::KeyDown(key_code(*key)));
                    if d.consumed {
                        continue;
                    }
                    let effect = match self.host.surface_mut(index) {
                        Some(s) => apply_default_key(
                            &mut s.buffer,
                            *key,
                            *modifiers,
                            page_rows,
                            saw_text_newline,
                        ),
                        None => KeyEffect::None,
                    };
                    match effect {
                        KeyEffect::Edited => {
                            self.dispatch(field, SurfaceEvent::ContentChanged);
                        }
                        KeyEffect::Blur => {
                            ui.memory_mut(|m| m.surrender_focus(editor_id));
                            self.move_focus(Focus::None);
                        }
                        KeyEffect::Moved | KeyEffect::None => {}
                    }
                }
                _ => {}
            }
        }

        self.scroll_caret_into_view(index);
    }

    fn visible_rows(&self, index: usize) -> usize {
        let lh = self.host.measurer().line_height();
        self.host
            .surface(index)
            .map(|s| ((s.layout.editor.height() - 2.0 * TEXT_PADDING) / lh).floor().max(1.0) as usize)
            .unwrap_or(1)
    }

    /// Move the host selection to `next`, letting both the surface losing it
    /// and the one gaining it re-place their highlight.
    fn move_focus(&mut self, next: Focus) {
        let prev = self.host.focus();
        self.host.set_focus(next);

        let prev_index = focus_index(prev);
        let next_index = focus_index(next);
        let mut touched = Vec::with_capacity(2);
        if prev_index != next_index {
            touched.extend(prev_index);
        }
        touched.extend(next_index);

        for index in touched {
            if let Some(field) = self.host.surface(index).map(|s| s.field) {
                self.dispatch(field, SurfaceEvent::Click);
            }
        }
    }

    fn scroll_editor(&mut self, field: FieldId, nodes: SurfaceNodes, delta_y: f32) {
        let before = self.host.scroll_top(nodes.editor);
        self.host.set_scroll_top(nodes.editor, before - delta_y);
        if self.host.scroll_top(nodes.editor) != before {
            self.dispatch(field, SurfaceEvent::Scroll);
        }
    }

    fn scroll_caret_into_view(&mut self, index: usize) {
        let Some(s) = self.host.surface(index) else {
            return;
        };
        let (field, nodes, caret, editor) = (s.field, s.nodes, s.buffer.caret(), s.layout.editor);
        let caret_box = self.host.caret_box(index, caret);
        if !editor.is_positive() {
            return;
        }

        let top = editor.top() + TEXT_PADDING;
        let bottom = editor.bottom() - TEXT_PADDING;
        let delta = if caret_box.top() < top {
            caret_box.top() - top
        } else if caret_box.bottom() > bottom {
            caret_box.bottom() - bottom
        } else {
            return;
        };

        let before = self.host.scroll_top(nodes.editor);
        self.host.set_scroll_top(nodes.editor, before + delta);
        if self.host.scroll_top(nodes.editor) != before {
            self.dispatch(field, SurfaceEvent::Scroll);
        }
    }

    fn dispatch(&mut self, field: FieldId, event: SurfaceEvent) -> Dispatch {
        self.controller
            .dispatch(&mut self.host, &mut self.store, field, event)
    }
}

fn editor_widget_id(field: FieldId) -> Id {
    Id::new(("gutterline-editor", field.0))
}

fn focus_index(focus: Focus) -> Option<usize> {
    match focus {
        Focus::None => None,
        Focus::Editor(i) | Focus::Gutter(i) => Some(i),
    }
}

#[cfg(test)]
mod tests;

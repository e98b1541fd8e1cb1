use super::*;
use egui::{CentralPanel, Context, Event, Key, Modifiers, PointerButton, Pos2, RawInput, Rect, Vec2};
use line_core::HighlightRect;

fn raw_input(events: Vec<Event>) -> RawInput {
    RawInput {
        events,
        screen_rect: Some(Rect::from_min_size(
            Pos2::new(0.0, 0.0),
            Vec2::new(1200.0, 900.0),
        )),
        ..Default::default()
    }
}

fn run_frame(ctx: &Context, page: &mut EditorPage, events: Vec<Event>) {
    ctx.run(raw_input(events), |ctx| {
        CentralPanel::default().show(ctx, |ui| page.show(ui));
    });
}

fn new_page(ctx: &Context, fields: &[(u32, &str)]) -> EditorPage {
    let page = PageNode::document(
        fields
            .iter()
            .map(|&(id, text)| PageNode::textarea(id, "gutterline", text))
            .collect(),
    );
    let mut page = EditorPage::new(ctx, SurfaceConfig::default(), &page, FieldStore::new());
    // First frame assigns layout.
    run_frame(ctx, &mut page, Vec::new());
    page
}

fn click(pos: Pos2) -> Vec<Event> {
    vec![
        Event::PointerMoved(pos),
        Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed: true,
            modifiers: Modifiers::NONE,
        },
    ]
}

fn release(pos: Pos2) -> Vec<Event> {
    vec![Event::PointerButton {
        pos,
        button: PointerButton::Primary,
        pressed: false,
        modifiers: Modifiers::NONE,
    }]
}

fn key(key: Key, pressed: bool, modifiers: Modifiers) -> Event {
    Event::Key {
        key,
        physical_key: None,
        pressed,
        repeat: false,
        modifiers,
    }
}

fn tap(k: Key, modifiers: Modifiers) -> Vec<Event> {
    vec![key(k, true, modifiers), key(k, false, modifiers)]
}

/// A point just right of the start of `line` in surface `index`.
fn line_start_pos(page: &EditorPage, index: usize, line: usize) -> Pos2 {
    let editor = page.host().surface(index).unwrap().layout.editor;
    let lh = page.config().editor.font_size * page.config().editor.line_spacing;
    Pos2::new(
        editor.left() + TEXT_PADDING + 1.0,
        editor.top() + TEXT_PADDING + (line as f32 + 0.5) * lh,
    )
}

fn click_and_release(ctx: &Context, page: &mut EditorPage, pos: Pos2) {
    run_frame(ctx, page, click(pos));
    run_frame(ctx, page, release(pos));
}

#[test]
fn first_frame_lays_out_gutter_and_editor() {
    let ctx = Context::default();
    let page = new_page(&ctx, &[(1, "a\nb\nc")]);

    let s = page.host().surface(0).unwrap();
    assert!(s.layout.container.is_positive());
    assert!(s.layout.gutter.right() <= s.layout.editor.left());
    assert_eq!(s.gutter.len(), 3);
    assert_eq!(s.highlight, HighlightRect::Hidden);
    assert!(page.store().is_hidden(FieldId(1)));
}

#[test]
fn click_then_tab_indents_the_line() {
    let ctx = Context::default();
    let mut page = new_page(&ctx, &[(1, "x\ny\nz")]);

    let pos = line_start_pos(&page, 0, 1);
    click_and_release(&ctx, &mut page, pos);
    assert_eq!(page.host().focus(), Focus::Editor(0));
    assert_eq!(page.host().surface(0).unwrap().buffer.caret(), 2);

    run_frame(&ctx, &mut page, tap(Key::Tab, Modifiers::NONE));
    assert_eq!(page.value(FieldId(1)), Some("x\n    y\nz"));

    let widget = page.controller().widget(FieldId(1)).unwrap();
    assert_eq!(widget.line_count(), 3);
    assert_eq!(widget.active_line(), Some(1));
    assert_eq!(page.host().focus(), Focus::Editor(0));
}

#[test]
fn typing_round_trips_to_the_backing_field() {
    let ctx = Context::default();
    let mut page = new_page(&ctx, &[(1, "x\ny")]);

    let editor = page.host().surface(0).unwrap().layout.editor;
    let end_of_first_line = Pos2::new(editor.right() - 2.0, line_start_pos(&page, 0, 0).y);
    click_and_release(&ctx, &mut page, end_of_first_line);

    run_frame(
        &ctx,
        &mut page,
        vec![
            Event::Text("abc".to_string()),
            key(Key::Enter, true, Modifiers::NONE),
            key(Key::Enter, false, Modifiers::NONE),
            Event::Text("q".to_string()),
        ],
    );

    let text = page.host().surface(0).unwrap().buffer.value().to_string();
    assert_eq!(text, "xabc\nq\ny");
    assert_eq!(page.value(FieldId(1)), Some(text.as_str()));
    assert_eq!(page.host().surface(0).unwrap().gutter.len(), 3);
    assert_eq!(page.host().surface(0).unwrap().gutter.active(), Some(1));
}

#[test]
fn delete_syncs_and_navigation_does_not() {
    let ctx = Context::default();
    let mut page = new_page(&ctx, &[(1, "ab\ncd")]);
    let pos = line_start_pos(&page, 0, 1);
    click_and_release(&ctx, &mut page, pos);

    run_frame(&ctx, &mut page, tap(Key::ArrowUp, Modifiers::NONE));
    assert_eq!(page.value(FieldId(1)), Some("ab\ncd"));
    assert_eq!(page.host().surface(0).unwrap().gutter.active(), Some(0));

    run_frame(&ctx, &mut page, tap(Key::Delete, Modifiers::NONE));
    assert_eq!(page.value(FieldId(1)), Some("b\ncd"));
}

#[test]
fn arrow_keys_move_the_active_line() {
    let ctx = Context::default();
    let mut page = new_page(&ctx, &[(1, "one\ntwo\nthree")]);
    let pos = line_start_pos(&page, 0, 0);
    click_and_release(&ctx, &mut page, pos);
    assert_eq!(page.host().surface(0).unwrap().gutter.active(), Some(0));
    let top0 = page.host().surface(0).unwrap().highlight.as_rectangle().unwrap().y;

    run_frame(&ctx, &mut page, tap(Key::ArrowDown, Modifiers::NONE));
    run_frame(&ctx, &mut page, tap(Key::ArrowDown, Modifiers::NONE));

    let s = page.host().surface(0).unwrap();
    assert_eq!(s.gutter.active(), Some(2));
    let lh = page.host().measurer().line_height();
    let top2 = s.highlight.as_rectangle().unwrap().y;
    assert!((top2 - top0 - 2.0 * lh).abs() < 0.01, "{top0} -> {top2}");
}

#[test]
fn clicking_the_gutter_hides_the_highlight() {
    let ctx = Context::default();
    let mut page = new_page(&ctx, &[(1, "a\nb")]);
    let pos = line_start_pos(&page, 0, 1);
    click_and_release(&ctx, &mut page, pos);
    assert!(page.host().surface(0).unwrap().highlight.is_visible());

    let gutter = page.host().surface(0).unwrap().layout.gutter;
    click_and_release(&ctx, &mut page, gutter.center());

    let s = page.host().surface(0).unwrap();
    assert_eq!(page.host().focus(), Focus::Gutter(0));
    assert_eq!(s.highlight, HighlightRect::Hidden);
    assert_eq!(s.gutter.active(), None);
}

#[test]
fn clicking_elsewhere_or_escape_blurs() {
    let ctx = Context::default();
    let mut page = new_page(&ctx, &[(1, "a")]);
    let pos = line_start_pos(&page, 0, 0);

    click_and_release(&ctx, &mut page, pos);
    click_and_release(&ctx, &mut page, Pos2::new(600.0, 880.0));
    assert_eq!(page.host().focus(), Focus::None);
    assert!(!page.host().surface(0).unwrap().highlight.is_visible());

    click_and_release(&ctx, &mut page, pos);
    assert!(page.host().surface(0).unwrap().highlight.is_visible());
    run_frame(&ctx, &mut page, tap(Key::Escape, Modifiers::NONE));
    assert_eq!(page.host().focus(), Focus::None);
    assert!(!page.host().surface(0).unwrap().highlight.is_visible());
}

#[test]
fn focus_moves_between_editors() {
    let ctx = Context::default();
    let mut page = new_page(&ctx, &[(1, "first"), (2, "second")]);

    let first = line_start_pos(&page, 0, 0);
    let second = line_start_pos(&page, 1, 0);
    click_and_release(&ctx, &mut page, first);
    assert!(page.host().surface(0).unwrap().highlight.is_visible());

    click_and_release(&ctx, &mut page, second);
    assert!(!page.host().surface(0).unwrap().highlight.is_visible());
    assert_eq!(page.host().surface(0).unwrap().gutter.active(), None);
    assert!(page.host().surface(1).unwrap().highlight.is_visible());

    run_frame(&ctx, &mut page, tap(Key::Tab, Modifiers::NONE));
    assert_eq!(page.value(FieldId(1)), Some("first"));
    assert_eq!(page.value(FieldId(2)), Some("    second"));
}

#[test]
fn caret_past_the_view_scrolls_editor_and_gutter_together() {
    let ctx = Context::default();
    let text: String = (1..=60).map(|n| format!("line {n}\n")).collect();
    let mut page = new_page(&ctx, &[(1, &text)]);
    let pos = line_start_pos(&page, 0, 0);
    click_and_release(&ctx, &mut page, pos);

    run_frame(&ctx, &mut page, tap(Key::End, Modifiers::CTRL));

    let s = page.host().surface(0).unwrap();
    let scroll = s.buffer.scroll_y();
    assert!(scroll > 0.0);
    assert_eq!(s.gutter_scroll, scroll);
    assert_eq!(s.gutter.active(), Some(60));

    // The overlay stays inside the visible editor.
    let r = s.highlight.as_rectangle().unwrap();
    let top = s.layout.container.top() + r.y;
    assert!(top >= s.layout.editor.top() && top + r.height <= s.layout.editor.bottom() + 0.01);
}

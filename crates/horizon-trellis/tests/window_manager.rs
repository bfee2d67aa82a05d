//! End-to-end tests driving a window manager through raw input.

use horizon_trellis::render::{FixedFont, RecordingRenderer};
use horizon_trellis::widget::widgets::{Button, Text};
use horizon_trellis::widget::{Alignment, Container};
use horizon_trellis::window::{CursorShape, ManagerConfig, Window, WindowManager};
use horizon_trellis::{
    Context, InputEvent, MouseButton, MouseButtons, Rect, UiEventKind, WidgetId, WindowId,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn manager() -> WindowManager {
    init_tracing();
    WindowManager::new(
        &Context::new(),
        RecordingRenderer::new(),
        FixedFont::default().shared(),
        ManagerConfig::default(),
    )
    .unwrap()
}

fn show(manager: &WindowManager, rect: Rect) -> WindowId {
    let id = manager.add(Window::new(rect));
    manager.with_window(id, |window| window.set_visible(true)).unwrap();
    manager.tick();
    manager.bus().clear();
    id
}

fn window_events(manager: &WindowManager, id: WindowId) -> Vec<UiEventKind> {
    manager
        .bus()
        .drain()
        .into_iter()
        .filter(|event| event.window_id() == Some(id))
        .map(|event| event.kind)
        .collect()
}

fn rect_of(manager: &WindowManager, window: WindowId, widget: WidgetId) -> Rect {
    manager
        .with_window(window, |window| window.tree().get(widget).unwrap().rect())
        .unwrap()
}

#[test]
fn test_docked_children_share_the_client_area() {
    let manager = manager();
    let id = show(&manager, Rect::new(0.0, 0.0, 200.0, 100.0));
    let (left, fill) = manager
        .with_window(id, |window| {
            let tree = window.tree_mut();
            let root = tree.root().unwrap();
            let left = tree.add(root, Container, Alignment::Left, "50,10");
            let fill = tree.add(root, Container, Alignment::Fill, "");
            (left, fill)
        })
        .unwrap();

    assert_eq!(rect_of(&manager, id, left), Rect::new(0.0, 0.0, 50.0, 100.0));
    assert_eq!(rect_of(&manager, id, fill), Rect::new(51.0, 0.0, 149.0, 100.0));
}

#[test]
fn test_overlapping_child_reserves_no_space() {
    let manager = manager();
    let id = show(&manager, Rect::new(0.0, 0.0, 200.0, 100.0));
    let (overlay, fill) = manager
        .with_window(id, |window| {
            let tree = window.tree_mut();
            let root = tree.root().unwrap();
            let overlay = tree.add_overlapping(root, Container, Alignment::Fill, "");
            let fill = tree.add(root, Container, Alignment::Fill, "");
            (overlay, fill)
        })
        .unwrap();

    let full = Rect::new(0.0, 0.0, 200.0, 100.0);
    assert_eq!(rect_of(&manager, id, overlay), full);
    assert_eq!(rect_of(&manager, id, fill), full);
}

#[test]
fn test_toggling_twice_before_a_tick_is_a_no_op() {
    let manager = manager();
    let id = show(&manager, Rect::new(0.0, 0.0, 100.0, 100.0));
    manager
        .with_window(id, |window| {
            window.set_visible(false);
            window.set_visible(true);
        })
        .unwrap();
    manager.tick();

    assert!(manager.with_window(id, |window| window.is_visible()).unwrap());
    let events = window_events(&manager, id);
    assert!(!events.contains(&UiEventKind::Hide), "{events:?}");
    assert!(!events.contains(&UiEventKind::Show), "{events:?}");
}

#[test]
fn test_button_click_through_the_manager() {
    let manager = manager();
    let id = show(&manager, Rect::new(100.0, 100.0, 200.0, 100.0));
    let button = manager
        .with_window(id, |window| {
            let tree = window.tree_mut();
            let root = tree.root().unwrap();
            let button = tree.add(root, Button::new(), Alignment::CornerBottomLeft, "80,24,RAISED");
            tree.add(button, Text::new("OK"), Alignment::Center, "");
            button
        })
        .unwrap();
    manager.bus().clear();

    // Screen coordinates; the button sits at the window origin.
    assert!(manager.handle_input(&InputEvent::mouse_down(MouseButton::Left, 110.0, 110.0)));
    manager.handle_input(&InputEvent::mouse_up(MouseButton::Left, 110.0, 110.0));

    let events = manager.bus().drain();
    let count = |kind| {
        events
            .iter()
            .filter(|event| event.kind == kind && event.widget_id() == Some(button))
            .count()
    };
    assert_eq!(count(UiEventKind::GotFocus), 1);
    assert_eq!(count(UiEventKind::Click), 1);
}

#[test]
fn test_border_drag_resizes_the_window() {
    let manager = manager();
    let id = show(&manager, Rect::new(0.0, 0.0, 100.0, 100.0));

    manager.handle_input(&InputEvent::mouse_move(MouseButtons::NONE, 99.0, 50.0));
    assert_eq!(manager.cursor(), CursorShape::ResizeHorizontal);
    manager.handle_input(&InputEvent::mouse_down(MouseButton::Left, 99.0, 50.0));
    assert!(manager.is_resizing());
    manager.handle_input(&InputEvent::mouse_move(MouseButtons::LEFT, 109.0, 50.0));
    manager.handle_input(&InputEvent::mouse_up(MouseButton::Left, 109.0, 50.0));

    assert!(!manager.is_resizing());
    assert_eq!(manager.cursor(), CursorShape::Arrow);
    let rect = manager.with_window(id, |window| window.rect()).unwrap();
    assert_eq!(rect, Rect::new(0.0, 0.0, 110.0, 100.0));
    let root_width = manager
        .with_window(id, |window| {
            let tree = window.tree();
            tree.get(tree.root().unwrap()).unwrap().rect().width
        })
        .unwrap();
    assert_eq!(root_width, 110.0);
}

#[test]
fn test_removing_a_visible_window() {
    let manager = manager();
    let id = show(&manager, Rect::new(0.0, 0.0, 100.0, 100.0));

    manager.remove(id);
    manager.tick();
    assert!(!manager.contains(id));
    assert_eq!(
        window_events(&manager, id),
        vec![UiEventKind::LostFocus, UiEventKind::Hide, UiEventKind::Destroy]
    );
    assert_eq!(manager.focused_window(), None);

    manager.remove(id);
    manager.tick();
    assert!(window_events(&manager, id).is_empty());
}

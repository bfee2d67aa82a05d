//! A window hosted by the [`WindowManager`](super::WindowManager).

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::sync::Arc;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{
    Key, MouseButton, MouseButtons, Point, Rect, Size, UiEvent, UiEventKind, UiEventPayload,
    WidgetId, WindowId,
};

use super::ResizeEdge;
use crate::render::Renderer;
use crate::style::Style;
use crate::widget::widgets::Panel;
use crate::widget::{TreeEnv, Widget, WidgetTree};

/// Set of window edges that may be dragged to resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeBorders(u8);

impl ResizeBorders {
    pub const NONE: Self = Self(0);
    pub const LEFT: Self = Self(1 << 0);
    pub const RIGHT: Self = Self(1 << 1);
    pub const TOP: Self = Self(1 << 2);
    pub const BOTTOM: Self = Self(1 << 3);
    pub const ALL: Self = Self(0b1111);

    #[inline]
    pub fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether `edge` is in the set.
    pub fn allows(&self, edge: ResizeEdge) -> bool {
        self.contains(match edge {
            ResizeEdge::Left => Self::LEFT,
            ResizeEdge::Right => Self::RIGHT,
            ResizeEdge::Top => Self::TOP,
            ResizeEdge::Bottom => Self::BOTTOM,
        })
    }
}

impl Default for ResizeBorders {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for ResizeBorders {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ResizeBorders {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Window-level hooks.
///
/// Lifecycle hooks run after the matching widget-level work. Input hooks
/// are fallbacks: they see an event only when the widget tree did not
/// consume it, and returning `true` stops it from reaching the bus.
#[allow(unused_variables)]
pub trait WindowDelegate: Send {
    /// The window was attached and its root widget created. Build the
    /// window's widgets here.
    fn on_create(&mut self, tree: &mut WidgetTree) {}

    fn on_destroy(&mut self, tree: &mut WidgetTree) {}

    fn on_show(&mut self, tree: &mut WidgetTree) {}

    fn on_hide(&mut self, tree: &mut WidgetTree) {}

    fn on_resize(&mut self, tree: &mut WidgetTree) {}

    fn on_move(&mut self, tree: &mut WidgetTree) {}

    fn on_got_focus(&mut self, tree: &mut WidgetTree) {}

    fn on_lost_focus(&mut self, tree: &mut WidgetTree) {}

    fn key_down(&mut self, tree: &mut WidgetTree, key: Key) -> bool {
        false
    }

    fn key_up(&mut self, tree: &mut WidgetTree, key: Key) -> bool {
        false
    }

    fn text_input(&mut self, tree: &mut WidgetTree, text: &str) -> bool {
        false
    }

    fn mouse_down(&mut self, tree: &mut WidgetTree, button: MouseButton, x: f32, y: f32) -> bool {
        false
    }

    fn mouse_up(&mut self, tree: &mut WidgetTree, button: MouseButton, x: f32, y: f32) -> bool {
        false
    }

    fn mouse_move(&mut self, tree: &mut WidgetTree, buttons: MouseButtons, x: f32, y: f32) -> bool {
        false
    }
}

/// A root widget waiting for the window to be attached.
struct RootSpec {
    widget: Box<dyn Widget>,
    descriptor: String,
    padding: f32,
}

/// One window: a rectangle on the output and the widget tree drawn in it.
///
/// Windows are built detached with the `with_*` builders and come alive
/// when added to a manager. Widget access through [`tree`](Self::tree) is
/// only valid once attached.
pub struct Window {
    id: WindowId,
    rect: Rect,
    min_size: Size,
    max_size: Size,
    visible: bool,
    pending_visible: Option<bool>,
    transparency: f32,
    resize_borders: ResizeBorders,
    style: Option<Arc<dyn Style>>,
    root: Option<RootSpec>,
    delegate: Option<Box<dyn WindowDelegate>>,
    tree: Option<WidgetTree>,
}

impl Window {
    /// A hidden, detached window covering `rect`.
    pub fn new(rect: Rect) -> Self {
        Self {
            id: WindowId::next(),
            rect,
            min_size: Size::ZERO,
            max_size: Size::new(f32::INFINITY, f32::INFINITY),
            visible: false,
            pending_visible: None,
            transparency: 0.0,
            resize_borders: ResizeBorders::ALL,
            style: None,
            root: None,
            delegate: None,
            tree: None,
        }
    }

    /// Use `widget` as the root instead of a plain panel.
    pub fn with_root(mut self, widget: impl Widget, descriptor: &str, padding: f32) -> Self {
        self.root = Some(RootSpec {
            widget: Box::new(widget),
            descriptor: descriptor.to_string(),
            padding,
        });
        self
    }

    /// Draw with `style` instead of the manager's default.
    pub fn with_style(mut self, style: Arc<dyn Style>) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_delegate(mut self, delegate: impl WindowDelegate + 'static) -> Self {
        self.delegate = Some(Box::new(delegate));
        self
    }

    pub fn with_min_size(mut self, width: f32, height: f32) -> Self {
        self.min_size = Size::new(width, height);
        self
    }

    pub fn with_max_size(mut self, width: f32, height: f32) -> Self {
        self.max_size = Size::new(width, height);
        self
    }

    pub fn with_resize_borders(mut self, borders: ResizeBorders) -> Self {
        self.resize_borders = borders;
        self
    }

    /// Global transparency, 0.0 is opaque.
    pub fn with_transparency(mut self, transparency: f32) -> Self {
        self.transparency = transparency.clamp(0.0, 1.0);
        self
    }

    /// Start visible: the window is shown as soon as it is added.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn max_size(&self) -> Size {
        self.max_size
    }

    pub fn transparency(&self) -> f32 {
        self.transparency
    }

    pub fn resize_borders(&self) -> ResizeBorders {
        self.resize_borders
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The visibility requested for the next tick, if any.
    pub fn pending_visibility(&self) -> Option<bool> {
        self.pending_visible
    }

    pub fn is_attached(&self) -> bool {
        self.tree.is_some()
    }

    /// The root widget, once attached.
    pub fn root(&self) -> Option<WidgetId> {
        self.tree.as_ref().and_then(WidgetTree::root)
    }

    /// The window's widgets.
    ///
    /// # Panics
    ///
    /// Panics if the window is not attached to a manager.
    pub fn tree(&self) -> &WidgetTree {
        match &self.tree {
            Some(tree) => tree,
            None => panic!("window {} is not attached", self.id),
        }
    }

    /// Mutable access to the window's widgets.
    ///
    /// # Panics
    ///
    /// Panics if the window is not attached to a manager.
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        match &mut self.tree {
            Some(tree) => tree,
            None => panic!("window {} is not attached", self.id),
        }
    }

    /// The window's style, once attached.
    pub fn style(&self) -> Option<&Arc<dyn Style>> {
        self.style.as_ref()
    }

    /// Request a visibility change, applied on the next manager tick.
    ///
    /// Only the last request before a tick counts, so showing then hiding a
    /// hidden window leaves it hidden.
    pub fn set_visible(&mut self, visible: bool) {
        self.pending_visible = Some(visible);
    }

    pub(crate) fn take_pending_visibility(&mut self) -> Option<bool> {
        self.pending_visible.take()
    }

    /// Bound `size` by the window's min and max sizes.
    pub fn clamp_size(&self, size: Size) -> Size {
        Size::new(
            size.width.min(self.max_size.width).max(self.min_size.width),
            size.height.min(self.max_size.height).max(self.min_size.height),
        )
    }

    /// Move and resize the window. The size is clamped to the min and max
    /// sizes.
    pub fn set_rect(&mut self, rect: Rect) {
        let size = self.clamp_size(rect.size());
        let moved = (rect.x, rect.y) != (self.rect.x, self.rect.y);
        let resized = size != self.rect.size();
        self.rect = Rect::new(rect.x, rect.y, size.width, size.height);

        if resized {
            tracing::debug!(target: targets::WINDOW, window = %self.id, ?size, "window resized");
            if let Some(tree) = self.tree.as_mut()
                && let Some(root) = tree.root()
            {
                tree.apply_size(root, size.width, size.height);
            }
            self.delegate(|delegate, tree| delegate.on_resize(tree));
            self.emit(UiEventKind::Resize, UiEventPayload::Size(size));
        }
        if moved {
            self.delegate(|delegate, tree| delegate.on_move(tree));
            self.emit(UiEventKind::Move, UiEventPayload::Position(Point::new(rect.x, rect.y)));
        }
        if moved || resized {
            self.refresh();
        }
    }

    pub fn set_pos(&mut self, x: f32, y: f32) {
        self.set_rect(Rect::new(x, y, self.rect.width, self.rect.height));
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.set_rect(Rect::new(self.rect.x, self.rect.y, width, height));
    }

    /// Ask the manager to redraw.
    pub fn refresh(&self) {
        if let Some(tree) = &self.tree {
            tree.request_redraw();
        }
    }

    // =========================================================================
    // Lifecycle, driven by the manager
    // =========================================================================

    /// Create the widget tree and its root widget.
    ///
    /// # Panics
    ///
    /// Panics if the window is already attached.
    pub(crate) fn attach(&mut self, mut env: TreeEnv) {
        assert!(self.tree.is_none(), "window {} is already attached", self.id);
        env.window = self.id;
        env.window_visible = self.visible;
        match &self.style {
            Some(style) => env.style = Arc::clone(style),
            None => self.style = Some(Arc::clone(&env.style)),
        }

        let mut tree = WidgetTree::new(env);
        let root = self.root.take().unwrap_or_else(|| RootSpec {
            widget: Box::new(Panel::new()),
            descriptor: String::new(),
            padding: 0.0,
        });
        tree.create_root(root.widget, &root.descriptor, root.padding, self.rect.size());
        self.tree = Some(tree);
        tracing::debug!(target: targets::WINDOW, window = %self.id, "window attached");
    }

    /// Let the delegate build the window, lay it out and announce it.
    pub(crate) fn notify_create(&mut self) {
        self.delegate(|delegate, tree| delegate.on_create(tree));
        if let Some(tree) = self.tree.as_mut()
            && let Some(root) = tree.root()
        {
            tree.resize_children(root);
        }
        self.emit(UiEventKind::Create, UiEventPayload::None);
    }

    pub(crate) fn show(&mut self) {
        self.visible = true;
        if let Some(tree) = self.tree.as_mut() {
            tree.env_mut().window_visible = true;
            if let Some(root) = tree.root() {
                tree.notify_show(root);
            }
        }
        self.delegate(|delegate, tree| delegate.on_show(tree));
        self.emit(UiEventKind::Show, UiEventPayload::None);
        self.refresh();
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
        if let Some(tree) = self.tree.as_mut() {
            tree.env_mut().window_visible = false;
            if let Some(root) = tree.root() {
                tree.notify_hide(root);
            }
        }
        self.delegate(|delegate, tree| delegate.on_hide(tree));
        self.emit(UiEventKind::Hide, UiEventPayload::None);
        self.refresh();
    }

    pub(crate) fn got_focus(&mut self) {
        self.delegate(|delegate, tree| delegate.on_got_focus(tree));
        self.emit(UiEventKind::GotFocus, UiEventPayload::None);
    }

    pub(crate) fn lost_focus(&mut self) {
        self.delegate(|delegate, tree| delegate.on_lost_focus(tree));
        self.emit(UiEventKind::LostFocus, UiEventPayload::None);
    }

    /// Tear down the widgets, children first, then announce `Destroy`.
    /// Does nothing on a detached window.
    pub(crate) fn destroy(&mut self) {
        let Some(mut tree) = self.tree.take() else {
            return;
        };
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_destroy(&mut tree);
        }
        tree.destroy();
        tree.bus().push(UiEvent::window(UiEventKind::Destroy, self.id));
        tree.request_redraw();
        tracing::debug!(target: targets::WINDOW, window = %self.id, "window destroyed");
    }

    pub(crate) fn paint(&self, renderer: &mut dyn Renderer) {
        let Some(tree) = &self.tree else {
            return;
        };
        renderer.set_translate(Point::new(self.rect.x, self.rect.y));
        renderer.set_transparency(self.transparency);
        tree.paint(renderer);
    }

    /// Whether the root widget paints a background, which is what makes
    /// the window edges grabbable.
    pub(crate) fn draws_background(&self) -> bool {
        self.tree
            .as_ref()
            .and_then(|tree| tree.get(tree.root()?))
            .is_some_and(|root| root.is_draw_background())
    }

    // =========================================================================
    // Input, in window-local coordinates
    // =========================================================================

    pub fn key_down(&mut self, key: Key) -> bool {
        self.keyboard(
            |tree, focused| tree.key_down(focused, key),
            |delegate, tree| delegate.key_down(tree, key),
            UiEventKind::KeyDown,
            UiEventPayload::Key(key),
        )
    }

    pub fn key_up(&mut self, key: Key) -> bool {
        self.keyboard(
            |tree, focused| tree.key_up(focused, key),
            |delegate, tree| delegate.key_up(tree, key),
            UiEventKind::KeyUp,
            UiEventPayload::Key(key),
        )
    }

    pub fn text_input(&mut self, text: &str) -> bool {
        self.keyboard(
            |tree, focused| tree.text_input(focused, text),
            |delegate, tree| delegate.text_input(tree, text),
            UiEventKind::TextInput,
            UiEventPayload::Text(text.to_string()),
        )
    }

    /// Focused widget first, then the delegate, then the bus.
    fn keyboard(
        &mut self,
        widget: impl FnOnce(&mut WidgetTree, WidgetId) -> bool,
        delegate: impl FnOnce(&mut dyn WindowDelegate, &mut WidgetTree) -> bool,
        kind: UiEventKind,
        payload: UiEventPayload,
    ) -> bool {
        if !self.visible {
            return false;
        }
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        let mut consumed = match tree.focused() {
            Some(focused) => widget(tree, focused),
            None => false,
        };
        if !consumed {
            consumed = self.delegate(delegate).unwrap_or(false);
        }
        if !consumed {
            self.emit(kind, payload);
        }
        self.refresh();
        consumed
    }

    pub fn mouse_down(&mut self, button: MouseButton, x: f32, y: f32) -> bool {
        self.pointer(
            |tree, root| tree.mouse_down(root, button, x, y),
            |delegate, tree| delegate.mouse_down(tree, button, x, y),
            UiEventKind::MouseDown,
            UiEventPayload::Pointer {
                button: Some(button),
                position: Point::new(x, y),
            },
        )
    }

    pub fn mouse_up(&mut self, button: MouseButton, x: f32, y: f32) -> bool {
        self.pointer(
            |tree, root| tree.mouse_up(root, button, x, y),
            |delegate, tree| delegate.mouse_up(tree, button, x, y),
            UiEventKind::MouseUp,
            UiEventPayload::Pointer {
                button: Some(button),
                position: Point::new(x, y),
            },
        )
    }

    /// Pointer motion goes to the focused widget when it tracks moves while
    /// focused, to the root otherwise. Only consumed moves redraw.
    pub fn mouse_move(&mut self, buttons: MouseButtons, x: f32, y: f32) -> bool {
        if !self.visible {
            return false;
        }
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        let target = tree
            .focused()
            .filter(|focused| tree.get(*focused).is_some_and(|base| base.mouse_move_on_focus()))
            .or_else(|| tree.root());
        let mut consumed = target.is_some_and(|target| tree.mouse_move(target, buttons, x, y));
        if !consumed {
            consumed = self
                .delegate(|delegate, tree| delegate.mouse_move(tree, buttons, x, y))
                .unwrap_or(false);
        }
        if consumed {
            self.refresh();
        } else {
            self.emit(
                UiEventKind::MouseMove,
                UiEventPayload::Pointer {
                    button: None,
                    position: Point::new(x, y),
                },
            );
        }
        consumed
    }

    fn pointer(
        &mut self,
        widget: impl FnOnce(&mut WidgetTree, WidgetId) -> bool,
        delegate: impl FnOnce(&mut dyn WindowDelegate, &mut WidgetTree) -> bool,
        kind: UiEventKind,
        payload: UiEventPayload,
    ) -> bool {
        if !self.visible {
            return false;
        }
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        let mut consumed = tree.root().is_some_and(|root| widget(tree, root));
        if !consumed {
            consumed = self.delegate(delegate).unwrap_or(false);
        }
        if !consumed {
            self.emit(kind, payload);
        }
        self.refresh();
        consumed
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn delegate<R>(
        &mut self,
        f: impl FnOnce(&mut dyn WindowDelegate, &mut WidgetTree) -> R,
    ) -> Option<R> {
        match (self.delegate.as_deref_mut(), self.tree.as_mut()) {
            (Some(delegate), Some(tree)) => Some(f(delegate, tree)),
            _ => None,
        }
    }

    fn emit(&self, kind: UiEventKind, payload: UiEventPayload) {
        if let Some(tree) = &self.tree {
            tree.bus().push(UiEvent::window(kind, self.id).with_payload(payload));
        }
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("rect", &self.rect)
            .field("visible", &self.visible)
            .field("pending_visible", &self.pending_visible)
            .field("attached", &self.tree.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use horizon_trellis_core::{EventBus, EventFilter};

    use super::*;
    use crate::render::FixedFont;
    use crate::style;
    use crate::widget::Alignment;
    use crate::widget::widgets::{Button, TextEdit};
    use crate::window::RedrawFlag;

    fn env(bus: &Arc<EventBus>) -> TreeEnv {
        TreeEnv {
            window: WindowId::next(),
            window_visible: false,
            font: FixedFont::default().shared(),
            font_scale: 1.0,
            text_color: horizon_trellis_core::Color::WHITE,
            aspect_ratio: 1.0,
            style: style::create("vector").unwrap(),
            bus: Arc::clone(bus),
            redraw: RedrawFlag::default(),
        }
    }

    fn attached(window: Window) -> (Window, Arc<EventBus>) {
        let bus = Arc::new(EventBus::new());
        let mut window = window;
        window.attach(env(&bus));
        window.notify_create();
        (window, bus)
    }

    fn window_events(bus: &EventBus, window: &Window) -> Vec<UiEventKind> {
        bus.drain()
            .into_iter()
            .filter(|event| event.window_id() == Some(window.id()))
            .map(|event| event.kind)
            .collect()
    }

    struct Builder;

    impl WindowDelegate for Builder {
        fn on_create(&mut self, tree: &mut WidgetTree) {
            if let Some(root) = tree.root() {
                tree.add(root, Button::new(), Alignment::Center, "40,20,RAISED");
            }
        }

        fn key_down(&mut self, _tree: &mut WidgetTree, key: Key) -> bool {
            key == Key::Escape
        }
    }

    #[test]
    fn test_attach_creates_root_sized_to_window() {
        let (window, bus) = attached(Window::new(Rect::new(10.0, 10.0, 200.0, 100.0)));
        let root = window.root().unwrap();
        assert_eq!(window.tree().get(root).unwrap().rect(), Rect::new(0.0, 0.0, 200.0, 100.0));
        assert!(window.style().is_some());
        assert_eq!(window_events(&bus, &window), vec![UiEventKind::Create]);
    }

    #[test]
    #[should_panic(expected = "already attached")]
    fn test_attach_twice_panics() {
        let (mut window, bus) = attached(Window::new(Rect::new(0.0, 0.0, 10.0, 10.0)));
        window.attach(env(&bus));
    }

    #[test]
    #[should_panic(expected = "not attached")]
    fn test_tree_before_attach_panics() {
        Window::new(Rect::ZERO).tree();
    }

    #[test]
    fn test_delegate_builds_widgets() {
        let (window, _bus) =
            attached(Window::new(Rect::new(0.0, 0.0, 200.0, 100.0)).with_delegate(Builder));
        let root = window.root().unwrap();
        let button = window.tree().get(root).unwrap().children()[0];
        assert_eq!(window.tree().get(button).unwrap().rect(), Rect::new(80.0, 40.0, 40.0, 20.0));
    }

    #[test]
    fn test_set_rect_clamps_and_relayouts() {
        let (mut window, bus) = attached(
            Window::new(Rect::new(0.0, 0.0, 200.0, 100.0)).with_min_size(50.0, 50.0),
        );
        bus.clear();
        window.set_rect(Rect::new(5.0, 0.0, 20.0, 300.0));
        assert_eq!(window.rect(), Rect::new(5.0, 0.0, 50.0, 300.0));
        let root = window.root().unwrap();
        assert_eq!(window.tree().get(root).unwrap().size(), Size::new(50.0, 300.0));
        assert_eq!(
            window_events(&bus, &window),
            vec![UiEventKind::Resize, UiEventKind::Move]
        );
    }

    #[test]
    fn test_keyboard_falls_back_to_delegate_then_bus() {
        let (mut window, bus) =
            attached(Window::new(Rect::new(0.0, 0.0, 200.0, 100.0)).with_delegate(Builder));
        assert!(!window.key_down(Key::Escape), "hidden windows ignore input");

        window.show();
        bus.clear();
        assert!(window.key_down(Key::Escape));
        assert!(!window.key_down(Key::Char('a')));
        assert_eq!(window_events(&bus, &window), vec![UiEventKind::KeyDown]);
    }

    #[test]
    fn test_focused_widget_takes_text() {
        let (mut window, _bus) = attached(Window::new(Rect::new(0.0, 0.0, 200.0, 100.0)));
        window.show();
        let tree = window.tree_mut();
        let root = tree.root().unwrap();
        let edit = tree.add(root, TextEdit::new(""), Alignment::Fill, "");
        tree.set_focus(edit);

        assert!(window.text_input("hi"));
        assert_eq!(window.tree().text(edit).as_deref(), Some("hi"));
    }

    #[test]
    fn test_destroy_notifies_widgets_then_window() {
        let (mut window, bus) = attached(Window::new(Rect::new(0.0, 0.0, 200.0, 100.0)));
        let root = window.root().unwrap();
        let destroyed = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&destroyed);
        bus.subscribe(EventFilter::kind(UiEventKind::Destroy), move |event| {
            sink.lock().push((event.widget_id(), event.window_id()));
        });

        window.destroy();
        window.destroy();
        assert!(!window.is_attached());
        assert_eq!(
            *destroyed.lock(),
            vec![(Some(root), None), (None, Some(window.id()))]
        );
    }

    #[test]
    fn test_resize_borders() {
        let borders = ResizeBorders::LEFT | ResizeBorders::TOP;
        assert!(borders.allows(ResizeEdge::Left));
        assert!(!borders.allows(ResizeEdge::Right));
        assert!(ResizeBorders::ALL.contains(borders));
        assert!(ResizeBorders::NONE.is_empty());
    }
}

//! The window manager: window ownership, composition and input routing.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use horizon_trellis_core::logging::{span_names, targets};
use horizon_trellis_core::{
    EventBus, InputEvent, MouseButton, MouseButtons, Point, Result, TrellisError, WindowId,
};

use super::resize::ResizeGesture;
use super::{CursorShape, ManagerConfig, RedrawFlag, ResizeEdge, Window};
use crate::context::Context;
use crate::render::{Font, Renderer};
use crate::style::{self, Style};
use crate::widget::TreeEnv;

/// Everything guarded by the window-list lock.
#[derive(Default)]
struct ManagerState {
    /// Back to front: the last window is the topmost.
    windows: Vec<Window>,
    focused: Option<WindowId>,
    gesture: ResizeGesture,
    cursor: CursorShape,
}

impl ManagerState {
    fn index_of(&self, id: WindowId) -> Option<usize> {
        self.windows.iter().position(|window| window.id() == id)
    }

    fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|window| window.id() == id)
    }

    /// Move the process focus, notifying the old window first.
    fn focus(&mut self, id: Option<WindowId>) {
        if self.focused == id {
            return;
        }
        if let Some(previous) = self.focused.and_then(|previous| self.window_mut(previous)) {
            previous.lost_focus();
        }
        self.focused = id;
        if let Some(window) = id.and_then(|id| self.window_mut(id)) {
            window.got_focus();
        }
        tracing::debug!(target: targets::MANAGER, window = ?id, "window focus changed");
    }

    /// The topmost visible window other than `except`.
    fn topmost_visible_except(&self, except: WindowId) -> Option<WindowId> {
        self.windows
            .iter()
            .rev()
            .find(|window| window.id() != except && window.is_visible())
            .map(Window::id)
    }

    /// The topmost visible window containing the screen point.
    fn hit(&self, x: f32, y: f32) -> Option<usize> {
        self.windows
            .iter()
            .rposition(|window| window.is_visible() && window.rect().contains(x, y))
    }
}

/// Owns every window, composes them and routes raw input.
///
/// All methods take `&self`; the window list sits behind a single lock.
/// Bus listeners run while that lock is held and must not call back into
/// the manager.
///
/// # Example
///
/// ```ignore
/// use horizon_trellis::{Context, render::{FixedFont, RecordingRenderer}};
/// use horizon_trellis::window::{ManagerConfig, Window, WindowManager};
///
/// let context = Context::new();
/// let manager = WindowManager::new(
///     &context,
///     RecordingRenderer::new(),
///     FixedFont::default().shared(),
///     ManagerConfig::default(),
/// )?;
/// let id = manager.add(Window::new(Rect::new(0.0, 0.0, 320.0, 200.0)).with_visible(true));
///
/// loop {
///     for event in backend_events() {
///         manager.handle_input(&event);
///     }
///     manager.tick();
/// }
/// ```
pub struct WindowManager {
    bus: Arc<EventBus>,
    config: ManagerConfig,
    style: Arc<dyn Style>,
    font: Font,
    state: Mutex<ManagerState>,
    /// Windows to destroy on the next tick; separate so removal never waits
    /// on the window-list lock.
    removed: Mutex<Vec<WindowId>>,
    renderer: Mutex<Box<dyn Renderer>>,
    redraw: RedrawFlag,
    pointer_hidden: AtomicBool,
}

impl WindowManager {
    /// Create a manager drawing into `renderer`.
    ///
    /// # Errors
    ///
    /// Fails with [`TrellisError::StyleNotFound`] when the configured style
    /// does not exist.
    pub fn new(
        context: &Context,
        renderer: impl Renderer + 'static,
        font: Font,
        config: ManagerConfig,
    ) -> Result<Self> {
        let style = style::create(&config.style)?;
        tracing::debug!(target: targets::MANAGER, style = %config.style, "window manager created");
        Ok(Self {
            bus: Arc::clone(context.bus()),
            config,
            style,
            font,
            state: Mutex::new(ManagerState::default()),
            removed: Mutex::new(Vec::new()),
            renderer: Mutex::new(Box::new(renderer)),
            redraw: RedrawFlag::default(),
            pointer_hidden: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Style given to windows that do not bring their own.
    pub fn default_style(&self) -> &Arc<dyn Style> {
        &self.style
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Attach a window and put it on top of the others.
    ///
    /// The window's widgets are created right away and `Create` is fired; a
    /// window built visible is shown immediately.
    ///
    /// # Panics
    ///
    /// Panics if the window is already attached.
    pub fn add(&self, mut window: Window) -> WindowId {
        let aspect_ratio = self.renderer.lock().aspect_ratio();
        window.attach(TreeEnv {
            window: window.id(),
            window_visible: window.is_visible(),
            font: Arc::clone(&self.font),
            font_scale: self.config.font_scale,
            text_color: self.config.text_color,
            aspect_ratio,
            style: Arc::clone(&self.style),
            bus: Arc::clone(&self.bus),
            redraw: self.redraw.clone(),
        });

        let id = window.id();
        let mut state = self.state.lock();
        state.windows.push(window);
        if let Some(window) = state.windows.last_mut() {
            window.notify_create();
            if window.is_visible() {
                window.show();
            }
        }
        self.redraw.request();
        tracing::debug!(target: targets::MANAGER, window = %id, "window added");
        id
    }

    /// Schedule a window for destruction on the next tick.
    ///
    /// Removing a window twice, or one that is already gone, is harmless.
    pub fn remove(&self, id: WindowId) {
        let mut removed = self.removed.lock();
        if !removed.contains(&id) {
            removed.push(id);
        }
    }

    /// Run `f` on a window.
    ///
    /// # Errors
    ///
    /// Fails with [`TrellisError::WindowNotFound`] for unknown windows.
    pub fn with_window<R>(&self, id: WindowId, f: impl FnOnce(&mut Window) -> R) -> Result<R> {
        let mut state = self.state.lock();
        match state.window_mut(id) {
            Some(window) => Ok(f(window)),
            None => Err(TrellisError::WindowNotFound(id)),
        }
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.state.lock().index_of(id).is_some()
    }

    /// Window ids, back to front.
    pub fn window_ids(&self) -> Vec<WindowId> {
        self.state.lock().windows.iter().map(Window::id).collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().windows.is_empty()
    }

    /// The window receiving keyboard input.
    pub fn focused_window(&self) -> Option<WindowId> {
        self.state.lock().focused
    }

    /// The cursor the embedder should display.
    pub fn cursor(&self) -> CursorShape {
        self.state.lock().cursor
    }

    /// Whether a resize drag is in progress.
    pub fn is_resizing(&self) -> bool {
        self.state.lock().gesture.is_active()
    }

    /// Stop routing pointer events, for example while the embedder hides
    /// the pointer.
    pub fn set_pointer_hidden(&self, hidden: bool) {
        self.pointer_hidden.store(hidden, Ordering::Relaxed);
    }

    pub fn is_pointer_hidden(&self) -> bool {
        self.pointer_hidden.load(Ordering::Relaxed)
    }

    /// Request a full redraw on the next tick.
    pub fn refresh(&self) {
        self.redraw.request();
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw.is_set()
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Apply pending removals and visibility changes, then redraw every
    /// visible window back to front if anything changed.
    ///
    /// Returns whether a frame was drawn.
    pub fn tick(&self) -> bool {
        let _span = tracing::trace_span!(span_names::FRAME, "tick").entered();
        let removed = std::mem::take(&mut *self.removed.lock());
        let mut state = self.state.lock();

        for id in removed {
            let Some(index) = state.index_of(id) else {
                tracing::debug!(target: targets::MANAGER, window = %id, "removed window is already gone");
                continue;
            };
            if state.windows[index].is_visible() {
                self.apply_visibility(&mut state, index, false);
            }
            let mut window = state.windows.remove(index);
            window.destroy();
            if state.gesture.candidate().is_some_and(|(target, _)| target == id) {
                state.gesture.clear();
                state.cursor = CursorShape::Arrow;
            }
            self.redraw.request();
            tracing::debug!(target: targets::MANAGER, window = %id, "window removed");
        }

        for index in 0..state.windows.len() {
            let Some(visible) = state.windows[index].take_pending_visibility() else {
                continue;
            };
            if visible != state.windows[index].is_visible() {
                self.apply_visibility(&mut state, index, visible);
            }
        }

        if !self.redraw.take() {
            return false;
        }
        let mut renderer = self.renderer.lock();
        renderer.restart();
        for window in state.windows.iter().filter(|window| window.is_visible()) {
            window.paint(renderer.as_mut());
        }
        true
    }

    /// Show or hide the window at `index`, moving the process focus with it.
    fn apply_visibility(&self, state: &mut ManagerState, index: usize, visible: bool) {
        let id = state.windows[index].id();
        if visible {
            state.focus(Some(id));
            state.windows[index].show();
        } else {
            if state.focused == Some(id) {
                let next = state.topmost_visible_except(id);
                state.focus(next);
            }
            state.windows[index].hide();
        }
        tracing::debug!(target: targets::MANAGER, window = %id, visible, "visibility applied");
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Route one raw input event. Returns whether it was consumed.
    pub fn handle_input(&self, event: &InputEvent) -> bool {
        let _span = tracing::trace_span!(span_names::INPUT).entered();
        if event.is_pointer() && self.is_pointer_hidden() {
            return false;
        }
        let mut state = self.state.lock();
        let [scale_x, scale_y] = self.config.input_scale;

        match event {
            InputEvent::Key { key, pressed } => {
                let Some(window) = Self::focused_window_mut(&mut state) else {
                    return false;
                };
                if *pressed {
                    window.key_down(*key)
                } else {
                    window.key_up(*key)
                }
            }
            InputEvent::Text(text) => match Self::focused_window_mut(&mut state) {
                Some(window) => window.text_input(text),
                None => false,
            },
            InputEvent::MouseMotion { buttons, position } => {
                self.mouse_move(&mut state, *buttons, position.x * scale_x, position.y * scale_y)
            }
            InputEvent::MouseButton {
                button,
                pressed,
                position,
            } => self.mouse_button(
                &mut state,
                *button,
                *pressed,
                position.x * scale_x,
                position.y * scale_y,
            ),
        }
    }

    fn focused_window_mut(state: &mut ManagerState) -> Option<&mut Window> {
        let focused = state.focused?;
        state.window_mut(focused).filter(|window| window.is_visible())
    }

    fn local(window: &Window, x: f32, y: f32) -> (f32, f32) {
        let rect = window.rect();
        ((x - rect.x).ceil(), (y - rect.y).ceil())
    }

    fn mouse_move(&self, state: &mut ManagerState, buttons: MouseButtons, x: f32, y: f32) -> bool {
        if state.gesture.is_active() {
            let Some(index) = state.gesture.candidate().and_then(|(target, _)| state.index_of(target))
            else {
                return true;
            };
            let window = &state.windows[index];
            let resized = state
                .gesture
                .resized(Point::new(x, y), |size| window.clamp_size(size));
            if let Some((_, rect)) = resized {
                state.windows[index].set_rect(rect);
            }
            return true;
        }

        if state.gesture.candidate().is_some() {
            state.gesture.clear();
            state.cursor = CursorShape::Arrow;
        }

        let Some(index) = state.hit(x, y) else {
            return false;
        };
        let threshold = self.config.resize_threshold;
        let window = &mut state.windows[index];
        let (lx, ly) = Self::local(window, x, y);

        if self.config.enable_window_resizing && window.draws_background() {
            let borders = window.resize_borders();
            let edge = ResizeEdge::detect(lx, ly, window.rect().size(), threshold, |edge| {
                borders.allows(edge)
            });
            if let Some(edge) = edge {
                let id = window.id();
                state.gesture.arm(id, edge);
                state.cursor = edge.cursor();
                tracing::trace!(target: targets::MANAGER, window = %id, ?edge, "resize edge armed");
                return true;
            }
        }
        window.mouse_move(buttons, lx, ly)
    }

    fn mouse_button(
        &self,
        state: &mut ManagerState,
        button: MouseButton,
        pressed: bool,
        x: f32,
        y: f32,
    ) -> bool {
        if let Some((target, _)) = state.gesture.candidate() {
            if button == MouseButton::Left {
                if pressed {
                    if let Some(rect) = state.window_mut(target).map(|window| window.rect()) {
                        state.gesture.begin(Point::new(x, y), rect);
                    }
                } else {
                    state.gesture.clear();
                    state.cursor = CursorShape::Arrow;
                }
            }
            return true;
        }

        if pressed {
            let Some(index) = state.hit(x, y) else {
                return false;
            };
            let id = state.windows[index].id();
            state.focus(Some(id));
            let window = &mut state.windows[index];
            let (lx, ly) = Self::local(window, x, y);
            return window.mouse_down(button, lx, ly);
        }

        // Releases reach every window so pushed widgets are always released.
        for window in state.windows.iter_mut().rev() {
            let (lx, ly) = Self::local(window, x, y);
            if window.mouse_up(button, lx, ly) {
                return true;
            }
        }
        false
    }
}

impl Drop for WindowManager {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        for window in &mut state.windows {
            window.destroy();
        }
        state.windows.clear();
    }
}

impl fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("WindowManager")
            .field("windows", &state.windows)
            .field("focused", &state.focused)
            .field("cursor", &state.cursor)
            .field("style", &self.style.name())
            .finish_non_exhaustive()
    }
}

//! The UI notification bus.
//!
//! Widgets and windows report what happened to them (created, shown, clicked,
//! value changed, ...) by pushing a [`UiEvent`] onto an [`EventBus`]. The bus
//! delivers each event synchronously to matching listeners and also keeps it
//! in an ordered queue that the application can [`drain`](EventBus::drain).
//!
//! Emission order is preserved: listeners observe events in the order they
//! were pushed, and `drain` returns them in the same order.
//!
//! # Example
//!
//! ```
//! use horizon_trellis_core::{EventBus, EventFilter, UiEvent, UiEventKind, WindowId};
//!
//! let bus = EventBus::new();
//! let window = WindowId::next();
//! let id = bus.subscribe(EventFilter::kind(UiEventKind::Show), |event| {
//!     println!("shown: {:?}", event.source);
//! });
//!
//! bus.push(UiEvent::window(UiEventKind::Show, window));
//! assert_eq!(bus.drain().len(), 1);
//! bus.unsubscribe(id);
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::geometry::{Point, Size};
use crate::id::{WidgetId, WindowId};
use crate::input::{Key, MouseButton};
use crate::logging::targets;

new_key_type! {
    /// Identifies a listener registered with [`EventBus::subscribe`].
    pub struct ListenerId;
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiEventKind {
    Create,
    Destroy,
    Show,
    Hide,
    Enable,
    Disable,
    Resize,
    Move,
    GotFocus,
    LostFocus,
    Click,
    ValueChange,
    RangeChange,
    StateChange,
    TextChange,
    KeyDown,
    KeyUp,
    TextInput,
    MouseDown,
    MouseUp,
    MouseMove,
}

/// Two-state value of a check or toggle widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckState {
    Checked,
    #[default]
    Unchecked,
}

impl CheckState {
    /// The opposite state.
    pub fn toggled(self) -> Self {
        match self {
            Self::Checked => Self::Unchecked,
            Self::Unchecked => Self::Checked,
        }
    }

    pub fn is_checked(self) -> bool {
        self == Self::Checked
    }
}

/// Extra data attached to a notification.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiEventPayload {
    #[default]
    None,
    Value(f32),
    Range { min: f32, max: f32 },
    State(CheckState),
    Text(String),
    Key(Key),
    Pointer {
        button: Option<MouseButton>,
        position: Point,
    },
    Size(Size),
    Position(Point),
}

/// The widget or window that emitted a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    Widget(WidgetId),
    Window(WindowId),
}

/// A typed UI notification.
#[derive(Debug, Clone, PartialEq)]
pub struct UiEvent {
    pub kind: UiEventKind,
    pub source: EventSource,
    pub payload: UiEventPayload,
}

impl UiEvent {
    /// A payload-less notification from a widget.
    pub fn widget(kind: UiEventKind, id: WidgetId) -> Self {
        Self {
            kind,
            source: EventSource::Widget(id),
            payload: UiEventPayload::None,
        }
    }

    /// A payload-less notification from a window.
    pub fn window(kind: UiEventKind, id: WindowId) -> Self {
        Self {
            kind,
            source: EventSource::Window(id),
            payload: UiEventPayload::None,
        }
    }

    /// Attach a payload.
    pub fn with_payload(mut self, payload: UiEventPayload) -> Self {
        self.payload = payload;
        self
    }

    /// The source widget, if the event came from a widget.
    pub fn widget_id(&self) -> Option<WidgetId> {
        match self.source {
            EventSource::Widget(id) => Some(id),
            EventSource::Window(_) => None,
        }
    }

    /// The source window, if the event came from a window.
    pub fn window_id(&self) -> Option<WindowId> {
        match self.source {
            EventSource::Window(id) => Some(id),
            EventSource::Widget(_) => None,
        }
    }
}

/// Selects which events a listener receives.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    kinds: Option<Vec<UiEventKind>>,
    source: Option<EventSource>,
}

impl EventFilter {
    /// Match every event.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match a single event kind.
    pub fn kind(kind: UiEventKind) -> Self {
        Self {
            kinds: Some(vec![kind]),
            source: None,
        }
    }

    /// Match any of the given kinds.
    pub fn kinds(kinds: impl IntoIterator<Item = UiEventKind>) -> Self {
        Self {
            kinds: Some(kinds.into_iter().collect()),
            source: None,
        }
    }

    /// Restrict to events from one source.
    pub fn from_source(mut self, source: EventSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn matches(&self, event: &UiEvent) -> bool {
        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&event.kind) {
                return false;
            }
        }
        match self.source {
            Some(source) => source == event.source,
            None => true,
        }
    }
}

struct Listener {
    filter: EventFilter,
    callback: Arc<dyn Fn(&UiEvent) + Send + Sync>,
}

/// An ordered, thread-safe notification bus.
///
/// Listeners are invoked outside the bus locks, so a listener may push further
/// events or (un)subscribe without deadlocking. Events pushed from inside a
/// listener are delivered after the current one.
pub struct EventBus {
    queue: Mutex<VecDeque<UiEvent>>,
    listeners: Mutex<SlotMap<ListenerId, Listener>>,
    blocked: AtomicBool,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            listeners: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Register a listener for events matching `filter`.
    pub fn subscribe<F>(&self, filter: EventFilter, callback: F) -> ListenerId
    where
        F: Fn(&UiEvent) + Send + Sync + 'static,
    {
        self.listeners.lock().insert(Listener {
            filter,
            callback: Arc::new(callback),
        })
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.lock().remove(id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Suppress all notifications while `blocked` is true.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Publish an event.
    pub fn push(&self, event: UiEvent) {
        if self.is_blocked() {
            tracing::trace!(target: targets::EVENTS, kind = ?event.kind, "bus blocked, dropping event");
            return;
        }
        tracing::trace!(target: targets::EVENTS, kind = ?event.kind, source = ?event.source, "ui event");

        let callbacks: Vec<_> = self
            .listeners
            .lock()
            .values()
            .filter(|listener| listener.filter.matches(&event))
            .map(|listener| listener.callback.clone())
            .collect();

        self.queue.lock().push_back(event.clone());

        for callback in callbacks {
            callback(&event);
        }
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<UiEvent> {
        self.queue.lock().drain(..).collect()
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Discard queued events without returning them.
    pub fn clear(&self) {
        self.queue.lock().clear();
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("queued", &self.len())
            .field("listeners", &self.listener_count())
            .field("blocked", &self.is_blocked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_drain_preserves_order() {
        let bus = EventBus::new();
        let window = WindowId::next();
        bus.push(UiEvent::window(UiEventKind::Create, window));
        bus.push(UiEvent::window(UiEventKind::Show, window));
        bus.push(UiEvent::window(UiEventKind::Hide, window));

        let kinds: Vec<_> = bus.drain().into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![UiEventKind::Create, UiEventKind::Show, UiEventKind::Hide]
        );
        assert!(bus.is_empty());
    }

    #[test]
    fn test_filtered_listener() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        let window = WindowId::next();
        let other = WindowId::next();

        bus.subscribe(
            EventFilter::kind(UiEventKind::Show).from_source(EventSource::Window(window)),
            move |_| {
                hits_clone.fetch_add(1, Ordering::SeqCst);
            },
        );

        bus.push(UiEvent::window(UiEventKind::Show, window));
        bus.push(UiEvent::window(UiEventKind::Show, other));
        bus.push(UiEvent::window(UiEventKind::Hide, window));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(bus.len(), 3);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::new();
        let id = bus.subscribe(EventFilter::all(), |_| {});
        assert_eq!(bus.listener_count(), 1);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_listener_may_push() {
        let bus = Arc::new(EventBus::new());
        let window = WindowId::next();
        let inner = bus.clone();
        bus.subscribe(EventFilter::kind(UiEventKind::Click), move |event| {
            if let Some(id) = event.window_id() {
                inner.push(UiEvent::window(UiEventKind::StateChange, id));
            }
        });

        bus.push(UiEvent::window(UiEventKind::Click, window));
        let kinds: Vec<_> = bus.drain().into_iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![UiEventKind::Click, UiEventKind::StateChange]);
    }

    #[test]
    fn test_blocked_bus_drops_events() {
        let bus = EventBus::new();
        bus.set_blocked(true);
        bus.push(UiEvent::window(UiEventKind::Show, WindowId::next()));
        assert!(bus.is_empty());
    }

    #[test]
    fn test_check_state_toggle() {
        assert_eq!(CheckState::Unchecked.toggled(), CheckState::Checked);
        assert!(CheckState::Checked.is_checked());
    }
}

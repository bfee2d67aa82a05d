//! The top-level toolkit context.

use std::sync::Arc;

use horizon_trellis_core::EventBus;

/// Owns the notification bus shared by every window manager built from it.
///
/// There is no global instance: create one context per toolkit instance
/// and pass it to [`WindowManager::new`](crate::window::WindowManager::new).
///
/// ```ignore
/// use horizon_trellis::Context;
/// use horizon_trellis_core::{EventFilter, UiEventKind};
///
/// let context = Context::new();
/// context.bus().subscribe(EventFilter::kind(UiEventKind::Click), |event| {
///     tracing::info!(source = ?event.source, "clicked");
/// });
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    bus: Arc<EventBus>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context around an existing bus.
    pub fn with_bus(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }
}

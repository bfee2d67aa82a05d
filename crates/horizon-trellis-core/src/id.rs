//! Identifiers for widgets and windows.
//!
//! Widget ids are arena keys: they are allocated by the widget tree that owns
//! the node and become stale once the node is destroyed. Window ids are
//! process-unique counters assigned at window construction, before the window
//! is attached to any manager.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::new_key_type;

new_key_type! {
    /// A unique identifier for a widget inside its window's widget tree.
    ///
    /// Child-to-parent links and the window's focused-widget pointer are
    /// stored as `WidgetId`s, never as owning references.
    pub struct WidgetId;
}

/// A unique identifier for a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

static NEXT_WINDOW_ID: AtomicU64 = AtomicU64::new(1);

impl WindowId {
    /// Allocate a fresh window id.
    pub fn next() -> Self {
        Self(NEXT_WINDOW_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value of this id.
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_ids_are_unique() {
        let a = WindowId::next();
        let b = WindowId::next();
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
    }
}

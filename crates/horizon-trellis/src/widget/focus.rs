//! Keyboard focus within a window.
//!
//! A window has at most one focused widget. Giving focus to a widget first
//! takes it from the previous one, so `LostFocus` always precedes
//! `GotFocus`.

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{Result, TrellisError, UiEventKind, UiEventPayload, WidgetId};

use super::WidgetTree;

impl WidgetTree {
    /// The widget receiving keyboard input.
    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    /// Give focus to `id`, or to the first descendant that accepts it.
    ///
    /// Returns the widget that holds the focus afterwards, `None` when the
    /// widget is disabled or nothing in its subtree accepts focus.
    pub fn set_focus(&mut self, id: WidgetId) -> Option<WidgetId> {
        let base = self.get(id)?;
        if !base.is_enabled() {
            return None;
        }
        if !base.allows_focus() {
            return self
                .children_of(id)
                .into_iter()
                .find_map(|child| self.set_focus(child));
        }
        if !base.is_focused() {
            if let Some(base) = self.get_mut(id) {
                base.focused = true;
            }
            self.refresh(id);
            self.set_focused_widget(id);
            tracing::debug!(target: targets::FOCUS, widget = ?id, "focus gained");
            self.emit(id, UiEventKind::GotFocus, UiEventPayload::None);
        }
        Some(id)
    }

    /// Take the focus away from `id`. Works on disabled widgets too.
    pub fn clear_focus(&mut self, id: WidgetId) {
        let Some(base) = self.get_mut(id) else {
            return;
        };
        if !base.focused {
            return;
        }
        base.focused = false;
        if self.focused == Some(id) {
            self.focused = None;
        }
        tracing::debug!(target: targets::FOCUS, widget = ?id, "focus lost");
        self.emit(id, UiEventKind::LostFocus, UiEventPayload::None);
        self.refresh(id);
    }

    fn set_focused_widget(&mut self, id: WidgetId) {
        if let Some(previous) = self.focused.replace(id) {
            if previous != id {
                self.clear_focus(previous);
            }
        }
    }

    /// Move the focus away from `id`: drop it when `id` has it, otherwise try
    /// to focus `id`.
    ///
    /// Traversal to the following sibling is not supported and fails with
    /// [`TrellisError::Unimplemented`] once the widget has a parent.
    pub fn focus_next(&mut self, id: WidgetId) -> Result<Option<WidgetId>> {
        let base = self.get(id).ok_or(TrellisError::WidgetNotFound(id))?;
        let has_parent = base.parent().is_some();
        if base.is_focused() {
            self.clear_focus(id);
        } else if let Some(focused) = self.set_focus(id) {
            return Ok(Some(focused));
        }
        if !has_parent {
            return Ok(None);
        }
        tracing::warn!(target: targets::FOCUS, widget = ?id, "focus traversal to siblings is not implemented");
        Err(TrellisError::Unimplemented("focus traversal to the next sibling"))
    }
}

//! Input dispatch through the widget tree.
//!
//! The public entry points (`mouse_down`, `key_up`, ...) run the widget's
//! own hook; hooks that are not overridden fall back to the `default_*`
//! handlers below. Pointer events travel to every child under the pointer
//! before the parent handles them itself. A consumed result is reported
//! upwards but never stops sibling dispatch. Disabled widgets reject every
//! event without recursing.

use horizon_trellis_core::logging::span_names;
use horizon_trellis_core::{
    Key, MouseButton, MouseButtons, Point, UiEventKind, UiEventPayload, WidgetId,
};

use super::{Widget, WidgetTree};

impl WidgetTree {
    fn dispatch(
        &mut self,
        id: WidgetId,
        hook: impl FnOnce(&mut dyn Widget, &mut WidgetTree) -> bool,
        fallback: impl FnOnce(&mut WidgetTree) -> bool,
    ) -> bool {
        // Disabled widgets reject input before any override sees it.
        if !self.get(id).is_some_and(|base| base.enabled) {
            return false;
        }
        self.begin_pass();
        let consumed = match self.with_behavior(id, hook) {
            Some(consumed) => consumed,
            None => fallback(self),
        };
        self.end_pass();
        consumed
    }

    pub fn mouse_down(&mut self, id: WidgetId, button: MouseButton, x: f32, y: f32) -> bool {
        let _span = tracing::trace_span!(span_names::DISPATCH, widget = ?id, "mouse_down").entered();
        self.dispatch(
            id,
            |widget, tree| widget.mouse_down(tree, id, button, x, y),
            |tree| tree.default_mouse_down(id, button, x, y),
        )
    }

    pub fn mouse_up(&mut self, id: WidgetId, button: MouseButton, x: f32, y: f32) -> bool {
        self.dispatch(
            id,
            |widget, tree| widget.mouse_up(tree, id, button, x, y),
            |tree| tree.default_mouse_up(id, button, x, y),
        )
    }

    pub fn mouse_move(&mut self, id: WidgetId, buttons: MouseButtons, x: f32, y: f32) -> bool {
        self.dispatch(
            id,
            |widget, tree| widget.mouse_move(tree, id, buttons, x, y),
            |tree| tree.default_mouse_move(id, buttons, x, y),
        )
    }

    pub fn key_down(&mut self, id: WidgetId, key: Key) -> bool {
        self.dispatch(
            id,
            |widget, tree| widget.key_down(tree, id, key),
            |tree| tree.default_key_down(id, key),
        )
    }

    pub fn key_up(&mut self, id: WidgetId, key: Key) -> bool {
        self.dispatch(
            id,
            |widget, tree| widget.key_up(tree, id, key),
            |tree| tree.default_key_up(id, key),
        )
    }

    pub fn text_input(&mut self, id: WidgetId, text: &str) -> bool {
        self.dispatch(
            id,
            |widget, tree| widget.text_input(tree, id, text),
            |tree| tree.default_text_input(id, text),
        )
    }

    fn pointer_payload(button: Option<MouseButton>, x: f32, y: f32) -> UiEventPayload {
        UiEventPayload::Pointer {
            button,
            position: Point::new(x, y),
        }
    }

    // =========================================================================
    // Default Handlers
    // =========================================================================

    /// Press: mark pushed, forward to the children under the pointer and
    /// focus the last one hit when it accepts focus.
    pub fn default_mouse_down(&mut self, id: WidgetId, button: MouseButton, x: f32, y: f32) -> bool {
        let Some(base) = self.get_mut(id) else {
            return false;
        };
        if !base.enabled {
            return false;
        }
        base.pushed = true;
        let redraw = base.redraws_on_mouse_event();
        if redraw {
            self.resize_children(id);
        }

        let mut consumed = false;
        let mut hit = None;
        for child in self.children_of(id) {
            let Some(rect) = self.get(child).map(|base| base.rect()) else {
                continue;
            };
            if rect.contains(x, y) {
                consumed = true;
                self.mouse_down(child, button, x, y);
                hit = Some(child);
                if self.get(child).is_some_and(|base| base.redraws_on_mouse_event()) {
                    self.refresh(child);
                }
            }
        }
        if let Some(child) = hit {
            if self.get(child).is_some_and(|base| base.allows_focus()) {
                self.set_focus(child);
            }
        }
        if redraw {
            self.refresh(id);
        }
        self.emit(id, UiEventKind::MouseDown, Self::pointer_payload(Some(button), x, y));
        consumed
    }

    /// Release: clear pushed and forward to the children under the pointer
    /// or still pushed.
    pub fn default_mouse_up(&mut self, id: WidgetId, button: MouseButton, x: f32, y: f32) -> bool {
        let Some(base) = self.get_mut(id) else {
            return false;
        };
        if !base.enabled {
            return false;
        }
        base.pushed = false;
        let redraw = base.redraws_on_mouse_event();
        if redraw {
            self.resize_children(id);
        }

        let mut consumed = false;
        for child in self.children_of(id) {
            let hit = self
                .get(child)
                .is_some_and(|base| base.rect().contains(x, y) || base.is_pushed());
            if hit {
                consumed = true;
                self.mouse_up(child, button, x, y);
                if self.get(child).is_some_and(|base| base.redraws_on_mouse_event()) {
                    self.refresh(child);
                }
            }
        }
        if redraw {
            self.refresh(id);
        }
        self.emit(id, UiEventKind::MouseUp, Self::pointer_payload(Some(button), x, y));
        consumed
    }

    /// Motion: track which children are pointed and forward to them.
    pub fn default_mouse_move(&mut self, id: WidgetId, buttons: MouseButtons, x: f32, y: f32) -> bool {
        if !self.get(id).is_some_and(|base| base.enabled) {
            return false;
        }
        let mut consumed = false;
        for child in self.children_of(id) {
            let Some(base) = self.get_mut(child) else {
                continue;
            };
            let inside = base.rect().contains(x, y);
            let changed = base.pointed != inside;
            base.pointed = inside;
            if changed && base.redraws_on_mouse_move() {
                self.refresh(child);
            }
            if inside {
                self.mouse_move(child, buttons, x, y);
                consumed = true;
            }
        }
        self.emit(id, UiEventKind::MouseMove, Self::pointer_payload(None, x, y));
        consumed
    }

    /// Key press: notify only.
    pub fn default_key_down(&mut self, id: WidgetId, key: Key) -> bool {
        if self.get(id).is_some_and(|base| base.enabled) {
            self.emit(id, UiEventKind::KeyDown, UiEventPayload::Key(key));
        }
        false
    }

    /// Key release: consumed by focused widgets.
    pub fn default_key_up(&mut self, id: WidgetId, key: Key) -> bool {
        match self.get(id) {
            Some(base) if base.enabled && base.focused => {
                self.emit(id, UiEventKind::KeyUp, UiEventPayload::Key(key));
                true
            }
            _ => false,
        }
    }

    pub fn default_text_input(&mut self, id: WidgetId, text: &str) -> bool {
        if self.get(id).is_some_and(|base| base.enabled) {
            self.emit(id, UiEventKind::TextInput, UiEventPayload::Text(text.to_string()));
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use horizon_trellis_core::{Rect, UiEventKind};

    use super::*;
    use crate::widget::Alignment;
    use crate::widget::tree::tests::tree_with_root;
    use crate::widget::widgets::Panel;

    fn receivers(tree: &WidgetTree, kind: UiEventKind) -> Vec<WidgetId> {
        tree.bus()
            .drain()
            .into_iter()
            .filter(|event| event.kind == kind)
            .filter_map(|event| event.widget_id())
            .collect()
    }

    #[test]
    fn test_children_before_parent() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let child = tree.add(root, Panel::new(), Alignment::Fill, "");
        tree.bus().clear();

        assert!(tree.mouse_down(root, MouseButton::Left, 10.0, 10.0));
        assert_eq!(receivers(&tree, UiEventKind::MouseDown), vec![child, root]);
        assert!(tree.get(root).unwrap().is_pushed());
    }

    #[test]
    fn test_press_reaches_one_docked_child_or_every_overlapping_one() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let left = tree.add(root, Panel::new(), Alignment::Left, "50,10");
        tree.add(root, Panel::new(), Alignment::Fill, "");
        tree.bus().clear();
        tree.mouse_down(root, MouseButton::Left, 50.0, 20.0);
        assert_eq!(receivers(&tree, UiEventKind::MouseDown), vec![left, root]);

        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let overlay = tree.add_overlapping(root, Panel::new(), Alignment::Fill, "");
        let fill = tree.add(root, Panel::new(), Alignment::Fill, "");
        tree.bus().clear();
        tree.mouse_down(root, MouseButton::Left, 50.0, 20.0);
        assert_eq!(receivers(&tree, UiEventKind::MouseDown), vec![overlay, fill, root]);
    }

    #[test]
    fn test_miss_is_not_consumed() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        tree.add(root, Panel::new(), Alignment::CornerBottomLeft, "20,20");
        tree.bus().clear();
        assert!(!tree.mouse_down(root, MouseButton::Left, 150.0, 80.0));
        assert_eq!(receivers(&tree, UiEventKind::MouseDown), vec![root]);
    }

    #[test]
    fn test_pushed_child_gets_release_outside() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let child = tree.add(root, Panel::new(), Alignment::CornerBottomLeft, "20,20");
        assert_eq!(tree.get(child).unwrap().rect(), Rect::new(0.0, 0.0, 20.0, 20.0));

        tree.mouse_down(root, MouseButton::Left, 5.0, 5.0);
        tree.bus().clear();
        assert!(tree.mouse_up(root, MouseButton::Left, 150.0, 80.0));
        assert_eq!(receivers(&tree, UiEventKind::MouseUp), vec![child, root]);
        assert!(!tree.get(child).unwrap().is_pushed());
    }

    #[test]
    fn test_disabled_widget_rejects_input() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let child = tree.add(root, Panel::new(), Alignment::Fill, "");
        tree.set_enabled(child, false);
        tree.bus().clear();

        assert!(tree.mouse_down(root, MouseButton::Left, 10.0, 10.0));
        assert_eq!(receivers(&tree, UiEventKind::MouseDown), vec![root]);
        assert!(!tree.get(child).unwrap().is_pushed());
    }

    #[test]
    fn test_mouse_move_tracks_pointed() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let child = tree.add(root, Panel::new(), Alignment::CornerBottomLeft, "20,20");

        assert!(tree.mouse_move(root, MouseButtons::NONE, 5.0, 5.0));
        assert!(tree.get(child).unwrap().is_pointed());
        assert!(!tree.mouse_move(root, MouseButtons::NONE, 50.0, 50.0));
        assert!(!tree.get(child).unwrap().is_pointed());
    }

    #[test]
    fn test_key_up_needs_focus() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        assert!(!tree.key_down(root, Key::Enter));
        assert!(!tree.key_up(root, Key::Enter));
        tree.get_mut(root).unwrap().focused = true;
        assert!(tree.key_up(root, Key::Enter));
        assert!(!tree.text_input(root, "a"));
    }
}

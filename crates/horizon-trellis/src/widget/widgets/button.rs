use horizon_trellis_core::{MouseButton, UiEventKind, UiEventPayload, WidgetId};

use crate::style::Relief;
use crate::widget::{PaintContext, PaintPass, Widget, WidgetBase, WidgetKind, WidgetTree};

/// A push button.
///
/// Children (usually a [`Text`](super::Text)) shift by one pixel while the
/// button is held. Releasing the pointer inside a pushed button emits
/// `Click`.
#[derive(Debug, Default)]
pub struct Button;

impl Button {
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Button {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Button
    }

    fn configure(&self, base: &mut WidgetBase) {
        base.set_move_children_on_push(true);
        base.set_redraw_on_mouse_event(true);
        base.set_allow_focus(true);
    }

    fn mouse_up(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        button: MouseButton,
        x: f32,
        y: f32,
    ) -> bool {
        let Some((pushed, inside)) = tree
            .get(id)
            .map(|base| (base.is_pushed(), base.rect().contains(x, y)))
        else {
            return false;
        };
        if pushed && inside {
            tree.default_mouse_up(id, button, x, y);
            tree.emit(id, UiEventKind::Click, UiEventPayload::None);
            return true;
        }
        if pushed {
            if let Some(base) = tree.get_mut(id) {
                base.pushed = false;
            }
            tree.resize_children(id);
        }
        tree.default_mouse_up(id, button, x, y);
        false
    }

    fn paint(&self, ctx: &mut PaintContext<'_>, pass: PaintPass) {
        if pass == PaintPass::Before {
            let pushed = ctx.base().is_pushed();
            let relief = if pushed { Relief::Lowered } else { Relief::Raised };
            ctx.draw_box(relief, Some(pushed));
        }
    }
}

#[cfg(test)]
mod tests {
    use horizon_trellis_core::{EventFilter, UiEventKind};

    use super::*;
    use crate::widget::Alignment;
    use crate::widget::tree::tests::tree_with_root;
    use crate::widget::widgets::Text;

    #[test]
    fn test_press_and_release_inside_clicks_once() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let button = tree.add(root, Button::new(), Alignment::Center, "80,20");
        tree.bus().clear();

        let rect = tree.get(button).unwrap().rect();
        let (x, y) = (rect.x + 5.0, rect.y + 5.0);
        tree.mouse_down(root, MouseButton::Left, x, y);
        tree.mouse_up(root, MouseButton::Left, x, y);

        let events = tree.bus().drain();
        let count = |kind| {
            events
                .iter()
                .filter(|event| event.kind == kind && event.widget_id() == Some(button))
                .count()
        };
        assert_eq!(count(UiEventKind::GotFocus), 1);
        assert_eq!(count(UiEventKind::Click), 1);
        assert_eq!(tree.focused(), Some(button));
    }

    #[test]
    fn test_release_outside_does_not_click() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let button = tree.add(root, Button::new(), Alignment::CornerBottomLeft, "40,20");

        tree.mouse_down(root, MouseButton::Left, 5.0, 5.0);
        assert!(tree.get(button).unwrap().is_pushed());
        tree.bus().clear();
        tree.mouse_up(root, MouseButton::Left, 150.0, 90.0);

        assert!(!tree.get(button).unwrap().is_pushed());
        let filter = EventFilter::kind(UiEventKind::Click);
        assert!(!tree.bus().drain().iter().any(|event| filter.matches(event)));
    }

    #[test]
    fn test_label_moves_while_pushed() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let button = tree.add(root, Button::new(), Alignment::CornerBottomLeft, "80,24");
        let label = tree.add(button, Text::new("OK"), Alignment::Center, "");
        let before = tree.get(label).unwrap().rect();

        tree.mouse_down(root, MouseButton::Left, 5.0, 5.0);
        let pushed = tree.get(label).unwrap().rect();
        assert_eq!(pushed.x, before.x + 1.0);
        assert_eq!(pushed.y, before.y - 1.0);

        tree.mouse_up(root, MouseButton::Left, 5.0, 5.0);
        assert_eq!(tree.get(label).unwrap().rect(), before);
    }
}

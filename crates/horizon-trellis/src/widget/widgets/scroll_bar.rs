use horizon_trellis_core::{
    MouseButton, MouseButtons, Rect, UiEventKind, UiEventPayload, WidgetId,
};

use super::{BoxWidget, RangeValue};
use crate::style::StylePart;
use crate::widget::{Alignment, Orientation, Widget, WidgetBase, WidgetKind, WidgetTree};

/// Smallest lift length, used when the track is shorter than the range.
const LIFT_MIN: f32 = 10.0;

/// Steps moved by a press on the track outside the lift.
const PAGE_STEPS: f32 = 10.0;

/// A scroll bar: a sunken track (the area) with a draggable lift (the cage).
///
/// The minimum of a vertical bar is at the top.
#[derive(Debug)]
pub struct ScrollBar {
    orientation: Orientation,
    range: RangeValue,
    area: Option<WidgetId>,
    cage: Option<WidgetId>,
    scrolling: bool,
    scroll_start: f32,
}

impl ScrollBar {
    pub fn new(orientation: Orientation, range: RangeValue) -> Self {
        Self {
            orientation,
            range,
            area: None,
            cage: None,
            scrolling: false,
            scroll_start: 0.0,
        }
    }

    pub fn vertical(range: RangeValue) -> Self {
        Self::new(Orientation::Vertical, range)
    }

    pub fn horizontal(range: RangeValue) -> Self {
        Self::new(Orientation::Horizontal, range)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The track widget.
    pub fn area(&self) -> Option<WidgetId> {
        self.area
    }

    /// The lift widget.
    pub fn cage(&self) -> Option<WidgetId> {
        self.cage
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    fn parts(&self, tree: &WidgetTree) -> Option<(Rect, Rect)> {
        let area = tree.get(self.area?)?.rect();
        let cage = tree.get(self.cage?)?.rect();
        Some((area, cage))
    }

    fn set_value(&mut self, tree: &mut WidgetTree, id: WidgetId, value: f32) {
        let previous = self.range.value();
        self.range.set_value(value);
        self.lift_refresh(tree);
        if self.range.value() != previous {
            tree.emit(id, UiEventKind::ValueChange, UiEventPayload::Value(self.range.value()));
        }
    }

    /// Size and place the lift for the current value.
    fn lift_refresh(&self, tree: &mut WidgetTree) {
        let (Some(area_id), Some(cage_id)) = (self.area, self.cage) else {
            return;
        };
        let Some(area) = tree.get(area_id).map(WidgetBase::rect) else {
            return;
        };
        let extent = self.range.extent();
        if area.width == 0.0 || area.height == 0.0 || extent <= 0.0 {
            return;
        }
        if let Some(cage) = tree.get_mut(cage_id) {
            cage.pushed = self.scrolling;
        }

        let size = match self.orientation {
            Orientation::Vertical => area.height,
            Orientation::Horizontal => area.width,
        };
        let lift = if size >= extent { size - extent } else { LIFT_MIN };
        let position = (self.range.value() - self.range.min()) * (size - lift) / extent;
        match self.orientation {
            Orientation::Vertical => {
                tree.apply_size(cage_id, area.width, lift);
                tree.set_pos(cage_id, area.x, area.y + size - lift - position);
            }
            Orientation::Horizontal => {
                tree.apply_size(cage_id, lift, area.height);
                tree.set_pos(cage_id, area.x + position, area.y);
            }
        }
        tree.refresh(area_id);
        tree.refresh(cage_id);
    }
}

impl Widget for ScrollBar {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ScrollBar
    }

    fn configure(&self, base: &mut WidgetBase) {
        base.set_allow_focus(true);
        base.set_mouse_move_on_focus(true);
    }

    fn on_create(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        let style = tree.style().clone();
        self.area = Some(tree.add(
            id,
            BoxWidget::new(),
            Alignment::Fill,
            &style.part_descriptor(StylePart::ScrollArea),
        ));
        let cage = tree.add(
            id,
            BoxWidget::new(),
            Alignment::None,
            &style.part_descriptor(StylePart::ScrollCage),
        );
        if let Some(base) = tree.get_mut(cage) {
            base.set_redraw_on_mouse_event(true);
            base.set_move_children_on_push(true);
        }
        self.cage = Some(cage);
    }

    fn on_resize(&mut self, tree: &mut WidgetTree, _id: WidgetId) {
        self.lift_refresh(tree);
    }

    fn on_range_change(&mut self, tree: &mut WidgetTree, _id: WidgetId) {
        self.lift_refresh(tree);
    }

    fn range(&self) -> Option<&RangeValue> {
        Some(&self.range)
    }

    fn range_mut(&mut self) -> Option<&mut RangeValue> {
        Some(&mut self.range)
    }

    fn mouse_down(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        button: MouseButton,
        x: f32,
        y: f32,
    ) -> bool {
        let consumed = tree.default_mouse_down(id, button, x, y);
        let Some((area, cage)) = self.parts(tree) else {
            return consumed;
        };

        if cage.contains(x, y) {
            self.scrolling = true;
            self.scroll_start = match self.orientation {
                Orientation::Vertical => y - cage.y,
                Orientation::Horizontal => x - cage.x,
            };
            return consumed;
        }
        if !area.contains(x, y) {
            return consumed;
        }

        let page = self.range.step() * PAGE_STEPS;
        let delta = match self.orientation {
            Orientation::Vertical if y < cage.y => page,
            Orientation::Vertical if y > cage.top() => -page,
            Orientation::Horizontal if x < cage.x => -page,
            Orientation::Horizontal if x > cage.right() => page,
            _ => return consumed,
        };
        self.set_value(tree, id, self.range.value() + delta);
        consumed
    }

    fn mouse_up(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        button: MouseButton,
        x: f32,
        y: f32,
    ) -> bool {
        self.scrolling = false;
        tree.default_mouse_up(id, button, x, y)
    }

    fn mouse_move(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        buttons: MouseButtons,
        x: f32,
        y: f32,
    ) -> bool {
        if self.scrolling {
            let inside = tree.get(id).is_some_and(|base| base.rect().contains(x, y));
            if let (true, Some((area, cage))) = (inside, self.parts(tree)) {
                let (offset, track) = match self.orientation {
                    Orientation::Vertical => (y - area.y, area.height - cage.height),
                    Orientation::Horizontal => (x - area.x, area.width - cage.width),
                };
                if offset > self.scroll_start && track > 0.0 {
                    let mut value = (offset - self.scroll_start) * self.range.extent() / track;
                    if self.orientation == Orientation::Vertical {
                        value = self.range.max() - value;
                    }
                    self.set_value(tree, id, value);
                }
                return true;
            }
            self.scrolling = false;
        }
        tree.default_mouse_move(id, buttons, x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::tree::tests::tree_with_root;

    fn vertical_bar(tree: &mut WidgetTree, root: WidgetId) -> WidgetId {
        tree.add(
            root,
            ScrollBar::vertical(RangeValue::new(0.0, 50.0, 0.0, 1.0)),
            Alignment::Right,
            "16,0",
        )
    }

    fn cage_rect(tree: &WidgetTree, bar: WidgetId) -> Rect {
        let cage = tree.widget::<ScrollBar>(bar).and_then(ScrollBar::cage).unwrap();
        tree.get(cage).unwrap().rect()
    }

    #[test]
    fn test_lift_sized_from_range() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let bar = vertical_bar(&mut tree, root);
        assert_eq!(tree.get(bar).unwrap().rect(), Rect::new(184.0, 0.0, 16.0, 100.0));
        // Track of 100 for 50 values leaves a lift of 50, at the top for the minimum.
        assert_eq!(cage_rect(&tree, bar), Rect::new(184.0, 50.0, 16.0, 50.0));
    }

    #[test]
    fn test_track_press_pages() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let bar = vertical_bar(&mut tree, root);
        tree.bus().clear();

        tree.mouse_down(root, MouseButton::Left, 190.0, 10.0);
        tree.mouse_up(root, MouseButton::Left, 190.0, 10.0);

        assert_eq!(tree.value(bar), Some(10.0));
        assert_eq!(cage_rect(&tree, bar).y, 40.0);
        assert_eq!(tree.focused(), Some(bar));
        assert!(tree.bus().drain().iter().any(|event| {
            event.kind == UiEventKind::ValueChange && event.payload == UiEventPayload::Value(10.0)
        }));
    }

    #[test]
    fn test_drag_lift() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let bar = vertical_bar(&mut tree, root);
        tree.set_value(bar, 10.0).unwrap();
        assert_eq!(cage_rect(&tree, bar).y, 40.0);

        // Grab the lift 20px above its bottom edge and drag it down by 10px.
        tree.mouse_down(root, MouseButton::Left, 190.0, 60.0);
        assert!(tree.widget::<ScrollBar>(bar).unwrap().is_scrolling());
        tree.mouse_move(root, MouseButtons::LEFT, 190.0, 50.0);
        assert_eq!(tree.value(bar), Some(20.0));
        assert_eq!(cage_rect(&tree, bar).y, 30.0);

        tree.mouse_up(root, MouseButton::Left, 190.0, 50.0);
        assert!(!tree.widget::<ScrollBar>(bar).unwrap().is_scrolling());
    }

    #[test]
    fn test_short_track_uses_minimum_lift() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let bar = tree.add(
            root,
            ScrollBar::horizontal(RangeValue::new(0.0, 500.0, 500.0, 1.0)),
            Alignment::Bottom,
            "0,16",
        );
        let cage = cage_rect(&tree, bar);
        assert_eq!(cage.width, LIFT_MIN);
        assert_eq!(cage.x, 200.0 - LIFT_MIN);
    }
}

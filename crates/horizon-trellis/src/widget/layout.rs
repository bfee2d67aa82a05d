//! Alignment-driven layout.
//!
//! A parent partitions its client rectangle among its children in insertion
//! order. Each child asks for its default rectangle, clamped to what is left,
//! and its [`Alignment`] decides where the child goes and how much of the
//! remaining rectangle it consumes. Overlapping children are placed but
//! consume nothing. The pass ends as soon as the remaining rectangle has no
//! area; later children keep their previous geometry.
//!
//! Coordinates are y-up: `Top` docks at the high edge of the parent.

use horizon_trellis_core::logging::{span_names, targets};
use horizon_trellis_core::{Point, Rect, WidgetId};

use super::WidgetTree;
use crate::style::StyleTarget;

/// Placement policy of a child inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    /// Take the whole remaining rectangle.
    Fill,
    /// Centered on both axes, consumes everything.
    Center,
    /// Horizontally centered, full remaining height.
    VCenter,
    /// Vertically centered, full remaining width.
    HCenter,
    /// Docks at the low edge with no gap: the next child starts on the
    /// row where this one ends, and a point on that seam hits both.
    Bottom,
    Top,
    Left,
    Right,
    BottomCenter,
    TopCenter,
    LeftCenter,
    RightCenter,
    BottomLeft,
    TopLeft,
    TopRight,
    BottomRight,
    LeftBottom,
    LeftTop,
    RightTop,
    RightBottom,
    CornerBottomLeft,
    CornerTopLeft,
    CornerTopRight,
    CornerBottomRight,
    /// Keep the current position, only clamp the size.
    #[default]
    None,
}

/// Place one child in `remaining` and consume space from it.
///
/// `request` is the child's current position with its default size.
/// `padding` is the parent's padding.
pub fn place_child(
    remaining: &mut Rect,
    request: Rect,
    alignment: Alignment,
    overlap: bool,
    padding: f32,
) -> Rect {
    let r = *remaining;
    let p = padding;
    let consume = !overlap;
    let mut c = Rect::new(
        request.x,
        request.y,
        request.width.min(r.width).max(0.0),
        request.height.min(r.height).max(0.0),
    );

    let center_x = r.x + (r.width - c.width) / 2.0;
    let center_y = r.y + (r.height - c.height) / 2.0;
    let right = r.right() - c.width;
    let top = r.top() - c.height;

    match alignment {
        Alignment::Fill => {
            c = r;
            if consume {
                remaining.width = 0.0;
                remaining.height = 0.0;
            }
        }
        Alignment::Center => {
            c.x = center_x;
            c.y = center_y;
            if consume {
                remaining.width = 0.0;
                remaining.height = 0.0;
            }
        }
        Alignment::VCenter => {
            c.x = center_x;
            c.y = r.y;
            if consume {
                c.height = r.height;
                remaining.width = 0.0;
            }
        }
        Alignment::HCenter => {
            c.x = r.x;
            c.y = center_y;
            if consume {
                c.width = r.width;
                remaining.width = 0.0;
            }
        }
        Alignment::Bottom => {
            c.x = r.x;
            c.y = r.y;
            if consume {
                c.width = r.width;
                take_bottom(remaining, c.height, c.height + 2.0 * p);
            }
        }
        Alignment::Top => {
            c.x = r.x;
            c.y = top;
            if consume {
                c.width = r.width;
                take_top(remaining, c.height + 2.0 * p + 1.0);
            }
        }
        Alignment::Left => {
            c.x = r.x;
            c.y = r.y;
            if consume {
                c.height = r.height;
                take_left(remaining, c.width + 1.0, c.width + 2.0 * p + 1.0);
            }
        }
        Alignment::Right => {
            c.x = right;
            c.y = r.y;
            if consume {
                c.height = r.height;
                take_right(remaining, c.width + 2.0 * p + 1.0);
            }
        }
        Alignment::BottomCenter => {
            c.x = center_x;
            c.y = r.y;
            if consume {
                take_bottom(remaining, c.height + p, c.height + 2.0 * p);
            }
        }
        Alignment::TopCenter => {
            c.x = center_x;
            c.y = top;
            if consume {
                take_top(remaining, c.height + 2.0 * p + 1.0);
            }
        }
        Alignment::LeftCenter => {
            c.x = r.x;
            c.y = center_y;
            if consume {
                take_left(remaining, c.width + p + 1.0, c.width + 2.0 * p + 1.0);
            }
        }
        Alignment::RightCenter => {
            c.x = right;
            c.y = center_y;
            if consume {
                take_right(remaining, c.width + 2.0 * p + 1.0);
            }
        }
        Alignment::BottomLeft | Alignment::BottomRight => {
            c.x = if alignment == Alignment::BottomLeft { r.x } else { right };
            c.y = r.y;
            if consume {
                take_bottom(remaining, c.height + p, c.height + 2.0 * p);
            }
        }
        Alignment::TopLeft | Alignment::TopRight => {
            c.x = if alignment == Alignment::TopLeft { r.x } else { right };
            c.y = top;
            if consume {
                take_top(remaining, c.height + 2.0 * p + 1.0);
            }
        }
        Alignment::LeftBottom | Alignment::LeftTop => {
            c.x = r.x;
            c.y = if alignment == Alignment::LeftBottom { r.y } else { top };
            if consume {
                take_left(remaining, c.width + p + 1.0, c.width + 2.0 * p + 1.0);
            }
        }
        Alignment::RightTop | Alignment::RightBottom => {
            c.x = right;
            c.y = if alignment == Alignment::RightBottom { r.y } else { top };
            if consume {
                take_right(remaining, c.width + 2.0 * p + 1.0);
            }
        }
        Alignment::CornerBottomLeft | Alignment::CornerBottomRight => {
            c.x = if alignment == Alignment::CornerBottomLeft { r.x } else { right };
            c.y = r.y;
            if consume {
                take_bottom(remaining, c.height + p, c.height + p);
            }
        }
        Alignment::CornerTopLeft => {
            c.x = r.x;
            c.y = top;
        }
        Alignment::CornerTopRight => {
            c.x = right;
            c.y = top;
        }
        Alignment::None => {}
    }
    c
}

/// Advance the bottom edge by `advance` and shrink the height by `shrink`,
/// never leaving the previous bounds.
fn take_bottom(r: &mut Rect, advance: f32, shrink: f32) {
    let top = r.top();
    r.y = (r.y + advance).min(top);
    r.height = (r.height - shrink).max(0.0).min(top - r.y);
}

fn take_top(r: &mut Rect, shrink: f32) {
    r.height = (r.height - shrink).max(0.0);
}

fn take_left(r: &mut Rect, advance: f32, shrink: f32) {
    let right = r.right();
    r.x = (r.x + advance).min(right);
    r.width = (r.width - shrink).max(0.0).min(right - r.x);
}

fn take_right(r: &mut Rect, shrink: f32) {
    r.width = (r.width - shrink).max(0.0);
}

impl WidgetTree {
    /// Lay out the direct children of `id` inside its client rectangle.
    ///
    /// Does nothing while the widget is frozen, which also stops nested
    /// layout requests coming back from the children.
    pub fn resize_children(&mut self, id: WidgetId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if node.base.frozen {
            return;
        }
        let _span = tracing::trace_span!(span_names::LAYOUT, widget = ?id).entered();

        if let Some(borders) = self.style_borders(id) {
            if let Some(node) = self.nodes.get_mut(id) {
                node.base.hborder = borders.horizontal;
                node.base.vborder = borders.vertical;
            }
        }

        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.base.frozen = true;
        let mut remaining = node.base.client_rect();
        let padding = node.base.padding;
        let children = node.base.children.clone();

        self.begin_pass();
        for child in children {
            if remaining.is_empty() {
                break;
            }
            let Some(request) = self.layout_request(child) else {
                continue;
            };
            let (alignment, overlap) = match self.nodes.get(child) {
                Some(node) => (node.base.alignment, node.base.overlap),
                None => continue,
            };
            let rect = place_child(&mut remaining, request, alignment, overlap, padding);
            tracing::trace!(target: targets::LAYOUT, ?child, ?alignment, ?rect, "placed child");
            self.set_rect(child, rect);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.base.frozen = false;
        }
        self.end_pass();
    }

    /// Ask the style for the widget's borders.
    fn style_borders(&self, id: WidgetId) -> Option<crate::style::Borders> {
        let node = self.nodes.get(id)?;
        let font = self.font_of(id);
        let target = StyleTarget {
            kind: node.base.kind,
            title: node.behavior.as_ref().and_then(|behavior| behavior.title()),
            font: font.as_ref(),
            font_scale: self.font_scale_of(id),
        };
        self.env.style.resize(&target)
    }

    /// Current position and default size of a child, computing the size
    /// from content the first time a zero-sized content widget is asked.
    fn layout_request(&mut self, child: WidgetId) -> Option<Rect> {
        let rect = self.nodes.get(child)?.base.rect;
        if rect.width == 0.0 && rect.height == 0.0 {
            if let Some(size) = self.content_size(child) {
                self.resize_widget(child, size.width, size.height);
            }
        }
        let base = &self.nodes.get(child)?.base;
        Some(Rect::from_origin_size(
            Point::new(base.rect.x, base.rect.y),
            base.default_rect.size(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::tree::tests::tree_with_root;
    use crate::widget::{Container, Widget, WidgetKind};

    /// Tries to relayout its parent from inside the parent's own pass.
    #[derive(Default)]
    struct Meddler {
        sibling: Option<WidgetId>,
        parent_frozen: Vec<bool>,
    }

    impl Widget for Meddler {
        fn kind(&self) -> WidgetKind {
            WidgetKind::Widget
        }

        fn on_resize(&mut self, tree: &mut WidgetTree, id: WidgetId) {
            let Some(parent) = tree.get(id).and_then(|base| base.parent()) else {
                return;
            };
            self.parent_frozen.push(tree.get(parent).is_some_and(|base| base.is_frozen()));
            if let Some(sibling) = self.sibling {
                tree.set_size(sibling, 120.0, 10.0);
                tree.resize_children(parent);
            }
        }
    }

    fn place(remaining: &mut Rect, w: f32, h: f32, alignment: Alignment) -> Rect {
        place_child(remaining, Rect::new(0.0, 0.0, w, h), alignment, false, 0.0)
    }

    #[test]
    fn test_fill_takes_everything() {
        let mut remaining = Rect::new(5.0, 5.0, 100.0, 50.0);
        let rect = place(&mut remaining, 10.0, 10.0, Alignment::Fill);
        assert_eq!(rect, Rect::new(5.0, 5.0, 100.0, 50.0));
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_oversize_request_is_clamped() {
        let mut remaining = Rect::new(0.0, 0.0, 100.0, 50.0);
        let rect = place(&mut remaining, 500.0, 500.0, Alignment::Center);
        assert_eq!(rect, Rect::new(0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn test_top_docks_at_high_edge() {
        let mut remaining = Rect::new(0.0, 0.0, 100.0, 50.0);
        let rect = place(&mut remaining, 20.0, 10.0, Alignment::Top);
        assert_eq!(rect, Rect::new(0.0, 40.0, 100.0, 10.0));
        assert_eq!(remaining, Rect::new(0.0, 0.0, 100.0, 39.0));
    }

    #[test]
    fn test_bottom_then_fill() {
        let mut remaining = Rect::new(0.0, 0.0, 100.0, 50.0);
        let bottom = place(&mut remaining, 20.0, 10.0, Alignment::Bottom);
        assert_eq!(bottom, Rect::new(0.0, 0.0, 100.0, 10.0));
        let fill = place(&mut remaining, 0.0, 0.0, Alignment::Fill);
        assert_eq!(fill, Rect::new(0.0, 10.0, 100.0, 40.0));
    }

    #[test]
    fn test_left_and_right_consume_width() {
        let mut remaining = Rect::new(0.0, 0.0, 100.0, 50.0);
        let left = place(&mut remaining, 20.0, 10.0, Alignment::Left);
        assert_eq!(left, Rect::new(0.0, 0.0, 20.0, 50.0));
        assert_eq!(remaining, Rect::new(21.0, 0.0, 79.0, 50.0));

        let right = place(&mut remaining, 30.0, 10.0, Alignment::Right);
        assert_eq!(right, Rect::new(70.0, 0.0, 30.0, 50.0));
        assert_eq!(remaining, Rect::new(21.0, 0.0, 48.0, 50.0));
    }

    #[test]
    fn test_padding_is_consumed_on_both_sides() {
        let mut remaining = Rect::new(0.0, 0.0, 100.0, 50.0);
        let rect = place_child(
            &mut remaining,
            Rect::new(0.0, 0.0, 20.0, 10.0),
            Alignment::BottomLeft,
            false,
            2.0,
        );
        assert_eq!(rect, Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(remaining, Rect::new(0.0, 12.0, 100.0, 36.0));
    }

    #[test]
    fn test_overlap_consumes_nothing() {
        let mut remaining = Rect::new(0.0, 0.0, 100.0, 50.0);
        let rect = place_child(
            &mut remaining,
            Rect::new(0.0, 0.0, 20.0, 10.0),
            Alignment::Fill,
            true,
            0.0,
        );
        assert_eq!(rect, Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(remaining, Rect::new(0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn test_corners() {
        let mut remaining = Rect::new(0.0, 0.0, 100.0, 50.0);
        let top_right = place(&mut remaining, 10.0, 10.0, Alignment::CornerTopRight);
        assert_eq!(top_right, Rect::new(90.0, 40.0, 10.0, 10.0));
        assert_eq!(remaining, Rect::new(0.0, 0.0, 100.0, 50.0));

        let bottom_right = place(&mut remaining, 10.0, 10.0, Alignment::CornerBottomRight);
        assert_eq!(bottom_right, Rect::new(90.0, 0.0, 10.0, 10.0));
        assert_eq!(remaining, Rect::new(0.0, 10.0, 100.0, 40.0));
    }

    #[test]
    fn test_none_keeps_position() {
        let mut remaining = Rect::new(0.0, 0.0, 100.0, 50.0);
        let rect = place_child(
            &mut remaining,
            Rect::new(33.0, 7.0, 200.0, 5.0),
            Alignment::None,
            false,
            0.0,
        );
        assert_eq!(rect, Rect::new(33.0, 7.0, 100.0, 5.0));
        assert_eq!(remaining, Rect::new(0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn test_consumption_never_leaves_bounds() {
        let alignments = [
            Alignment::Bottom,
            Alignment::Top,
            Alignment::Left,
            Alignment::Right,
            Alignment::BottomCenter,
            Alignment::LeftCenter,
            Alignment::CornerBottomLeft,
            Alignment::LeftTop,
        ];
        for alignment in alignments {
            let bounds = Rect::new(0.0, 0.0, 30.0, 30.0);
            let mut remaining = bounds;
            for _ in 0..5 {
                let rect = place_child(
                    &mut remaining,
                    Rect::new(0.0, 0.0, 12.0, 12.0),
                    alignment,
                    false,
                    3.0,
                );
                assert!(rect.width >= 0.0 && rect.height >= 0.0, "{alignment:?}");
                assert!(remaining.width >= 0.0 && remaining.height >= 0.0, "{alignment:?}");
                assert!(remaining.right() <= bounds.right(), "{alignment:?}");
                assert!(remaining.top() <= bounds.top(), "{alignment:?}");
            }
        }
    }

    #[test]
    fn test_nested_layout_is_suppressed_while_frozen() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let meddler = tree.add(root, Meddler::default(), Alignment::Left, "50,10");
        let fill = tree.add(root, Container, Alignment::Fill, "");
        tree.with_widget::<Meddler, _>(meddler, |widget, _| {
            widget.sibling = Some(fill);
            widget.parent_frozen.clear();
        })
        .unwrap();

        tree.resize_children(root);

        let seen = &tree.widget::<Meddler>(meddler).unwrap().parent_frozen;
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|frozen| *frozen));
        assert!(!tree.get(root).unwrap().is_frozen());
        // The sibling's own resize did not restart the pass: it still gets
        // what the single pass left after the docked child.
        assert_eq!(tree.get(meddler).unwrap().rect(), Rect::new(0.0, 0.0, 50.0, 100.0));
        assert_eq!(tree.get(fill).unwrap().rect(), Rect::new(51.0, 0.0, 149.0, 100.0));
    }
}

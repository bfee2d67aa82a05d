use crate::widget::{PaintContext, PaintPass, Widget, WidgetKind};

/// A beveled container. The relief comes from the resource descriptor.
#[derive(Debug, Default)]
pub struct BoxWidget;

impl BoxWidget {
    pub fn new() -> Self {
        Self
    }
}

impl Widget for BoxWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Box
    }

    fn paint(&self, ctx: &mut PaintContext<'_>, pass: PaintPass) {
        if pass == PaintPass::Before {
            let relief = ctx.resource().relief;
            ctx.draw_box(relief, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use horizon_trellis_core::Rect;

    use super::*;
    use crate::widget::Alignment;
    use crate::widget::tree::tests::tree_with_root;

    #[test]
    fn test_box_borders_shrink_client_area() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let frame = tree.add(root, BoxWidget::new(), Alignment::Fill, ",,LOWERED");
        let inner = tree.add(frame, BoxWidget::new(), Alignment::Fill, "");
        assert_eq!(tree.get(frame).unwrap().hborder(), 2.0);
        assert_eq!(tree.get(inner).unwrap().rect(), Rect::new(2.0, 2.0, 196.0, 96.0));
    }
}

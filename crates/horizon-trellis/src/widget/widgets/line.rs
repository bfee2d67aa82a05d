use crate::widget::{Orientation, PaintContext, PaintPass, Widget, WidgetBase, WidgetKind};

/// A horizontal or vertical separator.
#[derive(Debug, Default)]
pub struct Line {
    orientation: Orientation,
}

impl Line {
    pub fn new(orientation: Orientation) -> Self {
        Self { orientation }
    }

    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}

impl Widget for Line {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Line
    }

    fn configure(&self, base: &mut WidgetBase) {
        base.set_allow_children(false);
    }

    fn paint(&self, ctx: &mut PaintContext<'_>, pass: PaintPass) {
        if pass == PaintPass::Before {
            let (base, resource, style) = (ctx.base(), ctx.resource(), ctx.style());
            style.draw_line(ctx.renderer(), base, resource, self.orientation);
        }
    }
}

#[cfg(test)]
mod tests {
    use horizon_trellis_core::Point;

    use super::*;
    use crate::render::{DrawCommand, RecordingRenderer};
    use crate::widget::Alignment;
    use crate::widget::tree::tests::tree_with_root;

    #[test]
    fn test_vertical_line_spans_height() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        tree.add(root, Line::vertical(), Alignment::Left, "1,0");

        let mut renderer = RecordingRenderer::new();
        tree.paint(&mut renderer);
        assert!(renderer.commands().contains(&DrawCommand::Line {
            from: Point::new(0.0, 0.0),
            to: Point::new(0.0, 100.0),
        }));
    }
}

use horizon_trellis_core::{Result, WidgetId};

use crate::widget::{PaintContext, PaintPass, Widget, WidgetKind, WidgetTree};

/// A titled border around a group of children.
///
/// The style reserves room for the title in the frame's vertical border.
#[derive(Debug, Default)]
pub struct Frame {
    title: String,
}

impl Frame {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Widget for Frame {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Frame
    }

    fn title(&self) -> Option<&str> {
        Some(&self.title)
    }

    fn paint(&self, ctx: &mut PaintContext<'_>, pass: PaintPass) {
        if pass != PaintPass::Before {
            return;
        }
        let font = ctx.font();
        let scale = ctx.font_scale();
        let color = ctx.text_color();
        let (base, resource, style) = (ctx.base(), ctx.resource(), ctx.style());
        style.draw_frame(ctx.renderer(), base, resource, &self.title, &font, scale, color);
    }
}

impl WidgetTree {
    pub fn title(&self, id: WidgetId) -> Option<&str> {
        self.widget::<Frame>(id).map(|frame| frame.title.as_str())
    }

    /// Change a frame's title and lay its children out again.
    pub fn set_title(&mut self, id: WidgetId, title: &str) -> Result<()> {
        self.with_widget::<Frame, _>(id, |frame, _| frame.title = title.to_string())?;
        self.resize_children(id);
        self.refresh(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use horizon_trellis_core::Rect;

    use super::*;
    use crate::render::RecordingRenderer;
    use crate::widget::Alignment;
    use crate::widget::tree::tests::tree_with_root;
    use crate::widget::widgets::Panel;

    #[test]
    fn test_frame_reserves_title_space() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let frame = tree.add(root, Frame::new("Options"), Alignment::Fill, "");
        let inner = tree.add(frame, Panel::new(), Alignment::Fill, "");

        let base = tree.get(frame).unwrap();
        assert_eq!(base.hborder(), 4.0);
        // 16px title line minus the 2px overlap with the border.
        assert_eq!(base.vborder(), 14.0);
        assert_eq!(tree.get(inner).unwrap().rect(), Rect::new(4.0, 14.0, 192.0, 72.0));
    }

    #[test]
    fn test_set_title_draws_new_title() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let frame = tree.add(root, Frame::new("Old"), Alignment::Fill, "");
        tree.set_title(frame, "New").unwrap();
        assert_eq!(tree.title(frame), Some("New"));

        let mut renderer = RecordingRenderer::new();
        tree.paint(&mut renderer);
        assert_eq!(renderer.texts(), vec!["New".to_string()]);
    }
}

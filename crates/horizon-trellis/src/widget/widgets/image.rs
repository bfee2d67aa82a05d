use horizon_trellis_core::{Color, Result, Size, WidgetId};

use crate::render::TextureId;
use crate::widget::{PaintContext, PaintPass, Widget, WidgetBase, WidgetKind, WidgetTree};

/// A textured rectangle.
///
/// An auto-sized image takes the size of its texture, corrected for the
/// output aspect ratio, and ignores sizes imposed by layout.
#[derive(Debug)]
pub struct Image {
    texture: Option<TextureId>,
    image_size: Size,
    color: Color,
    auto_size: bool,
}

impl Default for Image {
    fn default() -> Self {
        Self {
            texture: None,
            image_size: Size::ZERO,
            color: Color::WHITE,
            auto_size: false,
        }
    }
}

impl Image {
    pub fn new(texture: TextureId, size: Size) -> Self {
        Self {
            texture: Some(texture),
            image_size: size,
            ..Self::default()
        }
    }

    /// An image without a texture; draws nothing until one is set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn auto_sized(mut self) -> Self {
        self.auto_size = true;
        self
    }

    /// Modulation color, white by default.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    pub fn image_size(&self) -> Size {
        self.image_size
    }

    pub fn is_auto_size(&self) -> bool {
        self.auto_size
    }

    fn auto_resize(&self, tree: &mut WidgetTree, id: WidgetId) {
        if !self.auto_size {
            return;
        }
        let width = (self.image_size.width / tree.aspect_ratio()).round();
        tree.set_intrinsic_size(id, width, self.image_size.height);
    }
}

impl Widget for Image {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Image
    }

    fn on_create(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        self.auto_resize(tree, id);
    }

    fn configure(&self, base: &mut WidgetBase) {
        base.set_auto_sized(self.auto_size);
    }

    fn paint(&self, ctx: &mut PaintContext<'_>, pass: PaintPass) {
        let (PaintPass::Before, Some(texture)) = (pass, self.texture) else {
            return;
        };
        let (base, style) = (ctx.base(), ctx.style());
        style.draw_image(ctx.renderer(), base, texture, self.color);
    }
}

impl WidgetTree {
    /// Replace the texture of an [`Image`], resizing it when auto-sized.
    pub fn set_image(&mut self, id: WidgetId, texture: Option<TextureId>, size: Size) -> Result<()> {
        self.with_widget::<Image, _>(id, |image, tree| {
            image.texture = texture;
            image.image_size = size;
            image.auto_resize(tree, id);
        })?;
        self.refresh(id);
        Ok(())
    }

    pub fn set_image_color(&mut self, id: WidgetId, color: Color) -> Result<()> {
        self.with_widget::<Image, _>(id, |image, _| image.color = color)?;
        self.refresh(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use horizon_trellis_core::Rect;

    use super::*;
    use crate::render::{DrawCommand, RecordingRenderer};
    use crate::widget::Alignment;
    use crate::widget::tree::tests::tree_with_root;

    #[test]
    fn test_auto_sized_image_ignores_layout_size() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let image = tree.add(
            root,
            Image::new(TextureId(1), Size::new(32.0, 16.0)).auto_sized(),
            Alignment::CornerBottomLeft,
            "80,80",
        );
        assert_eq!(tree.get(image).unwrap().size(), Size::new(32.0, 16.0));

        tree.set_image(image, Some(TextureId(2)), Size::new(10.0, 10.0)).unwrap();
        assert_eq!(tree.get(image).unwrap().size(), Size::new(10.0, 10.0));
    }

    #[test]
    fn test_auto_sized_image_refuses_set_size() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let image = tree.add(
            root,
            Image::new(TextureId(1), Size::new(32.0, 16.0)).auto_sized(),
            Alignment::Center,
            "",
        );
        assert!(tree.get(image).unwrap().is_auto_sized());
        tree.set_size(image, 100.0, 100.0);
        tree.resize_children(root);
        assert_eq!(tree.get(image).unwrap().size(), Size::new(32.0, 16.0));
    }

    #[test]
    fn test_image_draws_texture() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        tree.add(
            root,
            Image::new(TextureId(7), Size::new(32.0, 32.0)),
            Alignment::CornerBottomLeft,
            "32,32",
        );
        let mut renderer = RecordingRenderer::new();
        tree.paint(&mut renderer);
        assert!(renderer.commands().contains(&DrawCommand::FilledRect {
            rect: Rect::new(0.0, 0.0, 32.0, 32.0),
            texture: Some(TextureId(7)),
        }));
    }

    #[test]
    fn test_empty_image_draws_nothing() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        tree.add(root, Image::empty(), Alignment::Fill, "");
        let mut renderer = RecordingRenderer::new();
        tree.paint(&mut renderer);
        assert!(
            !renderer
                .commands()
                .iter()
                .any(|command| matches!(command, DrawCommand::FilledRect { texture: Some(_), .. }))
        );
    }
}

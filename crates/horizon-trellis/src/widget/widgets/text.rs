use horizon_trellis_core::{Color, Result, Size, TrellisError, WidgetId};

use super::TextEdit;
use crate::render::FontMetrics;
use crate::widget::{PaintContext, PaintPass, Widget, WidgetBase, WidgetKind, WidgetTree};

/// A single line of text, sized from its content.
#[derive(Debug, Default)]
pub struct Text {
    text: String,
    color: Option<Color>,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    /// Draw with `color` instead of the window's text color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }
}

impl Widget for Text {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Text
    }

    fn configure(&self, base: &mut WidgetBase) {
        base.set_allow_children(false);
        base.set_draw_background_flag(false);
    }

    fn content_size(&self, font: &dyn FontMetrics, scale: f32) -> Option<Size> {
        let size = font.size(&self.text, scale);
        Some(Size::new(size.width, size.height + font.descender() * scale))
    }

    fn paint(&self, ctx: &mut PaintContext<'_>, pass: PaintPass) {
        if pass != PaintPass::Before {
            return;
        }
        let font = ctx.font();
        let scale = ctx.font_scale();
        let color = self.color.unwrap_or(ctx.text_color());
        let (base, resource) = (ctx.base(), ctx.resource());
        let style = ctx.style();
        style.draw_text(ctx.renderer(), base, resource, &self.text, &font, scale, color);
    }
}

impl WidgetTree {
    /// Text of a [`Text`] or [`TextEdit`] widget.
    pub fn text(&self, id: WidgetId) -> Option<String> {
        self.widget::<Text>(id)
            .map(|text| text.text.clone())
            .or_else(|| self.widget::<TextEdit>(id).map(|edit| edit.text().to_string()))
    }

    /// Replace the text of a [`Text`] or [`TextEdit`] widget.
    ///
    /// A label is resized to its new content; an editor keeps its size and
    /// emits `TextChange`.
    pub fn set_text(&mut self, id: WidgetId, text: &str) -> Result<()> {
        match self.get(id).map(WidgetBase::kind) {
            Some(WidgetKind::Text) => {
                self.with_widget::<Text, _>(id, |label, _| label.text = text.to_string())?;
                if let Some(parent) = self.get(id).and_then(WidgetBase::parent) {
                    self.refresh(parent);
                }
                self.fit_content(id);
                Ok(())
            }
            Some(WidgetKind::TextEdit) => {
                self.with_widget::<TextEdit, _>(id, |edit, tree| edit.set_text(tree, id, text))
            }
            _ => Err(TrellisError::WidgetNotFound(id)),
        }
    }

    /// Change the color of a [`Text`] widget.
    pub fn set_text_color(&mut self, id: WidgetId, color: Option<Color>) -> Result<()> {
        self.with_widget::<Text, _>(id, |label, _| label.color = color)?;
        self.refresh(id);
        Ok(())
    }
}

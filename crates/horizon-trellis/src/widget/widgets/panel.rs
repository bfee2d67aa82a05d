use crate::widget::{PaintContext, PaintPass, Widget, WidgetKind};

/// A container that fills its rectangle with the style's background color.
#[derive(Debug, Default)]
pub struct Panel;

impl Panel {
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Panel {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Panel
    }

    fn paint(&self, ctx: &mut PaintContext<'_>, pass: PaintPass) {
        if pass == PaintPass::Before {
            ctx.draw_panel();
        }
    }
}

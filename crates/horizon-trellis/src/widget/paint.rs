//! Painting the widget tree.

use horizon_trellis_core::logging::span_names;
use horizon_trellis_core::{Color, WidgetId};

use super::{WidgetBase, WidgetTree};
use crate::render::{Font, Renderer};
use crate::style::{Relief, Style, StyleResource};

/// Which side of the children pass a paint call is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintPass {
    /// Before the children are drawn.
    Before,
    /// After the children are drawn.
    After,
}

/// Everything a widget needs to draw itself.
pub struct PaintContext<'a> {
    tree: &'a WidgetTree,
    id: WidgetId,
    base: &'a WidgetBase,
    resource: &'a StyleResource,
    renderer: &'a mut dyn Renderer,
}

impl<'a> PaintContext<'a> {
    #[inline]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    #[inline]
    pub fn tree(&self) -> &'a WidgetTree {
        self.tree
    }

    #[inline]
    pub fn base(&self) -> &'a WidgetBase {
        self.base
    }

    #[inline]
    pub fn resource(&self) -> &'a StyleResource {
        self.resource
    }

    pub fn style(&self) -> &'a dyn Style {
        &**self.tree.style()
    }

    pub fn renderer(&mut self) -> &mut dyn Renderer {
        &mut *self.renderer
    }

    pub fn font(&self) -> Font {
        self.tree.font_of(self.id)
    }

    pub fn font_scale(&self) -> f32 {
        self.tree.font_scale_of(self.id)
    }

    /// Window default text color.
    pub fn text_color(&self) -> Color {
        self.tree.text_color()
    }

    pub fn draw_panel(&mut self) {
        self.style()
            .draw_panel(&mut *self.renderer, self.base, self.resource);
    }

    pub fn draw_box(&mut self, relief: Relief, pushed: Option<bool>) {
        self.style()
            .draw_box(&mut *self.renderer, self.base, self.resource, relief, pushed);
    }
}

impl WidgetTree {
    /// Draw the whole tree, parents before and after their children.
    pub(crate) fn paint(&self, renderer: &mut dyn Renderer) {
        let _span = tracing::trace_span!(span_names::FRAME, window = %self.window_id()).entered();
        if let Some(root) = self.root {
            self.paint_widget(root, renderer);
        }
    }

    fn paint_widget(&self, id: WidgetId, renderer: &mut dyn Renderer) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.base.visible {
            return;
        }
        let (Some(behavior), Some(resource)) = (node.behavior.as_deref(), node.base.resource.as_ref())
        else {
            return;
        };
        let mut ctx = PaintContext {
            tree: self,
            id,
            base: &node.base,
            resource,
            renderer,
        };
        behavior.paint(&mut ctx, PaintPass::Before);
        for child in &node.base.children {
            self.paint_widget(*child, &mut *ctx.renderer);
        }
        behavior.paint(&mut ctx, PaintPass::After);
    }
}

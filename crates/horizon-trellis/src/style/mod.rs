//! Pluggable widget styles.
//!
//! A [`Style`] owns everything visual: it turns resource descriptors into
//! [`StyleResource`]s, recomputes widget borders before each layout pass and
//! provides the drawing primitives widgets call from their paint hooks.
//!
//! Styles are looked up by name with [`create`]. The only built-in style is
//! [`ClassicStyle`], registered as `"vector"`.

mod classic;
mod resource;

use std::sync::Arc;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{Color, Result, TrellisError};

use crate::render::{Font, FontMetrics, Renderer, TextureId};
use crate::widget::{Orientation, WidgetBase, WidgetKind};

pub use classic::ClassicStyle;
pub use resource::{Relief, StyleResource};

/// Border sizes computed by [`Style::resize`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Borders {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Borders {
    pub const fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// What a style needs to know about a widget to compute its borders.
pub struct StyleTarget<'a> {
    pub kind: WidgetKind,
    /// Title text for titled widgets (frames).
    pub title: Option<&'a str>,
    pub font: &'a dyn FontMetrics,
    pub font_scale: f32,
}

/// Sub-widgets that composite widgets build during creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StylePart {
    /// The track of a scroll bar.
    ScrollArea,
    /// The draggable lift of a scroll bar.
    ScrollCage,
    /// The item container of a tree view.
    TreeBox,
    /// The scroll bar of a tree view.
    TreeScroll,
    /// The sunken box around a text editor.
    EditBox,
}

/// A widget style.
pub trait Style: Send + Sync {
    /// Registered name of the style.
    fn name(&self) -> &str;

    /// Build the resource for a new widget from its descriptor.
    fn create_resource(&self, kind: WidgetKind, descriptor: &str) -> StyleResource {
        let _ = kind;
        StyleResource::parse(descriptor)
    }

    /// Descriptor for a composite widget's internal part.
    fn part_descriptor(&self, part: StylePart) -> String;

    /// Recompute the borders of a widget before its children are laid out.
    ///
    /// `None` leaves the current borders untouched.
    fn resize(&self, target: &StyleTarget<'_>) -> Option<Borders>;

    /// Set a named option. Unknown options are stored but ignored.
    fn set_option(&self, name: &str, value: &str);

    fn option(&self, name: &str) -> Option<String>;

    fn draw_panel(&self, renderer: &mut dyn Renderer, widget: &WidgetBase, resource: &StyleResource);

    /// Draw a beveled box. `pushed` is `Some` for pushable widgets.
    fn draw_box(
        &self,
        renderer: &mut dyn Renderer,
        widget: &WidgetBase,
        resource: &StyleResource,
        relief: Relief,
        pushed: Option<bool>,
    );

    fn draw_line(
        &self,
        renderer: &mut dyn Renderer,
        widget: &WidgetBase,
        resource: &StyleResource,
        orientation: Orientation,
    );

    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &self,
        renderer: &mut dyn Renderer,
        widget: &WidgetBase,
        resource: &StyleResource,
        text: &str,
        font: &Font,
        scale: f32,
        color: Color,
    );

    #[allow(clippy::too_many_arguments)]
    fn draw_frame(
        &self,
        renderer: &mut dyn Renderer,
        widget: &WidgetBase,
        resource: &StyleResource,
        title: &str,
        font: &Font,
        scale: f32,
        title_color: Color,
    );

    fn draw_image(
        &self,
        renderer: &mut dyn Renderer,
        widget: &WidgetBase,
        texture: TextureId,
        color: Color,
    );

    /// Draw the insertion cursor of a text editor at `(x, y)`.
    fn draw_text_cursor(&self, renderer: &mut dyn Renderer, x: f32, y: f32, height: f32);
}

/// Create a style by name.
pub fn create(name: &str) -> Result<Arc<dyn Style>> {
    match name {
        ClassicStyle::NAME => Ok(Arc::new(ClassicStyle::new())),
        _ => {
            tracing::warn!(target: targets::STYLE, name, "no such style");
            Err(TrellisError::StyleNotFound(name.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_known_style() {
        let style = create("vector").unwrap();
        assert_eq!(style.name(), "vector");
    }

    #[test]
    fn test_create_unknown_style_fails() {
        let err = create("pixmap").err().unwrap();
        assert!(matches!(err, TrellisError::StyleNotFound(ref name) if name == "pixmap"));
    }
}

//! The classic beveled vector style.

use std::collections::HashMap;

use parking_lot::RwLock;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{Color, Point, Rect};

use super::{Borders, Relief, Style, StylePart, StyleResource, StyleTarget};
use crate::render::{Font, Renderer, TextureId};
use crate::widget::{Orientation, WidgetBase, WidgetKind};

/// Horizontal offset of a frame title from the frame's left edge.
const FRAME_TITLE_OFFSET: f32 = 8.0;

/// Colors used by [`ClassicStyle`], refreshed from the style options.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Palette {
    focus: Color,
    foreground_up: Color,
    foreground_down: Color,
    shadow_dark: Color,
    shadow_bright: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            focus: Color::from_rgb(0.1, 0.1, 0.1),
            foreground_up: Color::new(0.4, 0.6, 0.7, 1.0),
            foreground_down: Color::new(0.65, 0.86, 0.86, 1.0),
            shadow_dark: Color::new(0.25, 0.25, 0.25, 1.0),
            shadow_bright: Color::new(0.9, 0.9, 0.9, 1.0),
        }
    }
}

/// Flat panels, beveled boxes and single-pixel lines.
///
/// Recognised options (values are `"r,g,b"` or `"r,g,b,a"`):
/// `color_focus`, `color_foreground_up`, `color_foreground_down`,
/// `color_shadow_dark`, `color_shadow_bright`.
pub struct ClassicStyle {
    options: RwLock<HashMap<String, String>>,
    palette: RwLock<Palette>,
}

impl Default for ClassicStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassicStyle {
    /// Name the style is registered under.
    pub const NAME: &'static str = "vector";

    pub fn new() -> Self {
        Self {
            options: RwLock::new(HashMap::new()),
            palette: RwLock::new(Palette::default()),
        }
    }

    /// Read a color option, falling back to `default` when unset or malformed.
    fn extract_color(&self, name: &str, default: Color) -> Color {
        let Some(value) = self.option(name) else {
            return default;
        };
        Color::parse_components(&value).unwrap_or_else(|| {
            tracing::warn!(target: targets::STYLE, option = name, value = %value, "malformed color option");
            default
        })
    }

    fn update_options(&self) {
        let defaults = Palette::default();
        let palette = Palette {
            focus: self.extract_color("color_focus", defaults.focus),
            foreground_up: self.extract_color("color_foreground_up", defaults.foreground_up),
            foreground_down: self.extract_color("color_foreground_down", defaults.foreground_down),
            shadow_dark: self.extract_color("color_shadow_dark", defaults.shadow_dark),
            shadow_bright: self.extract_color("color_shadow_bright", defaults.shadow_bright),
        };
        *self.palette.write() = palette;
    }

    fn palette(&self) -> Palette {
        *self.palette.read()
    }
}

/// Lower `color`'s alpha by the widget's missing opacity.
fn faded(color: Color, transparency: f32) -> Color {
    color.with_alpha(color.a - (1.0 - transparency))
}

impl Style for ClassicStyle {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn part_descriptor(&self, part: StylePart) -> String {
        match part {
            StylePart::ScrollArea | StylePart::TreeBox | StylePart::EditBox => {
                ",,LOWERED".to_string()
            }
            StylePart::ScrollCage => {
                format!(",,FLAT,{}", self.palette().foreground_down.to_components())
            }
            StylePart::TreeScroll => "18,18,RAISED".to_string(),
        }
    }

    fn resize(&self, target: &StyleTarget<'_>) -> Option<Borders> {
        match target.kind {
            WidgetKind::Box | WidgetKind::Button => Some(Borders::new(2.0, 2.0)),
            WidgetKind::Frame => {
                let title = target
                    .font
                    .size(target.title.unwrap_or_default(), target.font_scale);
                Some(Borders::new(4.0, (title.height - 2.0).max(0.0)))
            }
            _ => None,
        }
    }

    fn set_option(&self, name: &str, value: &str) {
        self.options
            .write()
            .insert(name.to_string(), value.to_string());
        self.update_options();
    }

    fn option(&self, name: &str) -> Option<String> {
        self.options.read().get(name).cloned()
    }

    fn draw_panel(&self, renderer: &mut dyn Renderer, widget: &WidgetBase, resource: &StyleResource) {
        if !widget.is_draw_background() {
            return;
        }
        let color = resource
            .color
            .unwrap_or(self.palette().foreground_down)
            .with_alpha(widget.transparency());
        renderer.set_pen_color(color);
        renderer.draw_filled_rect(widget.rect(), None);
    }

    fn draw_box(
        &self,
        renderer: &mut dyn Renderer,
        widget: &WidgetBase,
        resource: &StyleResource,
        relief: Relief,
        pushed: Option<bool>,
    ) {
        let rect = widget.rect();
        if rect.width < 4.0 || rect.height < 4.0 {
            return;
        }
        let palette = self.palette();
        let alpha = widget.transparency();
        let (x, y) = (rect.x, rect.y);
        let (w, h) = (rect.width - 1.0, rect.height - 1.0);

        if widget.is_draw_background() {
            let fill = if pushed == Some(true) {
                palette.foreground_down
            } else {
                resource.color.unwrap_or(palette.foreground_up)
            };
            renderer.set_pen_color(faded(fill, alpha));
            renderer.draw_filled_rect(Rect::new(x, y, w, h), None);
        }

        let bright = palette.shadow_bright.with_alpha(alpha);
        let dark = palette.shadow_dark.with_alpha(alpha);
        let (upper, lower) = match relief {
            Relief::Raised => (bright, dark),
            Relief::Lowered => (dark, bright),
            Relief::Flat => return,
        };
        renderer.set_pen_color(upper);
        renderer.draw_line(Point::new(x, y + h), Point::new(x + w, y + h));
        renderer.draw_line(Point::new(x, y), Point::new(x, y + h));
        renderer.set_pen_color(lower);
        renderer.draw_line(Point::new(x, y), Point::new(x + w, y));
        renderer.draw_line(Point::new(x + w, y), Point::new(x + w, y + h));
    }

    fn draw_line(
        &self,
        renderer: &mut dyn Renderer,
        widget: &WidgetBase,
        resource: &StyleResource,
        orientation: Orientation,
    ) {
        let palette = self.palette();
        let color = resource.color.unwrap_or(match resource.relief {
            Relief::Raised => palette.shadow_dark,
            _ => palette.shadow_bright,
        });
        let rect = widget.rect();
        renderer.set_pen_color(faded(color, widget.transparency()));
        match orientation {
            Orientation::Horizontal => {
                renderer.draw_line(rect.origin(), Point::new(rect.right(), rect.y))
            }
            Orientation::Vertical => {
                renderer.draw_line(rect.origin(), Point::new(rect.x, rect.top()))
            }
        }
    }

    fn draw_text(
        &self,
        renderer: &mut dyn Renderer,
        widget: &WidgetBase,
        resource: &StyleResource,
        text: &str,
        font: &Font,
        scale: f32,
        color: Color,
    ) {
        let color = resource
            .color
            .unwrap_or_else(|| color.with_alpha(widget.transparency()));
        let rect = widget.rect();
        renderer.set_pen_color(color);
        renderer.draw_text(text, font, scale, rect.x, rect.y);
    }

    fn draw_frame(
        &self,
        renderer: &mut dyn Renderer,
        widget: &WidgetBase,
        resource: &StyleResource,
        title: &str,
        font: &Font,
        scale: f32,
        title_color: Color,
    ) {
        let rect = widget.rect();
        if rect.width < 4.0 || rect.height < 4.0 {
            return;
        }
        let palette = self.palette();
        let alpha = widget.transparency();
        let bright = palette.shadow_bright.with_alpha(alpha);
        let dark = palette.shadow_dark.with_alpha(alpha);
        let (outer, inner) = match resource.relief {
            Relief::Raised => (bright, dark),
            Relief::Lowered => (dark, bright),
            Relief::Flat => (dark, dark),
        };
        let (l, b, w, h) = (rect.x, rect.y, rect.width, rect.height);
        let title_size = font.size(title, scale);

        renderer.set_pen_color(inner);
        if !title.is_empty() && w >= title_size.width + FRAME_TITLE_OFFSET && h >= title_size.height {
            renderer.draw_line(Point::new(l, b + h), Point::new(l + FRAME_TITLE_OFFSET, b + h));
            renderer.draw_line(
                Point::new(l + title_size.width + FRAME_TITLE_OFFSET + 1.0, b + h),
                Point::new(l + w, b + h),
            );
            renderer.set_pen_color(title_color.with_alpha(alpha));
            renderer.draw_text(
                title,
                font,
                scale,
                l + FRAME_TITLE_OFFSET,
                (b + h) - title_size.height / 2.0 - font.descender() * scale,
            );
            renderer.set_pen_color(inner);
        } else {
            renderer.draw_line(Point::new(l + w, b + h), Point::new(l, b + h));
        }
        renderer.draw_line(Point::new(l, b), Point::new(l, b + h));
        renderer.set_pen_color(outer);
        renderer.draw_line(Point::new(l + w, b), Point::new(l + w, b + h));
        renderer.draw_line(Point::new(l, b), Point::new(l + w, b));
    }

    fn draw_image(
        &self,
        renderer: &mut dyn Renderer,
        widget: &WidgetBase,
        texture: TextureId,
        color: Color,
    ) {
        renderer.set_pen_color(color);
        renderer.draw_filled_rect(widget.rect(), Some(texture));
    }

    fn draw_text_cursor(&self, renderer: &mut dyn Renderer, x: f32, y: f32, height: f32) {
        renderer.set_pen_color(self.palette().focus);
        renderer.draw_line(Point::new(x - 2.0, y), Point::new(x + 3.0, y));
        renderer.draw_line(Point::new(x - 2.0, y + height), Point::new(x + 3.0, y + height));
        renderer.draw_line(Point::new(x, y), Point::new(x, y + height));
    }
}

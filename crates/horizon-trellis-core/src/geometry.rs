//! Basic geometry and color types.
//!
//! All widget and window coordinates use a y-up convention: the origin is the
//! bottom-left corner, `y + height` is the top edge.

use serde::Deserialize;

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// A size in 2D space (width and height).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Check if the size has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
///
/// `x`/`y` locate the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Empty rectangle at origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The x coordinate of the right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// The y coordinate of the top edge.
    #[inline]
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point lies inside the rectangle (edges inclusive).
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.top()
    }

    /// Check if a point lies inside the rectangle.
    #[inline]
    pub fn contains_point(&self, point: Point) -> bool {
        self.contains(point.x, point.y)
    }

    /// Translate the rectangle by the given offset.
    #[inline]
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Shrink the rectangle by a horizontal and vertical inset on each side.
    ///
    /// Dimensions that would become negative collapse to zero.
    pub fn inset(&self, horizontal: f32, vertical: f32) -> Self {
        let width = if self.width > 2.0 * horizontal {
            self.width - 2.0 * horizontal
        } else {
            0.0
        };
        let height = if self.height > 2.0 * vertical {
            self.height - 2.0 * vertical
        } else {
            0.0
        };
        Self::new(self.x + horizontal, self.y + vertical, width, height)
    }
}

/// An RGBA color with components in the 0.0-1.0 range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    /// Create a new color from RGBA components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from RGB components.
    #[inline]
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::from_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::from_rgb(1.0, 1.0, 1.0);

    /// Return the same color with a different alpha.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Parse a `"r,g,b"` or `"r,g,b,a"` component list.
    ///
    /// Returns `None` when the list has the wrong arity or a component does
    /// not parse as a number.
    pub fn parse_components(text: &str) -> Option<Self> {
        let parts: Vec<f32> = text
            .split(',')
            .map(|part| part.trim().parse::<f32>().ok())
            .collect::<Option<Vec<_>>>()?;
        match parts.as_slice() {
            [r, g, b] => Some(Self::from_rgb(*r, *g, *b)),
            [r, g, b, a] => Some(Self::new(*r, *g, *b, *a)),
            _ => None,
        }
    }

    /// Format the color back into the `"r,g,b,a"` component list form.
    pub fn to_components(&self) -> String {
        format!("{},{},{},{}", self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.top(), 70.0);
        assert!(!rect.is_empty());
        assert!(Rect::ZERO.is_empty());
    }

    #[test]
    fn test_rect_contains_is_edge_inclusive() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(0.0, 0.0));
        assert!(rect.contains(10.0, 10.0));
        assert!(rect.contains(5.0, 5.0));
        assert!(!rect.contains(10.5, 5.0));
        assert!(!rect.contains(5.0, -0.1));
    }

    #[test]
    fn test_rect_inset_collapses_instead_of_going_negative() {
        let rect = Rect::new(0.0, 0.0, 10.0, 4.0);
        let inner = rect.inset(2.0, 3.0);
        assert_eq!(inner, Rect::new(2.0, 3.0, 6.0, 0.0));
    }

    #[test]
    fn test_color_components() {
        assert_eq!(
            Color::parse_components("0.1, 0.2,0.3"),
            Some(Color::new(0.1, 0.2, 0.3, 1.0))
        );
        assert_eq!(
            Color::parse_components("1,0,0,0.5"),
            Some(Color::new(1.0, 0.0, 0.0, 0.5))
        );
        assert_eq!(Color::parse_components("1,0"), None);
        assert_eq!(Color::parse_components("a,b,c"), None);
    }
}

//! Pointer cursor shapes requested by the window manager.

use cursor_icon::CursorIcon;

/// The cursor the embedder should display.
///
/// The manager only switches between the arrow and the resize shapes shown
/// while the pointer sits on a resizable window edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorShape {
    #[default]
    Arrow,
    /// East-west resize, over a left or right edge.
    ResizeHorizontal,
    /// North-south resize, over a top or bottom edge.
    ResizeVertical,
}

impl CursorShape {
    /// The platform-neutral icon for this shape.
    pub fn to_cursor_icon(self) -> CursorIcon {
        match self {
            CursorShape::Arrow => CursorIcon::Default,
            CursorShape::ResizeHorizontal => CursorIcon::EwResize,
            CursorShape::ResizeVertical => CursorIcon::NsResize,
        }
    }

    pub fn is_resize_cursor(self) -> bool {
        matches!(self, CursorShape::ResizeHorizontal | CursorShape::ResizeVertical)
    }
}

impl From<CursorShape> for CursorIcon {
    fn from(shape: CursorShape) -> Self {
        shape.to_cursor_icon()
    }
}

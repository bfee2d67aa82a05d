//! Built-in widgets.
//!
//! | widget | kind | notes |
//! |--------|------|-------|
//! | [`Panel`] | `Panel` | background only |
//! | [`BoxWidget`] | `Box` | beveled container |
//! | [`Button`] | `Button` | focusable, emits `Click` |
//! | [`CheckWidget`], [`ToggleButton`] | `Check`, `ToggleButton` | two-state, emit `StateChange` |
//! | [`Text`] | `Text` | sized from its content |
//! | [`Frame`] | `Frame` | titled border |
//! | [`Line`] | `Line` | separator |
//! | [`Image`] | `Image` | textured rectangle |
//! | [`ValueSelect`] | `ValueSelect` | bounded value |
//! | [`ScrollBar`] | `ScrollBar` | draggable lift |
//! | [`TextEdit`] | `TextEdit` | single line editor |
//! | [`TreeView`] | `TreeView` | indented rows |

mod box_widget;
mod button;
mod check;
mod frame;
mod image;
mod line;
mod panel;
mod scroll_bar;
mod text;
mod text_edit;
mod tree_view;
mod value_select;

pub use box_widget::BoxWidget;
pub use button::Button;
pub use check::{CheckWidget, ToggleButton};
pub use frame::Frame;
pub use image::Image;
pub use line::Line;
pub use panel::Panel;
pub use scroll_bar::ScrollBar;
pub use text::Text;
pub use text_edit::TextEdit;
pub use tree_view::{TreeItem, TreeView};
pub use value_select::{RangeValue, ValueSelect};

/// Direction of lines and scroll bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

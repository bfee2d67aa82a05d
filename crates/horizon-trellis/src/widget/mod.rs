//! Widget system for Horizon Trellis.
//!
//! Widgets live in a per-window arena, the [`WidgetTree`]. Each node pairs a
//! [`WidgetBase`] (geometry, flags, links, style resource) with a boxed
//! [`Widget`] behaviour that supplies the kind-specific parts: intrinsic
//! size, input overrides and painting.
//!
//! # Layout
//!
//! Children are placed by their parent's alignment engine: every child
//! carries an [`Alignment`] tag and takes its slice of the parent's
//! remaining client rectangle in insertion order. See [`layout`].
//!
//! # Events
//!
//! Pointer events travel depth-first, children before their parent; keyboard
//! events go to the window's focused widget. Everything that happens is also
//! published on the window's notification bus.
//!
//! ```ignore
//! use horizon_trellis::widget::{Alignment, widgets::Button};
//!
//! let tree = window.tree_mut();
//! let root = tree.root().unwrap();
//! let ok = tree.add(root, Button::new(), Alignment::BottomRight, "80,24,RAISED");
//! ```

mod base;
mod dispatcher;
mod focus;
pub mod layout;
mod paint;
pub(crate) mod tree;
pub mod widgets;

use std::any::Any;

use horizon_trellis_core::{Key, MouseButton, MouseButtons, Size, WidgetId};

use crate::render::FontMetrics;

pub use base::WidgetBase;
pub use layout::Alignment;
pub use paint::{PaintContext, PaintPass};
pub use tree::WidgetTree;
pub(crate) use tree::TreeEnv;
pub use widgets::{Orientation, RangeValue};

/// The closed set of widget kinds known to styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// A plain container with no visual of its own.
    Widget,
    Panel,
    Box,
    Button,
    ToggleButton,
    Check,
    Text,
    Frame,
    Line,
    Image,
    ValueSelect,
    ScrollBar,
    TextEdit,
    TreeView,
    TreeItem,
}

/// Kind-specific widget behaviour.
///
/// Every hook has a default that defers to the generic handling in
/// [`WidgetTree`], so a widget only overrides what makes it different.
/// Hooks receive the tree and their own id; the behaviour itself is
/// detached from the tree while a hook runs.
pub trait Widget: Any + Send {
    fn kind(&self) -> WidgetKind;

    /// Adjust the initial flags of a freshly allocated node.
    fn configure(&self, base: &mut WidgetBase) {
        let _ = base;
    }

    /// Called once the node is attached and has its style resource, before
    /// the `Create` notification. Composite widgets build their parts here.
    fn on_create(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        let _ = (tree, id);
    }

    /// Called after the widget's geometry changed and its children were laid
    /// out again.
    fn on_resize(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        let _ = (tree, id);
    }

    /// Called after the bounds or the value of a ranged widget changed.
    fn on_range_change(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        let _ = (tree, id);
    }

    /// Intrinsic size for widgets whose size comes from their content.
    fn content_size(&self, font: &dyn FontMetrics, scale: f32) -> Option<Size> {
        let _ = (font, scale);
        None
    }

    /// Title shown by titled widgets.
    fn title(&self) -> Option<&str> {
        None
    }

    fn range(&self) -> Option<&RangeValue> {
        None
    }

    fn range_mut(&mut self) -> Option<&mut RangeValue> {
        None
    }

    fn mouse_down(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        button: MouseButton,
        x: f32,
        y: f32,
    ) -> bool {
        tree.default_mouse_down(id, button, x, y)
    }

    fn mouse_up(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        button: MouseButton,
        x: f32,
        y: f32,
    ) -> bool {
        tree.default_mouse_up(id, button, x, y)
    }

    fn mouse_move(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        buttons: MouseButtons,
        x: f32,
        y: f32,
    ) -> bool {
        tree.default_mouse_move(id, buttons, x, y)
    }

    fn key_down(&mut self, tree: &mut WidgetTree, id: WidgetId, key: Key) -> bool {
        tree.default_key_down(id, key)
    }

    fn key_up(&mut self, tree: &mut WidgetTree, id: WidgetId, key: Key) -> bool {
        tree.default_key_up(id, key)
    }

    fn text_input(&mut self, tree: &mut WidgetTree, id: WidgetId, text: &str) -> bool {
        tree.default_text_input(id, text)
    }

    /// Draw the widget. Called once before and once after its children.
    fn paint(&self, ctx: &mut PaintContext<'_>, pass: PaintPass) {
        let _ = (ctx, pass);
    }
}

/// Downcast helpers for boxed behaviours.
impl dyn Widget {
    pub fn downcast_ref<T: Widget>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Widget>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = self;
        any.downcast_mut::<T>()
    }
}

/// A container widget with no visual of its own.
#[derive(Debug, Default)]
pub struct Container;

impl Widget for Container {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Widget
    }
}

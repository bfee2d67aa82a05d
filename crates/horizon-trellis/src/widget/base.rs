//! Widget base state.
//!
//! `WidgetBase` holds everything the tree needs to know about a node
//! independently of its kind: geometry, flags, links and the style resource.
//! Plain accessors and flag setters live here; anything that cascades through
//! the tree (relayout, notifications, redraw) is a [`WidgetTree`] method.
//!
//! [`WidgetTree`]: super::WidgetTree

use std::fmt;

use horizon_trellis_core::{Point, Rect, Size, WidgetId, WindowId};

use super::{Alignment, WidgetKind};
use crate::render::Font;
use crate::style::StyleResource;

/// The part of a widget shared by every kind.
pub struct WidgetBase {
    pub(super) kind: WidgetKind,

    pub(super) parent: Option<WidgetId>,
    pub(super) children: Vec<WidgetId>,
    pub(super) window: Option<WindowId>,

    pub(super) rect: Rect,
    /// Intrinsic geometry, independent of the layout-assigned rect.
    pub(super) default_rect: Rect,
    pub(super) alignment: Alignment,
    pub(super) padding: f32,
    pub(super) hborder: f32,
    pub(super) vborder: f32,

    pub(super) visible: bool,
    pub(super) enabled: bool,
    pub(super) pushed: bool,
    pub(super) focused: bool,
    pub(super) pointed: bool,
    pub(super) overlap: bool,
    /// Suppresses cascading layout and redraw while set.
    pub(super) frozen: bool,

    allow_focus: bool,
    allow_children: bool,
    draw_background: bool,
    move_children_on_push: bool,
    redraw_on_mouse_event: bool,
    redraw_on_mouse_move: bool,
    mouse_move_on_focus: bool,
    /// Size comes from content only; layout and `set_size` are ignored.
    auto_sized: bool,

    pub(super) transparency: f32,
    pub(super) font: Option<Font>,
    /// Zero means inherited from the window.
    pub(super) font_scale: f32,
    pub(super) resource: Option<StyleResource>,

    group_index: u32,
    user_tag: Option<String>,
}

impl WidgetBase {
    /// A detached, frozen base for a widget of `kind`.
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            window: None,
            rect: Rect::ZERO,
            default_rect: Rect::ZERO,
            alignment: Alignment::None,
            padding: 0.0,
            hborder: 0.0,
            vborder: 0.0,
            visible: true,
            enabled: true,
            pushed: false,
            focused: false,
            pointed: false,
            overlap: false,
            frozen: true,
            allow_focus: false,
            allow_children: true,
            draw_background: true,
            move_children_on_push: false,
            redraw_on_mouse_event: false,
            redraw_on_mouse_move: false,
            mouse_move_on_focus: false,
            auto_sized: false,
            transparency: 1.0,
            font: None,
            font_scale: 0.0,
            resource: None,
            group_index: 0,
            user_tag: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    // =========================================================================
    // Links
    // =========================================================================

    #[inline]
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Children in layout order.
    #[inline]
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    /// The owning window, once attached.
    #[inline]
    pub fn window(&self) -> Option<WindowId> {
        self.window
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Current geometry in window coordinates.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn pos(&self) -> Point {
        self.rect.origin()
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.rect.size()
    }

    /// Intrinsic geometry used by the parent's layout.
    #[inline]
    pub fn default_rect(&self) -> Rect {
        self.default_rect
    }

    #[inline]
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    #[inline]
    pub fn padding(&self) -> f32 {
        self.padding
    }

    #[inline]
    pub fn hborder(&self) -> f32 {
        self.hborder
    }

    #[inline]
    pub fn vborder(&self) -> f32 {
        self.vborder
    }

    /// Geometry minus borders and padding, shifted by one pixel while pushed
    /// when children move on push.
    pub fn client_rect(&self) -> Rect {
        let mut client = self
            .rect
            .inset(self.hborder + self.padding, self.vborder + self.padding);
        if self.pushed && self.move_children_on_push {
            client.x += 1.0;
            client.y -= 1.0;
        }
        client
    }

    // =========================================================================
    // State
    // =========================================================================

    /// The widget's own visibility flag. A widget is drawn only when it and
    /// all of its ancestors are visible.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn is_pushed(&self) -> bool {
        self.pushed
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether the pointer was over the widget during the last move.
    #[inline]
    pub fn is_pointed(&self) -> bool {
        self.pointed
    }

    #[inline]
    pub fn is_overlap(&self) -> bool {
        self.overlap
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[inline]
    pub fn transparency(&self) -> f32 {
        self.transparency
    }

    /// Style resource, set once the widget is attached.
    #[inline]
    pub fn resource(&self) -> Option<&StyleResource> {
        self.resource.as_ref()
    }

    /// Font override, if any.
    #[inline]
    pub fn font(&self) -> Option<&Font> {
        self.font.as_ref()
    }

    /// Font scale override, zero when inherited.
    #[inline]
    pub fn font_scale(&self) -> f32 {
        self.font_scale
    }

    // =========================================================================
    // Behavior Flags
    // =========================================================================

    #[inline]
    pub fn allows_focus(&self) -> bool {
        self.allow_focus
    }

    pub fn set_allow_focus(&mut self, allow: bool) {
        self.allow_focus = allow;
    }

    #[inline]
    pub fn allows_children(&self) -> bool {
        self.allow_children
    }

    pub fn set_allow_children(&mut self, allow: bool) {
        self.allow_children = allow;
    }

    #[inline]
    pub fn is_draw_background(&self) -> bool {
        self.draw_background
    }

    pub(super) fn set_draw_background_flag(&mut self, draw: bool) {
        self.draw_background = draw;
    }

    #[inline]
    pub fn moves_children_on_push(&self) -> bool {
        self.move_children_on_push
    }

    pub fn set_move_children_on_push(&mut self, moves: bool) {
        self.move_children_on_push = moves;
    }

    #[inline]
    pub fn redraws_on_mouse_event(&self) -> bool {
        self.redraw_on_mouse_event
    }

    pub fn set_redraw_on_mouse_event(&mut self, redraw: bool) {
        self.redraw_on_mouse_event = redraw;
    }

    #[inline]
    pub fn is_auto_sized(&self) -> bool {
        self.auto_sized
    }

    pub fn set_auto_sized(&mut self, auto_sized: bool) {
        self.auto_sized = auto_sized;
    }

    #[inline]
    pub fn redraws_on_mouse_move(&self) -> bool {
        self.redraw_on_mouse_move
    }

    pub fn set_redraw_on_mouse_move(&mut self, redraw: bool) {
        self.redraw_on_mouse_move = redraw;
    }

    /// Whether the widget receives every pointer move while focused.
    #[inline]
    pub fn mouse_move_on_focus(&self) -> bool {
        self.mouse_move_on_focus
    }

    pub fn set_mouse_move_on_focus(&mut self, on_focus: bool) {
        self.mouse_move_on_focus = on_focus;
    }

    // =========================================================================
    // User Data
    // =========================================================================

    #[inline]
    pub fn group_index(&self) -> u32 {
        self.group_index
    }

    pub fn set_group_index(&mut self, index: u32) {
        self.group_index = index;
    }

    pub fn user_tag(&self) -> Option<&str> {
        self.user_tag.as_deref()
    }

    pub fn set_user_tag(&mut self, tag: impl Into<String>) {
        self.user_tag = Some(tag.into());
    }
}

impl fmt::Debug for WidgetBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetBase")
            .field("kind", &self.kind)
            .field("rect", &self.rect)
            .field("alignment", &self.alignment)
            .field("children", &self.children.len())
            .field("visible", &self.visible)
            .field("enabled", &self.enabled)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_base_defaults() {
        let base = WidgetBase::new(WidgetKind::Panel);
        assert_eq!(base.kind(), WidgetKind::Panel);
        assert!(base.is_visible());
        assert!(base.is_enabled());
        assert!(base.is_frozen());
        assert!(base.allows_children());
        assert!(!base.allows_focus());
        assert_eq!(base.transparency(), 1.0);
        assert!(base.resource().is_none());
    }

    #[test]
    fn test_client_rect() {
        let mut base = WidgetBase::new(WidgetKind::Box);
        base.rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        base.hborder = 2.0;
        base.vborder = 2.0;
        base.padding = 3.0;
        assert_eq!(base.client_rect(), Rect::new(15.0, 15.0, 90.0, 40.0));

        base.set_move_children_on_push(true);
        base.pushed = true;
        assert_eq!(base.client_rect(), Rect::new(16.0, 14.0, 90.0, 40.0));
    }

    #[test]
    fn test_client_rect_never_negative() {
        let mut base = WidgetBase::new(WidgetKind::Frame);
        base.rect = Rect::new(0.0, 0.0, 6.0, 6.0);
        base.hborder = 4.0;
        base.vborder = 14.0;
        let client = base.client_rect();
        assert_eq!(client.width, 0.0);
        assert_eq!(client.height, 0.0);
    }
}

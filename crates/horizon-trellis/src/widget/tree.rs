//! The per-window widget arena.

use std::sync::Arc;

use slotmap::SlotMap;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{
    Color, EventBus, Rect, Result, Size, TrellisError, UiEvent, UiEventKind, UiEventPayload,
    WidgetId, WindowId,
};

use super::{Alignment, Widget, WidgetBase};
use crate::render::Font;
use crate::style::Style;
use crate::window::RedrawFlag;

pub(super) struct WidgetNode {
    pub(super) base: WidgetBase,
    /// Taken out while one of its hooks runs.
    pub(super) behavior: Option<Box<dyn Widget>>,
}

/// Window-level settings every widget of a tree inherits.
pub(crate) struct TreeEnv {
    pub(crate) window: WindowId,
    pub(crate) window_visible: bool,
    pub(crate) font: Font,
    pub(crate) font_scale: f32,
    pub(crate) text_color: Color,
    pub(crate) aspect_ratio: f32,
    pub(crate) style: Arc<dyn Style>,
    pub(crate) bus: Arc<EventBus>,
    pub(crate) redraw: RedrawFlag,
}

/// Structural changes requested while a pass was running.
enum Deferred {
    Attach {
        parent: WidgetId,
        child: WidgetId,
        descriptor: String,
    },
    Remove(WidgetId),
    RemoveAll(WidgetId),
}

/// The widgets of one window.
///
/// Nodes are addressed by [`WidgetId`]. Parents own their children through
/// the `children` lists; parent links are plain ids. Structural changes made
/// while a layout or dispatch pass is running are queued and applied when
/// the outermost pass ends.
pub struct WidgetTree {
    pub(super) nodes: SlotMap<WidgetId, WidgetNode>,
    pub(super) root: Option<WidgetId>,
    pub(super) focused: Option<WidgetId>,
    busy: u32,
    deferred: Vec<Deferred>,
    pub(super) env: TreeEnv,
}

impl WidgetTree {
    pub(crate) fn new(env: TreeEnv) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            focused: None,
            busy: 0,
            deferred: Vec::new(),
            env,
        }
    }

    // =========================================================================
    // Environment
    // =========================================================================

    /// The window owning this tree.
    pub fn window_id(&self) -> WindowId {
        self.env.window
    }

    pub fn style(&self) -> &Arc<dyn Style> {
        &self.env.style
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.env.bus
    }

    /// Window default font.
    pub fn font(&self) -> &Font {
        &self.env.font
    }

    pub fn font_scale(&self) -> f32 {
        self.env.font_scale
    }

    /// Window default text color.
    pub fn text_color(&self) -> Color {
        self.env.text_color
    }

    /// Horizontal stretch of the output surface.
    pub fn aspect_ratio(&self) -> f32 {
        self.env.aspect_ratio
    }

    pub(crate) fn env_mut(&mut self) -> &mut TreeEnv {
        &mut self.env
    }

    /// Font used by `id`: its own override or the window default.
    pub fn font_of(&self, id: WidgetId) -> Font {
        self.nodes
            .get(id)
            .and_then(|node| node.base.font.clone())
            .unwrap_or_else(|| self.env.font.clone())
    }

    pub fn font_scale_of(&self, id: WidgetId) -> f32 {
        match self.nodes.get(id) {
            Some(node) if node.base.font_scale > 0.0 => node.base.font_scale,
            _ => self.env.font_scale,
        }
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn root(&self) -> Option<WidgetId> {
        self.root
    }

    pub fn get(&self, id: WidgetId) -> Option<&WidgetBase> {
        self.nodes.get(id).map(|node| &node.base)
    }

    /// Mutable access to a widget's flags. Changes made here do not trigger
    /// layout or redraw.
    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut WidgetBase> {
        self.nodes.get_mut(id).map(|node| &mut node.base)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The behavior of `id` downcast to `T`.
    pub fn widget<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        self.nodes.get(id)?.behavior.as_deref()?.downcast_ref::<T>()
    }

    /// Run `f` with the behavior of `id` downcast to `T`.
    ///
    /// The behavior is detached while `f` runs, so `f` may freely use the
    /// tree.
    pub fn with_widget<T, R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut T, &mut WidgetTree) -> R,
    ) -> Result<R>
    where
        T: Widget,
    {
        let mut behavior = self
            .nodes
            .get_mut(id)
            .and_then(|node| node.behavior.take())
            .ok_or(TrellisError::WidgetNotFound(id))?;
        let result = behavior
            .downcast_mut::<T>()
            .map(|widget| f(widget, self))
            .ok_or(TrellisError::WidgetNotFound(id));
        if let Some(node) = self.nodes.get_mut(id) {
            node.behavior = Some(behavior);
        }
        result
    }

    /// Run a hook on the behavior of `id`. Returns `None` when the node is
    /// gone or its behavior is already detached.
    pub(super) fn with_behavior<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut WidgetTree) -> R,
    ) -> Option<R> {
        let mut behavior = self.nodes.get_mut(id)?.behavior.take()?;
        let result = f(behavior.as_mut(), self);
        if let Some(node) = self.nodes.get_mut(id) {
            node.behavior = Some(behavior);
        }
        Some(result)
    }

    pub(super) fn content_size(&self, id: WidgetId) -> Option<Size> {
        let behavior = self.nodes.get(id)?.behavior.as_ref()?;
        let font = self.font_of(id);
        behavior.content_size(font.as_ref(), self.font_scale_of(id))
    }

    fn accepts_size(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(|node| !node.base.is_auto_sized())
    }

    /// Whether the widget and all its ancestors are visible in a visible
    /// window.
    pub fn is_visible(&self, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            match self.nodes.get(id) {
                Some(node) if node.base.visible => current = node.base.parent,
                _ => return false,
            }
        }
        self.env.window_visible
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Publish a notification from `id` on the window's bus.
    pub fn emit(&self, id: WidgetId, kind: UiEventKind, payload: UiEventPayload) {
        self.env
            .bus
            .push(UiEvent::widget(kind, id).with_payload(payload));
    }

    /// Request a redraw unless the widget is frozen.
    pub fn refresh(&self, id: WidgetId) {
        if self.nodes.get(id).is_some_and(|node| !node.base.frozen) {
            self.env.redraw.request();
        }
    }

    /// Request a redraw regardless of any widget state.
    pub(crate) fn request_redraw(&self) {
        self.env.redraw.request();
    }

    fn refresh_parent(&self, id: WidgetId) {
        if let Some(parent) = self.nodes.get(id).and_then(|node| node.base.parent) {
            self.refresh(parent);
        }
    }

    // =========================================================================
    // Passes
    // =========================================================================

    pub(super) fn begin_pass(&mut self) {
        self.busy += 1;
    }

    /// End a pass, applying queued structural changes once the outermost
    /// pass is done.
    pub(super) fn end_pass(&mut self) {
        self.busy = self.busy.saturating_sub(1);
        while self.busy == 0 && !self.deferred.is_empty() {
            let deferred = std::mem::take(&mut self.deferred);
            tracing::debug!(target: targets::WIDGET, count = deferred.len(), "applying deferred changes");
            for change in deferred {
                match change {
                    Deferred::Attach {
                        parent,
                        child,
                        descriptor,
                    } => {
                        if self.nodes.contains_key(parent) {
                            self.attach(parent, child, &descriptor);
                        } else {
                            self.nodes.remove(child);
                        }
                    }
                    Deferred::Remove(id) => self.remove_now(id),
                    Deferred::RemoveAll(id) => self.remove_all_now(id),
                }
            }
        }
    }

    /// Whether a layout or dispatch pass is running.
    pub fn is_busy(&self) -> bool {
        self.busy > 0
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Add `widget` as the last child of `parent`.
    ///
    /// The descriptor is handed to the style to build the widget's resource.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not exist or does not accept children.
    pub fn add(
        &mut self,
        parent: WidgetId,
        widget: impl Widget,
        alignment: Alignment,
        descriptor: &str,
    ) -> WidgetId {
        self.add_boxed(parent, Box::new(widget), alignment, descriptor, false)
    }

    /// Add a child that is placed by layout but reserves no space.
    pub fn add_overlapping(
        &mut self,
        parent: WidgetId,
        widget: impl Widget,
        alignment: Alignment,
        descriptor: &str,
    ) -> WidgetId {
        self.add_boxed(parent, Box::new(widget), alignment, descriptor, true)
    }

    pub fn add_boxed(
        &mut self,
        parent: WidgetId,
        widget: Box<dyn Widget>,
        alignment: Alignment,
        descriptor: &str,
        overlap: bool,
    ) -> WidgetId {
        let parent_base = match self.nodes.get(parent) {
            Some(node) => &node.base,
            None => panic!("cannot add a child to unknown widget {parent:?}"),
        };
        assert!(
            parent_base.allows_children(),
            "{:?} widget {parent:?} does not accept children",
            parent_base.kind
        );

        let mut base = WidgetBase::new(widget.kind());
        widget.configure(&mut base);
        base.alignment = alignment;
        base.overlap = overlap;
        if base.font.is_none() {
            base.font = parent_base.font.clone();
        }
        if base.font_scale <= 0.0 {
            base.font_scale = parent_base.font_scale;
        }
        base.window = Some(self.env.window);
        base.parent = Some(parent);

        let kind = base.kind;
        let id = self.nodes.insert(WidgetNode {
            base,
            behavior: Some(widget),
        });
        tracing::debug!(target: targets::WIDGET, ?id, ?kind, ?parent, "adding widget");

        if self.is_busy() {
            self.deferred.push(Deferred::Attach {
                parent,
                child: id,
                descriptor: descriptor.to_string(),
            });
        } else {
            self.attach(parent, id, descriptor);
        }
        id
    }

    fn attach(&mut self, parent: WidgetId, id: WidgetId, descriptor: &str) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.base.children.push(id);
        }
        self.init(id, descriptor);
        self.resize_children(parent);
    }

    /// Build the resource, run the creation hook and unfreeze.
    fn init(&mut self, id: WidgetId, descriptor: &str) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let resource = self.env.style.create_resource(node.base.kind, descriptor);
        let size = Size::new(resource.width, resource.height);
        node.base.resource = Some(resource);

        self.resize_widget(id, size.width, size.height);
        self.with_behavior(id, |widget, tree| widget.on_create(tree, id));
        self.emit(id, UiEventKind::Create, UiEventPayload::None);
        if let Some(node) = self.nodes.get_mut(id) {
            node.base.frozen = false;
        }
    }

    /// Install the root widget of the window, sized to `size`.
    pub(crate) fn create_root(
        &mut self,
        widget: Box<dyn Widget>,
        descriptor: &str,
        padding: f32,
        size: Size,
    ) -> WidgetId {
        let mut base = WidgetBase::new(widget.kind());
        widget.configure(&mut base);
        base.window = Some(self.env.window);
        base.padding = padding;
        let id = self.nodes.insert(WidgetNode {
            base,
            behavior: Some(widget),
        });
        self.root = Some(id);

        if let Some(node) = self.nodes.get_mut(id) {
            node.base.resource = Some(self.env.style.create_resource(node.base.kind, descriptor));
        }
        self.with_behavior(id, |widget, tree| widget.on_create(tree, id));
        self.emit(id, UiEventKind::Create, UiEventPayload::None);
        self.set_pos(id, 0.0, 0.0);
        self.apply_size(id, size.width, size.height);
        self.unfreeze(id);
        id
    }

    fn unfreeze(&mut self, id: WidgetId) {
        let children = self.children_of(id);
        for child in children {
            self.unfreeze(child);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.base.frozen = false;
        }
    }

    pub(super) fn children_of(&self, id: WidgetId) -> Vec<WidgetId> {
        self.nodes
            .get(id)
            .map(|node| node.base.children.clone())
            .unwrap_or_default()
    }

    /// Remove a widget and its subtree.
    ///
    /// Every removed widget is notified with `Destroy`, children first.
    pub fn remove(&mut self, id: WidgetId) {
        if self.is_busy() {
            self.deferred.push(Deferred::Remove(id));
        } else {
            self.remove_now(id);
        }
    }

    /// Remove every child of `id`.
    pub fn remove_all(&mut self, id: WidgetId) {
        if self.is_busy() {
            self.deferred.push(Deferred::RemoveAll(id));
        } else {
            self.remove_all_now(id);
        }
    }

    fn remove_now(&mut self, id: WidgetId) {
        let Some(parent) = self.nodes.get(id).and_then(|node| node.base.parent) else {
            tracing::warn!(target: targets::WIDGET, ?id, "cannot remove a root or unknown widget");
            return;
        };
        if let Some(node) = self.nodes.get_mut(parent) {
            node.base.children.retain(|child| *child != id);
        }
        self.destroy_subtree(id);
        self.resize_children(parent);
        self.refresh(parent);
    }

    fn remove_all_now(&mut self, id: WidgetId) {
        let children = match self.nodes.get_mut(id) {
            Some(node) => std::mem::take(&mut node.base.children),
            None => return,
        };
        for child in children {
            self.destroy_subtree(child);
        }
        self.refresh(id);
    }

    fn destroy_subtree(&mut self, id: WidgetId) {
        for child in self.children_of(id) {
            self.destroy_subtree(child);
        }
        if self.focused == Some(id) {
            self.focused = None;
            self.emit(id, UiEventKind::LostFocus, UiEventPayload::None);
        }
        self.emit(id, UiEventKind::Destroy, UiEventPayload::None);
        self.nodes.remove(id);
    }

    /// Destroy every widget, children first.
    pub(crate) fn destroy(&mut self) {
        if let Some(root) = self.root.take() {
            self.destroy_subtree(root);
        }
        self.focused = None;
        self.deferred.clear();
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Move a widget and its children by the same delta.
    pub fn set_pos(&mut self, id: WidgetId, x: f32, y: f32) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let (dx, dy) = (x - node.base.rect.x, y - node.base.rect.y);
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        node.base.rect.x = x;
        node.base.rect.y = y;
        for child in self.children_of(id) {
            if let Some(rect) = self.get(child).map(WidgetBase::rect) {
                self.set_pos(child, rect.x + dx, rect.y + dy);
            }
        }
        self.refresh_parent(id);
        self.refresh(id);
    }

    /// Set the intrinsic and current size of a widget and relayout.
    ///
    /// Ignored by auto-sized widgets.
    pub fn set_size(&mut self, id: WidgetId, width: f32, height: f32) {
        if !self.accepts_size(id) {
            return;
        }
        self.set_intrinsic_size(id, width, height);
    }

    /// Set the intrinsic and current size, even for auto-sized widgets.
    pub(crate) fn set_intrinsic_size(&mut self, id: WidgetId, width: f32, height: f32) {
        self.refresh_parent(id);
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let (width, height) = (width.max(0.0), height.max(0.0));
        node.base.default_rect.width = width;
        node.base.default_rect.height = height;
        node.base.rect.width = width;
        node.base.rect.height = height;
        self.event_resize(id);
    }

    pub fn set_rect(&mut self, id: WidgetId, rect: Rect) {
        self.set_pos(id, rect.x, rect.y);
        self.resize_widget(id, rect.width, rect.height);
    }

    /// Size imposed from outside. Ignored by auto-sized widgets; a zero size
    /// on a still empty content widget resizes it to its content.
    pub(crate) fn resize_widget(&mut self, id: WidgetId, width: f32, height: f32) {
        if !self.accepts_size(id) {
            return;
        }
        let empty = self
            .get(id)
            .is_some_and(|base| base.rect.width == 0.0 && base.rect.height == 0.0);
        if width == 0.0 && height == 0.0 && empty {
            if let Some(size) = self.content_size(id) {
                self.apply_size(id, size.width, size.height);
                return;
            }
        }
        self.apply_size(id, width, height);
    }

    /// Resize without consulting the behavior.
    pub(crate) fn apply_size(&mut self, id: WidgetId, width: f32, height: f32) {
        self.refresh_parent(id);
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let base = &mut node.base;
        // The first non-empty size of an empty widget becomes its intrinsic size.
        if (width != 0.0 || height != 0.0) && base.rect.width == 0.0 && base.rect.height == 0.0 {
            base.default_rect = Rect::new(base.rect.x, base.rect.y, width, height);
        }
        base.rect.width = width.max(0.0);
        base.rect.height = height.max(0.0);
        self.event_resize(id);
    }

    /// Relayout around a widget whose geometry changed.
    fn event_resize(&mut self, id: WidgetId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if node.base.frozen {
            return;
        }
        if let Some(parent) = node.base.parent {
            self.resize_children(parent);
        }
        self.resize_children(id);
        self.refresh(id);
        self.with_behavior(id, |widget, tree| widget.on_resize(tree, id));
    }

    pub fn set_padding(&mut self, id: WidgetId, padding: f32) {
        if let Some(base) = self.get_mut(id) {
            base.padding = padding.max(0.0);
            self.event_resize(id);
        }
    }

    pub fn set_alignment(&mut self, id: WidgetId, alignment: Alignment) {
        if let Some(base) = self.get_mut(id) {
            base.alignment = alignment;
            self.event_resize(id);
        }
    }

    /// Override the style-computed borders until the next layout pass.
    pub fn set_borders(&mut self, id: WidgetId, horizontal: f32, vertical: f32) {
        let Some(base) = self.get_mut(id) else {
            return;
        };
        base.hborder = horizontal;
        base.vborder = vertical;
        if !base.frozen {
            self.resize_children(id);
        }
        self.refresh(id);
    }

    // =========================================================================
    // Appearance
    // =========================================================================

    pub fn set_draw_background(&mut self, id: WidgetId, draw: bool) {
        if let Some(base) = self.get_mut(id) {
            base.set_draw_background_flag(draw);
            self.refresh(id);
        }
    }

    pub fn set_transparency(&mut self, id: WidgetId, alpha: f32) {
        if let Some(base) = self.get_mut(id) {
            base.transparency = alpha;
            self.refresh(id);
        }
    }

    pub fn set_font(&mut self, id: WidgetId, font: Font) {
        if let Some(base) = self.get_mut(id) {
            base.font = Some(font);
            self.fit_content(id);
            self.resize_children(id);
            self.refresh(id);
        }
    }

    pub fn set_font_scale(&mut self, id: WidgetId, scale: f32) {
        if let Some(base) = self.get_mut(id) {
            base.font_scale = scale;
            self.fit_content(id);
            self.resize_children(id);
            self.refresh(id);
        }
    }

    /// Resize a content widget to its current content.
    pub(crate) fn fit_content(&mut self, id: WidgetId) {
        if let Some(size) = self.content_size(id) {
            self.set_intrinsic_size(id, size.width, size.height);
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Show or hide a widget.
    ///
    /// Showing notifies the widget then its visible children; hiding
    /// notifies the children first.
    pub fn set_visible(&mut self, id: WidgetId, visible: bool) {
        let Some(base) = self.get_mut(id) else {
            return;
        };
        if base.visible == visible {
            return;
        }
        base.visible = visible;
        if visible {
            self.notify_show(id);
            self.refresh(id);
        } else {
            self.notify_hide(id);
            self.refresh_parent(id);
        }
    }

    pub(crate) fn notify_show(&self, id: WidgetId) {
        self.emit(id, UiEventKind::Show, UiEventPayload::None);
        for child in self.children_of(id) {
            if self.get(child).is_some_and(WidgetBase::is_visible) {
                self.notify_show(child);
            }
        }
    }

    pub(crate) fn notify_hide(&self, id: WidgetId) {
        for child in self.children_of(id) {
            if self.get(child).is_some_and(WidgetBase::is_visible) {
                self.notify_hide(child);
            }
        }
        self.emit(id, UiEventKind::Hide, UiEventPayload::None);
    }

    /// Enable or disable a widget and its subtree.
    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) {
        let Some(base) = self.get_mut(id) else {
            return;
        };
        if base.enabled == enabled {
            return;
        }
        base.enabled = enabled;
        if enabled {
            self.emit(id, UiEventKind::Enable, UiEventPayload::None);
            for child in self.children_of(id) {
                self.set_enabled(child, true);
            }
        } else {
            for child in self.children_of(id) {
                self.set_enabled(child, false);
            }
            self.emit(id, UiEventKind::Disable, UiEventPayload::None);
        }
        self.refresh(id);
    }
}

impl std::fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetTree")
            .field("window", &self.env.window)
            .field("widgets", &self.nodes.len())
            .field("root", &self.root)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

use horizon_trellis_core::{Result, TrellisError, WidgetId};

use super::{BoxWidget, Panel, RangeValue, ScrollBar, Text};
use crate::style::StylePart;
use crate::widget::{Alignment, Widget, WidgetBase, WidgetKind, WidgetTree};

/// Width reserved per nesting level and for the expand handle.
const INDENT: &str = "12,0";

/// Width rows ask for; layout clamps it to the item box.
const ROW_WIDTH: f32 = 1000.0;

/// One row of a [`TreeView`]: indentation, an expand handle and the item.
#[derive(Debug, Default)]
pub struct TreeItem;

impl Widget for TreeItem {
    fn kind(&self) -> WidgetKind {
        WidgetKind::TreeItem
    }

    fn configure(&self, base: &mut WidgetBase) {
        base.set_draw_background_flag(false);
    }
}

#[derive(Debug, Clone, Copy)]
struct Row {
    row: WidgetId,
    handle: WidgetId,
    content: WidgetId,
    level: usize,
    parent: Option<WidgetId>,
}

/// A vertical list of indented rows with a scroll bar.
///
/// Items are arbitrary widgets. Rows are addressed by the id of the item
/// widget they hold.
#[derive(Debug, Default)]
pub struct TreeView {
    scroll: Option<WidgetId>,
    item_box: Option<WidgetId>,
    rows: Vec<Row>,
}

impl TreeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_bar(&self) -> Option<WidgetId> {
        self.scroll
    }

    /// Item widgets in insertion order.
    pub fn items(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.rows.iter().map(|row| row.content)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Nesting depth of an item, 0 for top-level items.
    pub fn level(&self, item: WidgetId) -> Option<usize> {
        self.row_of(item).map(|row| row.level)
    }

    pub fn parent_item(&self, item: WidgetId) -> Option<WidgetId> {
        self.row_of(item)?.parent
    }

    /// The row widget holding `item`.
    pub fn row_widget(&self, item: WidgetId) -> Option<WidgetId> {
        self.row_of(item).map(|row| row.row)
    }

    fn row_of(&self, item: WidgetId) -> Option<&Row> {
        self.rows.iter().find(|row| row.content == item)
    }

    fn add_item(
        &mut self,
        tree: &mut WidgetTree,
        view: WidgetId,
        parent: Option<WidgetId>,
        content: Box<dyn Widget>,
        descriptor: &str,
    ) -> Result<WidgetId> {
        let item_box = self.item_box.ok_or(TrellisError::WidgetNotFound(view))?;
        let parent_row = match parent {
            Some(parent) => Some(*self.row_of(parent).ok_or(TrellisError::WidgetNotFound(parent))?),
            None => None,
        };
        let level = parent_row.map_or(0, |row| row.level + 1);

        let row = tree.add(item_box, TreeItem, Alignment::TopLeft, "");
        for _ in 0..level {
            let indent = tree.add(row, Panel::new(), Alignment::Left, INDENT);
            tree.set_draw_background(indent, false);
        }
        let handle = tree.add(row, Text::new(" "), Alignment::Left, INDENT);
        let content = tree.add_boxed(row, content, Alignment::Left, descriptor, false);
        let height = tree.get(content).map_or(0.0, |base| base.rect().height);
        tree.apply_size(row, ROW_WIDTH, height);

        if let Some(parent_row) = parent_row {
            tree.set_text(parent_row.handle, "-")?;
        }
        self.rows.push(Row {
            row,
            handle,
            content,
            level,
            parent: parent_row.map(|row| row.content),
        });
        Ok(content)
    }
}

impl Widget for TreeView {
    fn kind(&self) -> WidgetKind {
        WidgetKind::TreeView
    }

    fn configure(&self, base: &mut WidgetBase) {
        base.set_allow_focus(true);
    }

    fn on_create(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        let style = tree.style().clone();
        self.scroll = Some(tree.add(
            id,
            ScrollBar::vertical(RangeValue::new(0.0, 0.0, 0.0, 2.0)),
            Alignment::Right,
            &style.part_descriptor(StylePart::TreeScroll),
        ));
        let item_box = tree.add(
            id,
            BoxWidget::new(),
            Alignment::Fill,
            &style.part_descriptor(StylePart::TreeBox),
        );
        tree.set_draw_background(item_box, false);
        tree.set_padding(item_box, 1.0);
        self.item_box = Some(item_box);
    }
}

impl WidgetTree {
    /// Append an item to a tree view, under `parent` when given.
    ///
    /// Returns the id of the item widget. Fails when `view` is not a tree
    /// view or `parent` is not one of its items.
    pub fn add_tree_item(
        &mut self,
        view: WidgetId,
        parent: Option<WidgetId>,
        item: impl Widget,
        descriptor: &str,
    ) -> Result<WidgetId> {
        self.with_widget::<TreeView, _>(view, |tree_view, tree| {
            tree_view.add_item(tree, view, parent, Box::new(item), descriptor)
        })?
    }

    /// Expand an item in place.
    ///
    /// Not supported yet: fails with `Unimplemented` for items of `view`.
    pub fn expand_tree_item(&mut self, view: WidgetId, item: WidgetId) -> Result<()> {
        let known = self
            .widget::<TreeView>(view)
            .ok_or(TrellisError::WidgetNotFound(view))?
            .row_of(item)
            .is_some();
        if known {
            Err(TrellisError::Unimplemented("tree item expansion"))
        } else {
            Err(TrellisError::WidgetNotFound(item))
        }
    }

    /// Remove every item of a tree view.
    pub fn clear_tree_items(&mut self, view: WidgetId) -> Result<()> {
        self.with_widget::<TreeView, _>(view, |tree_view, tree| {
            if let Some(item_box) = tree_view.item_box {
                tree.remove_all(item_box);
            }
            tree_view.rows.clear();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::tree::tests::tree_with_root;

    fn view(tree: &mut WidgetTree, root: WidgetId) -> WidgetId {
        tree.add(root, TreeView::new(), Alignment::Fill, "")
    }

    #[test]
    fn test_children_are_indented() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let view = view(&mut tree, root);
        let parent = tree.add_tree_item(view, None, Text::new("Root"), "").unwrap();
        let child = tree
            .add_tree_item(view, Some(parent), Text::new("Child"), "")
            .unwrap();

        let tree_view = tree.widget::<TreeView>(view).unwrap();
        assert_eq!(tree_view.len(), 2);
        assert_eq!(tree_view.level(child), Some(1));
        assert_eq!(tree_view.parent_item(child), Some(parent));

        let indent = tree.get(child).unwrap().rect().x - tree.get(parent).unwrap().rect().x;
        assert_eq!(indent, 13.0);
        let row = tree.widget::<TreeView>(view).and_then(|v| v.row_of(parent).copied()).unwrap();
        assert_eq!(tree.text(row.handle).as_deref(), Some("-"));
    }

    #[test]
    fn test_rows_stack_from_the_top() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let view = view(&mut tree, root);
        let first = tree.add_tree_item(view, None, Text::new("a"), "").unwrap();
        let second = tree.add_tree_item(view, None, Text::new("b"), "").unwrap();
        assert!(tree.get(first).unwrap().rect().y > tree.get(second).unwrap().rect().y);
    }

    #[test]
    fn test_unknown_parent_fails() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let view = view(&mut tree, root);
        let result = tree.add_tree_item(view, Some(root), Text::new("x"), "");
        assert!(matches!(result, Err(TrellisError::WidgetNotFound(id)) if id == root));
    }

    #[test]
    fn test_expand_is_unimplemented() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let view = view(&mut tree, root);
        let item = tree.add_tree_item(view, None, Text::new("a"), "").unwrap();
        assert!(matches!(
            tree.expand_tree_item(view, item),
            Err(TrellisError::Unimplemented(_))
        ));
        assert!(matches!(
            tree.expand_tree_item(view, root),
            Err(TrellisError::WidgetNotFound(_))
        ));
    }

    #[test]
    fn test_clear_removes_rows() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let view = view(&mut tree, root);
        let item = tree.add_tree_item(view, None, Text::new("a"), "").unwrap();
        tree.clear_tree_items(view).unwrap();
        assert!(!tree.contains(item));
        assert!(tree.widget::<TreeView>(view).unwrap().is_empty());
    }
}

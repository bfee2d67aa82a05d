use horizon_trellis_core::{Key, Result, UiEventKind, UiEventPayload, WidgetId};

use super::{BoxWidget, Text};
use crate::style::StylePart;
use crate::widget::{
    Alignment, PaintContext, PaintPass, Widget, WidgetBase, WidgetKind, WidgetTree,
};

/// A single line text editor.
///
/// The text is shown in a sunken box. When it does not fit, only a window
/// of it is displayed and the window follows the cursor. Cursor positions
/// count characters, not bytes.
#[derive(Debug, Default)]
pub struct TextEdit {
    text: String,
    read_only: bool,
    cursor: usize,
    /// First displayed character.
    start: usize,
    /// Number of displayed characters.
    visible: usize,
    edit_box: Option<WidgetId>,
    label: Option<WidgetId>,
}

impl TextEdit {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The displayed part of the text.
    pub fn visible_text(&self) -> String {
        self.text.chars().skip(self.start).take(self.visible).collect()
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(index, _)| index)
    }

    pub(super) fn set_text(&mut self, tree: &mut WidgetTree, id: WidgetId, text: &str) {
        if self.text == text {
            return;
        }
        if self.text.is_empty() {
            self.cursor = 0;
            self.start = 0;
        }
        self.text = text.to_string();
        self.cursor = self.cursor.min(self.char_count());
        self.compute_visible(tree);
        if let Some(parent) = tree.get(id).and_then(WidgetBase::parent) {
            tree.refresh(parent);
        }
        if self.start + self.visible >= self.char_count() {
            self.start = 0;
        }
        self.update_label(tree);
        tree.refresh(id);
        tree.emit(id, UiEventKind::TextChange, UiEventPayload::Text(self.text.clone()));
    }

    /// Count how many characters from `start` fit inside the edit box.
    fn compute_visible(&mut self, tree: &WidgetTree) {
        let (Some(edit_box), Some(label)) = (
            self.edit_box.and_then(|id| tree.get(id)),
            self.label,
        ) else {
            self.visible = 0;
            return;
        };
        let mut space =
            edit_box.rect().width - edit_box.hborder() * 2.0 - edit_box.padding() * 2.0;
        let font = tree.font_of(label);
        let scale = tree.font_scale_of(label);

        let mut count = 0;
        let mut glyph = [0; 4];
        for c in self.text.chars().skip(self.start) {
            if space <= 0.0 {
                break;
            }
            let width = font.size(c.encode_utf8(&mut glyph), scale).width;
            if space < width {
                break;
            }
            space -= width;
            count += 1;
        }
        self.visible = count;
    }

    /// Move the displayed window so the cursor stays inside it.
    fn follow_cursor(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        self.compute_visible(tree);
        if self.cursor < self.start {
            self.start = self.cursor;
        } else if self.cursor > self.start + self.visible && self.visible != self.char_count() {
            self.start = self.cursor - self.visible;
        }
        self.compute_visible(tree);
        self.update_label(tree);
        tree.refresh(id);
    }

    fn update_label(&self, tree: &mut WidgetTree) {
        if let Some(label) = self.label {
            let _ = tree.set_text(label, &self.visible_text());
        }
        if let Some(edit_box) = self.edit_box {
            tree.refresh(edit_box);
        }
    }
}

impl Widget for TextEdit {
    fn kind(&self) -> WidgetKind {
        WidgetKind::TextEdit
    }

    fn configure(&self, base: &mut WidgetBase) {
        base.set_allow_focus(true);
    }

    fn on_create(&mut self, tree: &mut WidgetTree, id: WidgetId) {
        let descriptor = tree.style().part_descriptor(StylePart::EditBox);
        let edit_box = tree.add(id, BoxWidget::new(), Alignment::Fill, &descriptor);
        self.edit_box = Some(edit_box);
        self.cursor = 0;
        self.start = 0;
        self.compute_visible(tree);
        self.label = Some(tree.add(
            edit_box,
            Text::new(self.visible_text()),
            Alignment::HCenter,
            "",
        ));
    }

    fn on_resize(&mut self, tree: &mut WidgetTree, _id: WidgetId) {
        self.compute_visible(tree);
        self.update_label(tree);
    }

    fn key_down(&mut self, tree: &mut WidgetTree, id: WidgetId, key: Key) -> bool {
        let consumed = tree.default_key_down(id, key);
        if self.read_only {
            return consumed;
        }
        let len = self.char_count();
        match key {
            Key::Left => self.cursor = self.cursor.saturating_sub(1),
            Key::Right => self.cursor = (self.cursor + 1).min(len),
            Key::Home => self.cursor = 0,
            Key::End => self.cursor = len,
            Key::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let mut text = self.text.clone();
                    text.remove(self.byte_index(self.cursor));
                    self.set_text(tree, id, &text);
                }
            }
            Key::Delete => {
                if self.cursor < len {
                    let mut text = self.text.clone();
                    text.remove(self.byte_index(self.cursor));
                    self.set_text(tree, id, &text);
                }
            }
            _ => return consumed,
        }
        self.follow_cursor(tree, id);
        true
    }

    fn text_input(&mut self, tree: &mut WidgetTree, id: WidgetId, text: &str) -> bool {
        let consumed = tree.default_text_input(id, text);
        if self.read_only {
            return consumed;
        }
        let mut updated = self.text.clone();
        updated.insert_str(self.byte_index(self.cursor), text);
        self.set_text(tree, id, &updated);
        self.cursor += text.chars().count();
        self.follow_cursor(tree, id);
        true
    }

    fn paint(&self, ctx: &mut PaintContext<'_>, pass: PaintPass) {
        if pass != PaintPass::After || self.read_only || !ctx.base().is_focused() {
            return;
        }
        let tree = ctx.tree();
        let Some((label, base)) = self.label.and_then(|id| Some((id, tree.get(id)?))) else {
            return;
        };
        let shown: String = self
            .text
            .chars()
            .skip(self.start)
            .take(self.cursor.saturating_sub(self.start))
            .collect();
        let offset = tree.font_of(label).size(&shown, tree.font_scale_of(label)).width;
        let rect = base.rect();
        let style = ctx.style();
        style.draw_text_cursor(ctx.renderer(), rect.x + offset, rect.y - 2.0, rect.height);
    }
}

impl WidgetTree {
    pub fn set_read_only(&mut self, id: WidgetId, read_only: bool) -> Result<()> {
        self.with_widget::<TextEdit, _>(id, |edit, _| edit.read_only = read_only)?;
        self.refresh(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::tree::tests::tree_with_root;

    fn editor(tree: &mut WidgetTree, root: WidgetId, text: &str) -> WidgetId {
        let edit = tree.add(root, TextEdit::new(text), Alignment::Center, "100,24");
        tree.set_focus(edit);
        edit
    }

    fn label_text(tree: &WidgetTree, edit: WidgetId) -> String {
        let label = tree.widget::<TextEdit>(edit).and_then(|edit| edit.label).unwrap();
        tree.text(label).unwrap()
    }

    #[test]
    fn test_typing_inserts_at_cursor() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let edit = editor(&mut tree, root, "");
        tree.bus().clear();

        assert!(tree.text_input(edit, "hello"));
        assert_eq!(tree.text(edit).as_deref(), Some("hello"));
        assert_eq!(label_text(&tree, edit), "hello");
        assert!(tree.bus().drain().iter().any(|event| {
            event.kind == UiEventKind::TextChange
                && event.payload == UiEventPayload::Text("hello".into())
        }));

        tree.key_down(edit, Key::Left);
        tree.key_down(edit, Key::Backspace);
        assert_eq!(tree.text(edit).as_deref(), Some("helo"));
        assert_eq!(tree.widget::<TextEdit>(edit).unwrap().cursor(), 3);

        tree.key_down(edit, Key::Home);
        tree.key_down(edit, Key::Delete);
        tree.text_input(edit, "H");
        assert_eq!(tree.text(edit).as_deref(), Some("Helo"));

        tree.key_down(edit, Key::End);
        assert_eq!(tree.widget::<TextEdit>(edit).unwrap().cursor(), 4);
    }

    #[test]
    fn test_display_window_follows_cursor() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let edit = editor(&mut tree, root, "");
        // 100px box minus 2px borders on both sides fits 12 glyphs of 8px.
        tree.text_input(edit, "abcdefghijklmno");
        assert_eq!(label_text(&tree, edit), "defghijklmno");

        tree.key_down(edit, Key::Home);
        assert_eq!(label_text(&tree, edit), "abcdefghijkl");
    }

    #[test]
    fn test_read_only_ignores_input() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let edit = tree.add(root, TextEdit::new("fixed").read_only(), Alignment::Fill, "");
        tree.set_focus(edit);
        assert!(!tree.text_input(edit, "x"));
        assert!(!tree.key_down(edit, Key::Backspace));
        assert_eq!(tree.text(edit).as_deref(), Some("fixed"));
    }

    #[test]
    fn test_disabled_editor_keeps_its_text() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let edit = editor(&mut tree, root, "ab");
        tree.set_enabled(edit, false);
        tree.bus().clear();

        assert!(!tree.text_input(edit, "x"));
        assert!(!tree.key_down(edit, Key::Backspace));
        assert_eq!(tree.text(edit).as_deref(), Some("ab"));
        assert!(
            !tree
                .bus()
                .drain()
                .iter()
                .any(|event| event.kind == UiEventKind::TextChange)
        );
    }

    #[test]
    fn test_set_text_emits_change() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let edit = editor(&mut tree, root, "one");
        assert_eq!(label_text(&tree, edit), "one");
        tree.bus().clear();

        tree.set_text(edit, "two").unwrap();
        tree.set_text(edit, "two").unwrap();
        let changes = tree
            .bus()
            .drain()
            .into_iter()
            .filter(|event| event.kind == UiEventKind::TextChange)
            .count();
        assert_eq!(changes, 1);
        assert_eq!(label_text(&tree, edit), "two");
    }
}

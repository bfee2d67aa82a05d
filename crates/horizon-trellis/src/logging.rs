//! Diagnostics for widget trees.
//!
//! [`WidgetTreeDebug`] renders a window's widget hierarchy as text, which is
//! handy in logs and failing tests:
//!
//! ```ignore
//! use horizon_trellis::logging::WidgetTreeDebug;
//!
//! tracing::debug!("{}", WidgetTreeDebug::new().format(window.tree()));
//! ```
//!
//! ```text
//! Widget Tree (4 widgets):
//! Panel [0,0 200x100]
//! ├── Box [0,0 200x100]
//! │  └── Text [96,40 8x20] focused
//! └── Line [0,0 200x1] hidden
//! ```

use std::fmt::Write;

use horizon_trellis_core::{Result, TrellisError, WidgetId};

pub use horizon_trellis_core::logging::{span_names, targets};

use crate::widget::{WidgetBase, WidgetTree};

/// Branch drawing used by [`WidgetTreeDebug`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    Ascii,
    #[default]
    Unicode,
    /// Dashes instead of branches.
    Compact,
}

/// What each line of a widget tree dump shows.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    pub style: TreeStyle,
    pub show_ids: bool,
    /// Geometry as `[x,y wxh]`.
    pub show_rects: bool,
    /// State flags such as `hidden` or `focused`.
    pub show_flags: bool,
    /// Deepest level printed; `None` prints everything.
    pub max_depth: Option<usize>,
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_rects: true,
            show_flags: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Everything, ids included.
    pub fn detailed() -> Self {
        Self {
            show_ids: true,
            ..Default::default()
        }
    }

    /// Kinds only.
    pub fn minimal() -> Self {
        Self {
            show_rects: false,
            show_flags: false,
            ..Default::default()
        }
    }
}

/// Text rendering of a widget hierarchy.
#[derive(Debug, Clone, Default)]
pub struct WidgetTreeDebug {
    options: TreeFormatOptions,
}

impl WidgetTreeDebug {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Dump the whole tree with a header line.
    pub fn format(&self, tree: &WidgetTree) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Widget Tree ({} widgets):", tree.len());
        match tree.root() {
            Some(root) => self.format_into(tree, root, 0, &mut Vec::new(), &mut output),
            None => output.push_str("  (empty)\n"),
        }
        output
    }

    /// Dump the subtree below `id`.
    ///
    /// # Errors
    ///
    /// Fails with [`TrellisError::WidgetNotFound`] when `id` is not in the
    /// tree.
    pub fn format_subtree(&self, tree: &WidgetTree, id: WidgetId) -> Result<String> {
        if !tree.contains(id) {
            return Err(TrellisError::WidgetNotFound(id));
        }
        let mut output = String::new();
        self.format_into(tree, id, 0, &mut Vec::new(), &mut output);
        Ok(output)
    }

    /// `last` holds, per ancestor level, whether that ancestor was the last
    /// of its siblings.
    fn format_into(
        &self,
        tree: &WidgetTree,
        id: WidgetId,
        depth: usize,
        last: &mut Vec<bool>,
        output: &mut String,
    ) {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }
        let Some(base) = tree.get(id) else {
            return;
        };

        output.push_str(&self.prefix(last));
        let _ = write!(output, "{:?}", base.kind());
        if self.options.show_ids {
            let _ = write!(output, " {id:?}");
        }
        if self.options.show_rects {
            let rect = base.rect();
            let _ = write!(output, " [{},{} {}x{}]", rect.x, rect.y, rect.width, rect.height);
        }
        if self.options.show_flags {
            for flag in flags(base) {
                output.push(' ');
                output.push_str(flag);
            }
        }
        output.push('\n');

        let children = base.children();
        for (index, child) in children.iter().enumerate() {
            last.push(index + 1 == children.len());
            self.format_into(tree, *child, depth + 1, last, output);
            last.pop();
        }
    }

    fn prefix(&self, last: &[bool]) -> String {
        let Some((is_last, ancestors)) = last.split_last() else {
            return String::new();
        };
        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+-- ", "`-- "),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} "),
            TreeStyle::Compact => ("", "- ", "- "),
        };

        let mut prefix = String::new();
        for ancestor_is_last in ancestors {
            let column = if *ancestor_is_last { " " } else { branch };
            prefix.push_str(column);
            prefix.extend(std::iter::repeat_n(' ', self.options.indent_size));
        }
        prefix.push_str(if *is_last { corner } else { tee });
        prefix
    }
}

fn flags(base: &WidgetBase) -> impl Iterator<Item = &'static str> {
    [
        (!base.is_visible(), "hidden"),
        (!base.is_enabled(), "disabled"),
        (base.is_focused(), "focused"),
        (base.is_pushed(), "pushed"),
        (base.is_overlap(), "overlap"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
}

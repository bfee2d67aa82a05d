use horizon_trellis_core::{
    CheckState, MouseButton, Result, TrellisError, UiEventKind, UiEventPayload, WidgetId,
};

use crate::style::Relief;
use crate::widget::{PaintContext, PaintPass, Widget, WidgetBase, WidgetKind, WidgetTree};

/// A two-state widget toggled by pressing it.
///
/// The check mark itself is left to the children (typically a [`Text`] or
/// [`Image`]) so applications can pick their own glyphs.
///
/// [`Text`]: super::Text
/// [`Image`]: super::Image
#[derive(Debug, Default)]
pub struct CheckWidget {
    state: CheckState,
}

impl CheckWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: CheckState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> CheckState {
        self.state
    }
}

impl Widget for CheckWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Check
    }

    fn mouse_down(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        button: MouseButton,
        x: f32,
        y: f32,
    ) -> bool {
        toggle_if_inside(&mut self.state, tree, id, x, y);
        tree.default_mouse_down(id, button, x, y);
        true
    }
}

/// A button that stays down until pressed again.
#[derive(Debug, Default)]
pub struct ToggleButton {
    state: CheckState,
}

impl ToggleButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CheckState {
        self.state
    }
}

impl Widget for ToggleButton {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ToggleButton
    }

    fn configure(&self, base: &mut WidgetBase) {
        base.set_move_children_on_push(true);
        base.set_redraw_on_mouse_event(true);
        base.set_allow_focus(true);
    }

    fn mouse_down(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        button: MouseButton,
        x: f32,
        y: f32,
    ) -> bool {
        toggle_if_inside(&mut self.state, tree, id, x, y);
        tree.default_mouse_down(id, button, x, y);
        true
    }

    fn mouse_up(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        button: MouseButton,
        x: f32,
        y: f32,
    ) -> bool {
        tree.default_mouse_up(id, button, x, y);
        if tree.get(id).is_some_and(|base| base.rect().contains(x, y)) {
            tree.emit(id, UiEventKind::Click, UiEventPayload::None);
            return true;
        }
        false
    }

    fn paint(&self, ctx: &mut PaintContext<'_>, pass: PaintPass) {
        if pass == PaintPass::Before {
            let checked = self.state.is_checked();
            let relief = if checked { Relief::Lowered } else { Relief::Raised };
            ctx.draw_box(relief, Some(checked));
        }
    }
}

fn toggle_if_inside(state: &mut CheckState, tree: &mut WidgetTree, id: WidgetId, x: f32, y: f32) {
    let inside = tree
        .get(id)
        .is_some_and(|base| base.is_enabled() && base.rect().contains(x, y));
    if inside {
        *state = state.toggled();
        tree.emit(id, UiEventKind::StateChange, UiEventPayload::State(*state));
        tree.resize_children(id);
        tree.refresh(id);
    }
}

impl WidgetTree {
    /// State of a check widget or toggle button.
    pub fn check_state(&self, id: WidgetId) -> Option<CheckState> {
        self.widget::<CheckWidget>(id)
            .map(CheckWidget::state)
            .or_else(|| self.widget::<ToggleButton>(id).map(ToggleButton::state))
    }

    /// Set the state of a check widget or toggle button.
    ///
    /// Emits `StateChange` only when the state actually changes.
    pub fn set_check_state(&mut self, id: WidgetId, state: CheckState) -> Result<()> {
        let previous = self
            .check_state(id)
            .ok_or(TrellisError::WidgetNotFound(id))?;
        if previous == state {
            return Ok(());
        }
        match self.get(id).map(WidgetBase::kind) {
            Some(WidgetKind::ToggleButton) => {
                self.with_widget::<ToggleButton, _>(id, |toggle, _| toggle.state = state)?
            }
            _ => self.with_widget::<CheckWidget, _>(id, |check, _| check.state = state)?,
        }
        self.emit(id, UiEventKind::StateChange, UiEventPayload::State(state));
        self.resize_children(id);
        self.refresh(id);
        Ok(())
    }
}

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{Result, TrellisError, UiEventKind, UiEventPayload, WidgetId};

use crate::widget::{Widget, WidgetKind, WidgetTree};

/// Bounds, current value and step of a ranged control.
///
/// The value always stays within `[min, max]`. Setting a bound that would
/// cross the other one is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeValue {
    min: f32,
    max: f32,
    value: f32,
    step: f32,
}

impl Default for RangeValue {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            value: 0.0,
            step: 1.0,
        }
    }
}

impl RangeValue {
    /// # Panics
    ///
    /// Panics if `step` is zero.
    pub fn new(min: f32, max: f32, value: f32, step: f32) -> Self {
        assert!(step != 0.0, "range step must not be zero");
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            value: value.clamp(min, max),
            step,
        }
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Span between the bounds.
    pub fn extent(&self) -> f32 {
        self.max - self.min
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(self.min, self.max);
    }

    pub fn set_min(&mut self, min: f32) {
        if min > self.max {
            tracing::debug!(target: targets::WIDGET, min, max = self.max, "ignoring minimum above maximum");
            return;
        }
        self.min = min;
        self.set_value(self.value);
    }

    pub fn set_max(&mut self, max: f32) {
        if max < self.min {
            tracing::debug!(target: targets::WIDGET, max, min = self.min, "ignoring maximum below minimum");
            return;
        }
        self.max = max;
        self.set_value(self.value);
    }

    /// # Panics
    ///
    /// Panics if `step` is zero.
    pub fn set_step(&mut self, step: f32) {
        assert!(step != 0.0, "range step must not be zero");
        self.step = step;
    }

    /// Move the value by `steps` increments, clamped to the bounds.
    pub fn step_by(&mut self, steps: f32) {
        self.set_value(self.value + steps * self.step);
    }
}

/// A bare ranged value without visual, the base of scroll bars and similar
/// controls.
#[derive(Debug, Default)]
pub struct ValueSelect {
    range: RangeValue,
}

impl ValueSelect {
    pub fn new(range: RangeValue) -> Self {
        Self { range }
    }
}

impl Widget for ValueSelect {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ValueSelect
    }

    fn range(&self) -> Option<&RangeValue> {
        Some(&self.range)
    }

    fn range_mut(&mut self) -> Option<&mut RangeValue> {
        Some(&mut self.range)
    }
}

impl WidgetTree {
    /// Range of a ranged widget.
    pub fn range(&self, id: WidgetId) -> Option<RangeValue> {
        self.nodes.get(id)?.behavior.as_deref()?.range().copied()
    }

    pub fn value(&self, id: WidgetId) -> Option<f32> {
        self.range(id).map(|range| range.value())
    }

    pub fn set_value(&mut self, id: WidgetId, value: f32) -> Result<()> {
        self.update_range(id, |range| range.set_value(value))
    }

    pub fn set_min(&mut self, id: WidgetId, min: f32) -> Result<()> {
        self.update_range(id, |range| range.set_min(min))
    }

    pub fn set_max(&mut self, id: WidgetId, max: f32) -> Result<()> {
        self.update_range(id, |range| range.set_max(max))
    }

    /// # Panics
    ///
    /// Panics if `step` is zero.
    pub fn set_step(&mut self, id: WidgetId, step: f32) -> Result<()> {
        self.update_range(id, |range| range.set_step(step))
    }

    /// Apply `f` to a widget's range, then notify about what changed:
    /// `RangeChange` for the bounds, `ValueChange` for the value.
    fn update_range(&mut self, id: WidgetId, f: impl FnOnce(&mut RangeValue)) -> Result<()> {
        let changed = self
            .with_behavior(id, |widget, tree| {
                let range = widget.range_mut()?;
                let before = *range;
                f(range);
                let after = *range;
                if before != after {
                    widget.on_range_change(tree, id);
                }
                Some((before, after))
            })
            .flatten();
        let Some((before, after)) = changed else {
            return Err(TrellisError::WidgetNotFound(id));
        };

        if (before.min(), before.max()) != (after.min(), after.max()) {
            self.emit(
                id,
                UiEventKind::RangeChange,
                UiEventPayload::Range {
                    min: after.min(),
                    max: after.max(),
                },
            );
        }
        if before.value() != after.value() {
            self.emit(id, UiEventKind::ValueChange, UiEventPayload::Value(after.value()));
        }
        if before != after {
            self.refresh(id);
        }
        Ok(())
    }
}

//! Raw input delivered to the window manager.
//!
//! These are backend-neutral: an embedder translates its platform events
//! (winit, SDL, a test script) into [`InputEvent`]s and hands them to the
//! manager.

use std::ops::{BitOr, BitOrAssign};

use crate::geometry::Point;

/// Keyboard keys the toolkit reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Backspace,
    Delete,
    Enter,
    Escape,
    Tab,
    /// A printable key. Text entry goes through [`InputEvent::Text`] instead.
    Char(char),
    /// Any other platform key code.
    Other(u32),
}

/// A pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Set of pointer buttons held during a motion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MouseButtons(u32);

impl MouseButtons {
    pub const NONE: Self = Self(0);
    pub const LEFT: Self = Self(1 << 0);
    pub const RIGHT: Self = Self(1 << 1);
    pub const MIDDLE: Self = Self(1 << 2);

    /// Check if all buttons in `other` are held.
    #[inline]
    pub fn has(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Raw bitmask value.
    #[inline]
    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT,
            MouseButton::Right => Self::RIGHT,
            MouseButton::Middle => Self::MIDDLE,
        }
    }
}

impl BitOr for MouseButtons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for MouseButtons {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A raw input event in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key { key: Key, pressed: bool },
    Text(String),
    MouseButton {
        button: MouseButton,
        pressed: bool,
        position: Point,
    },
    MouseMotion { buttons: MouseButtons, position: Point },
}

impl InputEvent {
    /// Convenience constructor for a button press.
    pub fn mouse_down(button: MouseButton, x: f32, y: f32) -> Self {
        Self::MouseButton {
            button,
            pressed: true,
            position: Point::new(x, y),
        }
    }

    /// Convenience constructor for a button release.
    pub fn mouse_up(button: MouseButton, x: f32, y: f32) -> Self {
        Self::MouseButton {
            button,
            pressed: false,
            position: Point::new(x, y),
        }
    }

    /// Convenience constructor for pointer motion.
    pub fn mouse_move(buttons: MouseButtons, x: f32, y: f32) -> Self {
        Self::MouseMotion {
            buttons,
            position: Point::new(x, y),
        }
    }

    /// Whether this is a pointer event.
    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::MouseButton { .. } | Self::MouseMotion { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_buttons_bitmask() {
        let held = MouseButtons::LEFT | MouseButtons::MIDDLE;
        assert!(held.has(MouseButtons::LEFT));
        assert!(held.has(MouseButtons::MIDDLE));
        assert!(!held.has(MouseButtons::RIGHT));
        assert!(MouseButtons::NONE.is_empty());
        assert_eq!(MouseButtons::from(MouseButton::Right), MouseButtons::RIGHT);
    }

    #[test]
    fn test_pointer_classification() {
        assert!(InputEvent::mouse_down(MouseButton::Left, 1.0, 2.0).is_pointer());
        assert!(!InputEvent::Text("a".into()).is_pointer());
    }
}

//! Windows and the window manager.
//!
//! A [`Window`] is one composable surface: a rectangle on the output, a
//! widget tree rooted at a single root widget, and a visibility state. The
//! [`WindowManager`] owns every window, routes raw input to them and
//! composes the visible ones into the renderer once per tick.
//!
//! # Lifecycle
//!
//! A window is built detached, then handed to [`WindowManager::add`], which
//! attaches it (creating its widget tree) and fires `Create`. Visibility
//! requests are recorded and applied on the next [`WindowManager::tick`],
//! as are removals:
//!
//! ```ignore
//! use horizon_trellis::window::{Window, WindowManager};
//!
//! let id = manager.add(Window::new(Rect::new(0.0, 0.0, 320.0, 200.0)));
//! manager.with_window(id, |window| window.set_visible(true))?;
//! manager.tick(); // Show, GotFocus, then the first frame
//! ```
//!
//! # Resizing
//!
//! With resizing enabled, moving the pointer onto a window edge arms a
//! resize gesture and changes the cursor shape; pressing the left button
//! starts the drag and releasing it ends the gesture.

mod cursor;
mod managed_window;
mod manager_config;
mod resize;
mod window_manager;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub use cursor::CursorShape;
pub use managed_window::{ResizeBorders, Window, WindowDelegate};
pub use manager_config::ManagerConfig;
pub use resize::ResizeEdge;
pub use window_manager::WindowManager;

/// The manager's "needs redraw" flag.
///
/// Clones share the flag: every widget tree holds one and requests a redraw
/// through it, the manager takes it once per tick.
#[derive(Debug, Clone, Default)]
pub struct RedrawFlag(Arc<AtomicBool>);

impl RedrawFlag {
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clear the flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

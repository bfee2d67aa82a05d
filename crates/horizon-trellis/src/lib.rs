//! Horizon Trellis: a retained-mode widget toolkit.
//!
//! Widgets live in per-window trees and are placed by an alignment layout
//! engine: each child takes a slice of its parent's remaining client area.
//! A [`WindowManager`](window::WindowManager) owns the windows, routes raw
//! input to them (including border-drag resizing) and composes the visible
//! ones into a [`Renderer`](render::Renderer) once per tick. Everything that
//! happens is published on the [`Context`]'s notification bus.
//!
//! # Example
//!
//! ```ignore
//! use horizon_trellis::render::{FixedFont, RecordingRenderer};
//! use horizon_trellis::widget::{Alignment, widgets::Button};
//! use horizon_trellis::window::{ManagerConfig, Window, WindowManager};
//! use horizon_trellis::{Context, Rect};
//!
//! let context = Context::new();
//! let manager = WindowManager::new(
//!     &context,
//!     RecordingRenderer::new(),
//!     FixedFont::default().shared(),
//!     ManagerConfig::default(),
//! )?;
//! let id = manager.add(Window::new(Rect::new(0.0, 0.0, 320.0, 200.0)));
//! manager.with_window(id, |window| {
//!     let tree = window.tree_mut();
//!     let root = tree.root().unwrap();
//!     tree.add(root, Button::new(), Alignment::BottomRight, "80,24,RAISED");
//!     window.set_visible(true);
//! })?;
//! manager.tick();
//! ```

pub use horizon_trellis_core::*;

mod context;
pub mod logging;
pub mod render;
pub mod style;
pub mod widget;
pub mod window;

pub use context::Context;

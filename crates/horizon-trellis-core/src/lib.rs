//! Core types for Horizon Trellis.
//!
//! This crate holds the pieces of the toolkit that do not depend on widgets,
//! styles or rendering:
//!
//! - **Geometry**: [`Point`], [`Size`], [`Rect`] (y-up) and [`Color`]
//! - **Identifiers**: arena keys for widgets, counters for windows
//! - **Input**: backend-neutral raw input events
//! - **Notification bus**: typed, ordered UI events with filtered listeners
//! - **Errors** and **logging targets**

mod error;
pub mod event;
pub mod geometry;
mod id;
pub mod input;
pub mod logging;

pub use error::{Result, TrellisError};
pub use event::{
    CheckState, EventBus, EventFilter, EventSource, ListenerId, UiEvent, UiEventKind,
    UiEventPayload,
};
pub use geometry::{Color, Point, Rect, Size};
pub use id::{WidgetId, WindowId};
pub use input::{InputEvent, Key, MouseButton, MouseButtons};

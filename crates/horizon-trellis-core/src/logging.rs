//! Tracing span names and log targets for Horizon Trellis.
//!
//! Horizon Trellis instruments layout, dispatch and composition with the
//! `tracing` crate. Install any subscriber to see the output:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_trellis::layout=trace")
//!     .init();
//! ```

/// Span names used throughout Horizon Trellis for tracing.
pub mod span_names {
    /// One layout pass over a widget's children.
    pub const LAYOUT: &str = "horizon_trellis::layout";
    /// Pointer or keyboard dispatch through a widget tree.
    pub const DISPATCH: &str = "horizon_trellis::dispatch";
    /// The window manager's composition tick.
    pub const FRAME: &str = "horizon_trellis::frame";
    /// Raw input routing in the window manager.
    pub const INPUT: &str = "horizon_trellis::input";
}

/// Target names for log filtering.
pub mod targets {
    pub const CORE: &str = "horizon_trellis_core";
    /// Notification bus traffic.
    pub const EVENTS: &str = "horizon_trellis_core::events";
    pub const WIDGET: &str = "horizon_trellis::widget";
    pub const LAYOUT: &str = "horizon_trellis::layout";
    pub const FOCUS: &str = "horizon_trellis::focus";
    pub const WINDOW: &str = "horizon_trellis::window";
    pub const MANAGER: &str = "horizon_trellis::manager";
    pub const STYLE: &str = "horizon_trellis::style";
}

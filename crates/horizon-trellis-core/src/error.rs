//! Error types for Horizon Trellis.
//!
//! Only recoverable failures are represented here. Programmer contract
//! violations (attaching a window twice, adding children to a leaf widget, a
//! zero step on a ranged control) panic at the call site instead.

use crate::id::{WidgetId, WindowId};

/// Result type alias for Horizon Trellis operations.
pub type Result<T> = std::result::Result<T, TrellisError>;

/// The main error type for Horizon Trellis operations.
#[derive(Debug, thiserror::Error)]
pub enum TrellisError {
    /// No style is registered under the requested name.
    #[error("no style named '{0}'")]
    StyleNotFound(String),

    /// The operation exists in the API but has no implementation yet.
    #[error("not implemented: {0}")]
    Unimplemented(&'static str),

    /// The widget id is stale or belongs to another tree.
    #[error("widget {0:?} not found")]
    WidgetNotFound(WidgetId),

    /// The window is not attached to this manager.
    #[error("{0} not found")]
    WindowNotFound(WindowId),

    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TrellisError::StyleNotFound("pixmap".into()).to_string(),
            "no style named 'pixmap'"
        );
        assert_eq!(
            TrellisError::Unimplemented("tree item expansion").to_string(),
            "not implemented: tree item expansion"
        );
    }
}

//! Window manager configuration.

use serde::Deserialize;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{Color, Result, TrellisError};

/// Settings shared by every window of a manager.
///
/// Built in code with the `with_*` methods or loaded from TOML; missing
/// keys keep their defaults.
///
/// ```ignore
/// use horizon_trellis::window::ManagerConfig;
///
/// let config = ManagerConfig::from_toml_str(r#"
///     style = "vector"
///     resize_threshold = 6.0
///     text_color = { r = 1.0, g = 1.0, b = 0.8 }
///     input_scale = [0.5, 0.5]
/// "#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManagerConfig {
    /// Name of the default style given to windows without their own.
    pub style: String,
    /// Width of the band along a window edge that arms a resize gesture.
    pub resize_threshold: f32,
    pub enable_window_resizing: bool,
    /// Default font scale inherited by windows.
    pub font_scale: f32,
    /// Default text color inherited by windows.
    pub text_color: Color,
    /// Factors applied to raw pointer coordinates, horizontal then vertical.
    pub input_scale: [f32; 2],
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            style: "vector".to_string(),
            resize_threshold: 5.0,
            enable_window_resizing: true,
            font_scale: 1.0,
            text_color: Color::WHITE,
            input_scale: [1.0, 1.0],
        }
    }
}

impl ManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Config`] when the document is not valid TOML
    /// or names an unknown key.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|error| {
            tracing::warn!(target: targets::MANAGER, %error, "invalid manager configuration");
            TrellisError::Config(error.to_string())
        })
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Set the resize band width. Negative values are treated as zero.
    pub fn with_resize_threshold(mut self, threshold: f32) -> Self {
        self.resize_threshold = threshold.max(0.0);
        self
    }

    pub fn with_window_resizing(mut self, enabled: bool) -> Self {
        self.enable_window_resizing = enabled;
        self
    }

    pub fn with_font_scale(mut self, scale: f32) -> Self {
        self.font_scale = scale;
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    pub fn with_input_scale(mut self, x: f32, y: f32) -> Self {
        self.input_scale = [x, y];
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ManagerConfig::default();
        assert_eq!(config.style, "vector");
        assert!(config.enable_window_resizing);
        assert_eq!(config.input_scale, [1.0, 1.0]);
    }

    #[test]
    fn test_builder() {
        let config = ManagerConfig::new()
            .with_resize_threshold(-2.0)
            .with_window_resizing(false)
            .with_font_scale(2.0)
            .with_input_scale(0.5, 0.25);
        assert_eq!(config.resize_threshold, 0.0);
        assert!(!config.enable_window_resizing);
        assert_eq!(config.font_scale, 2.0);
        assert_eq!(config.input_scale, [0.5, 0.25]);
    }

    #[test]
    fn test_from_toml_keeps_missing_defaults() {
        let config = ManagerConfig::from_toml_str(
            r#"
            resize_threshold = 8.0
            text_color = { r = 1.0, g = 0.5, b = 0.0 }
            "#,
        )
        .unwrap();
        assert_eq!(config.resize_threshold, 8.0);
        assert_eq!(config.text_color, Color::from_rgb(1.0, 0.5, 0.0));
        assert_eq!(config.style, "vector");
        assert_eq!(config.font_scale, 1.0);
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(matches!(
            ManagerConfig::from_toml_str("resize_threshold = \"wide\""),
            Err(TrellisError::Config(_))
        ));
        assert!(matches!(
            ManagerConfig::from_toml_str("colour = 1"),
            Err(TrellisError::Config(_))
        ));
    }
}

//! Per-widget style resources.
//!
//! A resource is parsed from a short textual descriptor given when a widget
//! is added to the tree:
//!
//! ```text
//! width,height,RAISED|LOWERED|FLAT[,r,g,b[,a]]
//! ```
//!
//! Every field is optional. `",,LOWERED"` keeps the default size and only
//! selects a relief; `"120,24"` sets an intrinsic size. Malformed fields fall
//! back to their defaults.

use std::fmt;

use horizon_trellis_core::Color;
use horizon_trellis_core::logging::targets;

/// Bevel of a box-like widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Relief {
    Raised,
    Lowered,
    #[default]
    Flat,
}

impl Relief {
    fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "RAISED" => Some(Self::Raised),
            "LOWERED" => Some(Self::Lowered),
            "FLAT" => Some(Self::Flat),
            _ => None,
        }
    }
}

impl fmt::Display for Relief {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Raised => "RAISED",
            Self::Lowered => "LOWERED",
            Self::Flat => "FLAT",
        };
        f.write_str(name)
    }
}

/// Style data attached to one widget.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleResource {
    descriptor: String,
    /// Intrinsic width, 0 when unspecified.
    pub width: f32,
    /// Intrinsic height, 0 when unspecified.
    pub height: f32,
    pub relief: Relief,
    /// Overrides the style's palette when set.
    pub color: Option<Color>,
}

impl StyleResource {
    /// Parse a descriptor, falling back to defaults for malformed fields.
    pub fn parse(descriptor: &str) -> Self {
        let mut resource = Self {
            descriptor: descriptor.to_string(),
            ..Self::default()
        };
        if descriptor.trim().is_empty() {
            return resource;
        }

        let fields: Vec<&str> = descriptor.split(',').collect();
        resource.width = parse_dimension(fields.first().copied(), descriptor);
        resource.height = parse_dimension(fields.get(1).copied(), descriptor);
        if let Some(relief) = fields.get(2).filter(|field| !field.trim().is_empty()) {
            match Relief::parse(relief) {
                Some(relief) => resource.relief = relief,
                None => tracing::warn!(
                    target: targets::STYLE,
                    descriptor,
                    "unknown relief '{}', using {}",
                    relief.trim(),
                    Relief::default()
                ),
            }
        }
        if fields.len() > 3 {
            resource.color = Color::parse_components(&fields[3..].join(","));
            if resource.color.is_none() {
                tracing::warn!(target: targets::STYLE, descriptor, "ignoring malformed resource color");
            }
        }
        resource
    }

    /// The descriptor this resource was parsed from.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

fn parse_dimension(field: Option<&str>, descriptor: &str) -> f32 {
    let Some(field) = field.map(str::trim).filter(|field| !field.is_empty()) else {
        return 0.0;
    };
    match field.parse::<f32>() {
        Ok(value) if value >= 0.0 => value,
        _ => {
            tracing::warn!(target: targets::STYLE, descriptor, "ignoring malformed dimension '{}'", field);
            0.0
        }
    }
}

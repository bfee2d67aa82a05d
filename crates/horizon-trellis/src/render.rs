//! Rendering and font interfaces.
//!
//! The toolkit never talks to a GPU directly. Styles draw through the narrow
//! [`Renderer`] trait, an immediate-mode 2D surface that the window manager
//! restarts once per composed frame, and text is measured through
//! [`FontMetrics`].
//!
//! [`RecordingRenderer`] and [`FixedFont`] are self-contained
//! implementations, useful for tests, headless runs and debugging.

use std::sync::Arc;

use parking_lot::Mutex;

use horizon_trellis_core::{Color, Point, Rect, Size};

/// Identifier of a texture known to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Text measurement.
pub trait FontMetrics: Send + Sync {
    /// Size of `text` rendered at `scale`.
    fn size(&self, text: &str, scale: f32) -> Size;

    /// Distance from the baseline to the lowest glyph extent, unscaled.
    fn descender(&self) -> f32;
}

/// A shared font handle.
pub type Font = Arc<dyn FontMetrics>;

/// A 2D immediate-mode drawing surface.
pub trait Renderer: Send {
    fn set_pen_color(&mut self, color: Color);

    /// Fill `rect` with the pen color, or with `texture` modulated by it.
    fn draw_filled_rect(&mut self, rect: Rect, texture: Option<TextureId>);

    fn draw_line(&mut self, from: Point, to: Point);

    /// Draw `text` with its baseline origin at `(x, y)`.
    fn draw_text(&mut self, text: &str, font: &Font, scale: f32, x: f32, y: f32);

    /// Horizontal stretch of the output surface (width / height of a pixel).
    fn aspect_ratio(&self) -> f32;

    /// Discard everything drawn so far and start a new frame.
    fn restart(&mut self);

    /// Offset applied to every subsequent primitive.
    fn set_translate(&mut self, offset: Point);

    /// Global transparency applied to subsequent primitives, 0.0 is opaque.
    fn set_transparency(&mut self, transparency: f32);
}

/// A fixed-advance font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedFont {
    advance: f32,
    line_height: f32,
    descender: f32,
}

impl FixedFont {
    pub fn new(advance: f32, line_height: f32, descender: f32) -> Self {
        Self {
            advance,
            line_height,
            descender,
        }
    }

    /// Wrap into a shared [`Font`] handle.
    pub fn shared(self) -> Font {
        Arc::new(self)
    }
}

impl Default for FixedFont {
    fn default() -> Self {
        Self::new(8.0, 16.0, 4.0)
    }
}

impl FontMetrics for FixedFont {
    fn size(&self, text: &str, scale: f32) -> Size {
        let glyphs = text.chars().count() as f32;
        Size::new(glyphs * self.advance * scale, self.line_height * scale)
    }

    fn descender(&self) -> f32 {
        self.descender
    }
}

/// One primitive captured by a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    PenColor(Color),
    FilledRect {
        rect: Rect,
        texture: Option<TextureId>,
    },
    Line { from: Point, to: Point },
    Text {
        text: String,
        scale: f32,
        position: Point,
    },
    Translate(Point),
    Transparency(f32),
}

#[derive(Debug, Default)]
struct Recording {
    commands: Vec<DrawCommand>,
    frames: u64,
}

/// A renderer that records every primitive instead of drawing it.
///
/// Clones share the same recording, so a test can keep a handle while the
/// window manager owns the renderer.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    recording: Arc<Mutex<Recording>>,
    aspect_ratio: f32,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::with_aspect_ratio(1.0)
    }

    pub fn with_aspect_ratio(aspect_ratio: f32) -> Self {
        Self {
            recording: Arc::new(Mutex::new(Recording::default())),
            aspect_ratio,
        }
    }

    /// Commands recorded since the last restart.
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.recording.lock().commands.clone()
    }

    /// Number of frames started with [`Renderer::restart`].
    pub fn frames(&self) -> u64 {
        self.recording.lock().frames
    }

    /// Texts drawn in the current frame, in order.
    pub fn texts(&self) -> Vec<String> {
        self.recording
            .lock()
            .commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, command: DrawCommand) {
        self.recording.lock().commands.push(command);
    }
}

impl Renderer for RecordingRenderer {
    fn set_pen_color(&mut self, color: Color) {
        self.record(DrawCommand::PenColor(color));
    }

    fn draw_filled_rect(&mut self, rect: Rect, texture: Option<TextureId>) {
        self.record(DrawCommand::FilledRect { rect, texture });
    }

    fn draw_line(&mut self, from: Point, to: Point) {
        self.record(DrawCommand::Line { from, to });
    }

    fn draw_text(&mut self, text: &str, _font: &Font, scale: f32, x: f32, y: f32) {
        self.record(DrawCommand::Text {
            text: text.to_string(),
            scale,
            position: Point::new(x, y),
        });
    }

    fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    fn restart(&mut self) {
        let mut recording = self.recording.lock();
        recording.commands.clear();
        recording.frames += 1;
    }

    fn set_translate(&mut self, offset: Point) {
        self.record(DrawCommand::Translate(offset));
    }

    fn set_transparency(&mut self, transparency: f32) {
        self.record(DrawCommand::Transparency(transparency));
    }
}

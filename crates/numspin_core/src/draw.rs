//! Draw Context
//!
//! The rendering API widgets paint through. A renderer backend implements
//! [`DrawContext`]; [`RecordingContext`] records commands so widget output
//! can be inspected headlessly and replayed later.

use crate::layer::{Brush, Color, CornerRadius, Point, Rect, Size};

// ─────────────────────────────────────────────────────────────────────────────
// Text Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Text alignment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Text style configuration
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    /// Text color
    pub color: Color,
    /// Text alignment relative to the draw origin
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 14.0,
            color: Color::BLACK,
            align: TextAlign::Left,
        }
    }
}

impl TextStyle {
    /// Create a new text style with font size
    pub fn new(size: f32) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    /// Set text color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set text alignment
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Approximate advance width of `text` in this style
    ///
    /// Uses a fixed per-character advance; good enough for cursor placement
    /// and minimum-size calculations without a shaping engine.
    pub fn approx_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.size * 0.6
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Draw Context
// ─────────────────────────────────────────────────────────────────────────────

/// The drawing interface widgets render into
pub trait DrawContext {
    /// Push a rectangular clip onto the stack
    fn push_clip(&mut self, rect: Rect);

    /// Pop the top clip from the stack
    fn pop_clip(&mut self);

    /// Fill a rectangle
    fn fill_rect(&mut self, rect: Rect, corner_radius: CornerRadius, brush: Brush);

    /// Stroke the outline of a rectangle
    fn stroke_rect(&mut self, rect: Rect, corner_radius: CornerRadius, width: f32, brush: Brush);

    /// Draw a run of text; `origin` is the anchor point for `style.align`,
    /// vertically centered on the text line
    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle);

    /// Size of the surface being drawn into
    fn viewport_size(&self) -> Size;
}

// ─────────────────────────────────────────────────────────────────────────────
// Recording Draw Context
// ─────────────────────────────────────────────────────────────────────────────

/// A draw command that can be recorded and replayed
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    PushClip(Rect),
    PopClip,
    FillRect {
        rect: Rect,
        corner_radius: CornerRadius,
        brush: Brush,
    },
    StrokeRect {
        rect: Rect,
        corner_radius: CornerRadius,
        width: f32,
        brush: Brush,
    },
    DrawText {
        text: String,
        origin: Point,
        style: TextStyle,
    },
}

/// A draw context that records commands for later execution
#[derive(Debug, Default)]
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
    clip_depth: usize,
    viewport: Size,
}

impl RecordingContext {
    /// Create a new recording context
    pub fn new(viewport: Size) -> Self {
        Self {
            commands: Vec::new(),
            clip_depth: 0,
            viewport,
        }
    }

    /// Get the recorded commands
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Clear all recorded commands
    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip_depth = 0;
    }

    /// Number of clips pushed and not yet popped
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }

    /// All text runs drawn so far, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replay the recorded commands into another context
    pub fn replay(&self, target: &mut dyn DrawContext) {
        for cmd in &self.commands {
            match cmd {
                DrawCommand::PushClip(rect) => target.push_clip(*rect),
                DrawCommand::PopClip => target.pop_clip(),
                DrawCommand::FillRect {
                    rect,
                    corner_radius,
                    brush,
                } => target.fill_rect(*rect, *corner_radius, brush.clone()),
                DrawCommand::StrokeRect {
                    rect,
                    corner_radius,
                    width,
                    brush,
                } => target.stroke_rect(*rect, *corner_radius, *width, brush.clone()),
                DrawCommand::DrawText {
                    text,
                    origin,
                    style,
                } => target.draw_text(text, *origin, style),
            }
        }
    }
}

impl DrawContext for RecordingContext {
    fn push_clip(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::PushClip(rect));
        self.clip_depth += 1;
    }

    fn pop_clip(&mut self) {
        self.commands.push(DrawCommand::PopClip);
        self.clip_depth = self.clip_depth.saturating_sub(1);
    }

    fn fill_rect(&mut self, rect: Rect, corner_radius: CornerRadius, brush: Brush) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            corner_radius,
            brush,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, corner_radius: CornerRadius, width: f32, brush: Brush) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            corner_radius,
            width,
            brush,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::DrawText {
            text: text.to_string(),
            origin,
            style: style.clone(),
        });
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }
}

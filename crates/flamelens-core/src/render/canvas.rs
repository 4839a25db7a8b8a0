use crate::color::Color;
use crate::geometry::{DevicePoint, DeviceRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size: f32,
    pub style: FontStyle,
}

impl Font {
    pub const fn new(size: f32, style: FontStyle) -> Self {
        Self { size, style }
    }

    pub fn with_style(self, style: FontStyle) -> Self {
        Self { style, ..self }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new(12.0, FontStyle::Regular)
    }
}

/// 2D drawing surface the render engine paints on.
///
/// Coordinates are device pixels with the origin at the top-left of the
/// flamegraph area. Implementations clip to their own bounds.
pub trait Canvas {
    fn fill_rect(&mut self, rect: DeviceRect, color: Color, corner_radius: f64);

    fn stroke_rect(&mut self, rect: DeviceRect, color: Color, width: f64);

    fn text_width(&self, text: &str, font: &Font) -> f64;

    /// Height of one line of text in `font`.
    fn line_height(&self, font: &Font) -> f64;

    fn draw_text(&mut self, text: &str, top_left: DevicePoint, font: &Font, color: Color);
}

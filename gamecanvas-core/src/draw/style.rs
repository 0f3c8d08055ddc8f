use super::DrawError;
use crate::color::Color;

/// Pen state shared by the shape and text calls of a [`super::Painter`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Style {
    #[serde(skip)]
    color: Color,
    line_width: f32,
    font_size: f32,
    /// Line advance, as a multiple of the font size.
    line_height: f32,
    /// Glyph advance, as a multiple of the glyph width.
    tracking: f32,
    /// Glyph width, as a multiple of the font size.
    horizontal_ratio: f32,
}
impl Default for Style {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            line_width: 2.0,
            font_size: 20.0,
            line_height: 1.65,
            tracking: 1.0,
            horizontal_ratio: 1.0,
        }
    }
}

pub(crate) fn positive(name: &'static str, value: f32) -> Result<f32, DrawError> {
    // Written so NaN fails too.
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(DrawError::NotPositive { name, value })
    }
}

impl Style {
    /// Check values that may have come from a deserializer.
    pub fn validate(&self) -> Result<(), DrawError> {
        positive("line width", self.line_width)?;
        positive("font size", self.font_size)?;
        positive("line height", self.line_height)?;
        if !self.tracking.is_finite() {
            return Err(DrawError::NotFinite { name: "tracking" });
        }
        if self.horizontal_ratio == 0.0 || !self.horizontal_ratio.is_finite() {
            return Err(DrawError::Zero {
                name: "horizontal ratio",
            });
        }
        Ok(())
    }
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }
    pub fn set_color_rgba(&mut self, r: f32, g: f32, b: f32, a: f32) -> Result<(), DrawError> {
        self.color = Color::new(r, g, b, a)?;
        Ok(())
    }
    pub fn set_color_hsv(&mut self, h: f32, s: f32, v: f32, a: f32) -> Result<(), DrawError> {
        self.color = Color::from_hsv(h, s, v, a)?;
        Ok(())
    }
    #[must_use]
    pub fn line_width(&self) -> f32 {
        self.line_width
    }
    pub fn set_line_width(&mut self, width: f32) -> Result<(), DrawError> {
        self.line_width = positive("line width", width)?;
        Ok(())
    }
    #[must_use]
    pub fn font_size(&self) -> f32 {
        self.font_size
    }
    pub fn set_font_size(&mut self, size: f32) -> Result<(), DrawError> {
        self.font_size = positive("font size", size)?;
        Ok(())
    }
    #[must_use]
    pub fn line_height(&self) -> f32 {
        self.line_height
    }
    pub fn set_text_line_height(&mut self, ratio: f32) -> Result<(), DrawError> {
        self.line_height = positive("line height", ratio)?;
        Ok(())
    }
    #[must_use]
    pub fn tracking(&self) -> f32 {
        self.tracking
    }
    /// Negative tracking lays text out right to left.
    pub fn set_text_tracking(&mut self, tracking: f32) -> Result<(), DrawError> {
        if !tracking.is_finite() {
            return Err(DrawError::NotFinite { name: "tracking" });
        }
        self.tracking = tracking;
        Ok(())
    }
    #[must_use]
    pub fn horizontal_ratio(&self) -> f32 {
        self.horizontal_ratio
    }
    /// Negative ratios mirror glyphs horizontally.
    pub fn set_text_horizontal_ratio(&mut self, ratio: f32) -> Result<(), DrawError> {
        if ratio == 0.0 || !ratio.is_finite() {
            return Err(DrawError::Zero {
                name: "horizontal ratio",
            });
        }
        self.horizontal_ratio = ratio;
        Ok(())
    }
}

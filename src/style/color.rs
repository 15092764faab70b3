use serde::{Deserialize, Serialize};

/// RGB color representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel (0.0 - 1.0)
    pub r: f32,
    /// Green channel (0.0 - 1.0)
    pub g: f32,
    /// Blue channel (0.0 - 1.0)
    pub b: f32,
}

impl Color {
    /// Create a new color, clamping each channel into 0..=1.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_scribe::style::Color;
    ///
    /// let red = Color::new(1.0, 0.0, 0.0);
    /// assert_eq!(red.r, 1.0);
    /// assert_eq!(Color::new(2.0, -1.0, 0.5), Color::new(1.0, 0.0, 0.5));
    /// ```
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Create a color from 8-bit channels.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Create a black color.
    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Create a white color.
    pub fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

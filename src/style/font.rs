//! Font selection value type.

use std::fmt;

use crate::error::{Error, Result};

/// Families every PDF reader provides without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFamily {
    /// Times Roman
    Times,
    /// Helvetica
    Helvetica,
    /// Courier
    Courier,
    /// Symbol
    Symbol,
    /// ZapfDingbats
    ZapfDingbats,
}

impl StandardFamily {
    /// Match a family name case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_scribe::style::StandardFamily;
    ///
    /// assert_eq!(StandardFamily::from_name("helvetica"), Some(StandardFamily::Helvetica));
    /// assert_eq!(StandardFamily::from_name("Garamond"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "times" | "times-roman" | "times new roman" => Some(StandardFamily::Times),
            "helvetica" => Some(StandardFamily::Helvetica),
            "courier" => Some(StandardFamily::Courier),
            "symbol" => Some(StandardFamily::Symbol),
            "zapfdingbats" => Some(StandardFamily::ZapfDingbats),
            _ => None,
        }
    }

    /// Symbolic families have no bold or italic faces.
    pub fn is_symbolic(self) -> bool {
        matches!(self, StandardFamily::Symbol | StandardFamily::ZapfDingbats)
    }

    /// PostScript name of the face for a style combination.
    pub fn base_font(self, bold: bool, italic: bool) -> &'static str {
        match (self, bold, italic) {
            (StandardFamily::Times, false, false) => "Times-Roman",
            (StandardFamily::Times, true, false) => "Times-Bold",
            (StandardFamily::Times, false, true) => "Times-Italic",
            (StandardFamily::Times, true, true) => "Times-BoldItalic",
            (StandardFamily::Helvetica, false, false) => "Helvetica",
            (StandardFamily::Helvetica, true, false) => "Helvetica-Bold",
            (StandardFamily::Helvetica, false, true) => "Helvetica-Oblique",
            (StandardFamily::Helvetica, true, true) => "Helvetica-BoldOblique",
            (StandardFamily::Courier, false, false) => "Courier",
            (StandardFamily::Courier, true, false) => "Courier-Bold",
            (StandardFamily::Courier, false, true) => "Courier-Oblique",
            (StandardFamily::Courier, true, true) => "Courier-BoldOblique",
            (StandardFamily::Symbol, _, _) => "Symbol",
            (StandardFamily::ZapfDingbats, _, _) => "ZapfDingbats",
        }
    }
}

/// A font request: family, size and typographic options.
///
/// `size` and `character_spacing` are in points. `hanging_indent` and
/// `paragraph_spacing` are layout distances in the engine's current measurement mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    family: String,
    size: f32,
    bold: bool,
    italic: bool,
    underline: bool,
    strikeout: bool,
    justify: bool,
    line_spacing: f32,
    hanging_indent: f32,
    paragraph_spacing: f32,
    stretch_x: f32,
    stretch_y: f32,
    character_spacing: f32,
}

impl Default for Font {
    fn default() -> Self {
        Self::unchecked("Helvetica", 12.0)
    }
}

impl Font {
    /// Create a font request.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_scribe::style::Font;
    ///
    /// let font = Font::new("Times", 10.0).unwrap().with_bold(true);
    /// assert!(font.bold());
    /// assert!(!font.is_embedded());
    /// assert!(Font::new("", 10.0).is_err());
    /// ```
    pub fn new(family: impl Into<String>, size: f32) -> Result<Self> {
        let font = Self::unchecked(family, size);
        font.validate()?;
        Ok(font)
    }

    fn unchecked(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
            underline: false,
            strikeout: false,
            justify: false,
            line_spacing: 1.0,
            hanging_indent: 0.0,
            paragraph_spacing: 0.0,
            stretch_x: 1.0,
            stretch_y: 1.0,
            character_spacing: 0.0,
        }
    }

    /// Check every numeric range and style combination.
    pub fn validate(&self) -> Result<()> {
        if self.family.trim().is_empty() {
            return Err(Error::config("font family must not be empty"));
        }
        positive("font size", self.size)?;
        positive("stretch_x", self.stretch_x)?;
        positive("stretch_y", self.stretch_y)?;
        non_negative("line spacing", self.line_spacing)?;
        non_negative("hanging indent", self.hanging_indent)?;
        non_negative("paragraph spacing", self.paragraph_spacing)?;
        if !self.character_spacing.is_finite() {
            return Err(Error::config("character spacing must be finite"));
        }
        if let Some(family) = self.standard_family() {
            if family.is_symbolic() && (self.bold || self.italic) {
                return Err(Error::config(format!(
                    "{} has no bold or italic face",
                    self.family
                )));
            }
        }
        Ok(())
    }

    /// Built-in family, when the name matches one.
    pub fn standard_family(&self) -> Option<StandardFamily> {
        StandardFamily::from_name(&self.family)
    }

    /// True unless the family is one of the built-in ones.
    pub fn is_embedded(&self) -> bool {
        self.standard_family().is_none()
    }

    /// Family name as given.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Size in points.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Bold flag.
    pub fn bold(&self) -> bool {
        self.bold
    }

    /// Italic flag.
    pub fn italic(&self) -> bool {
        self.italic
    }

    /// Underline flag.
    pub fn underline(&self) -> bool {
        self.underline
    }

    /// Strikeout flag.
    pub fn strikeout(&self) -> bool {
        self.strikeout
    }

    /// Justify wrapped lines.
    pub fn justify(&self) -> bool {
        self.justify
    }

    /// Line height multiplier.
    pub fn line_spacing(&self) -> f32 {
        self.line_spacing
    }

    /// Extra left indent of wrapped continuation lines.
    pub fn hanging_indent(&self) -> f32 {
        self.hanging_indent
    }

    /// Extra vertical space after a paragraph break.
    pub fn paragraph_spacing(&self) -> f32 {
        self.paragraph_spacing
    }

    /// Horizontal glyph scale.
    pub fn stretch_x(&self) -> f32 {
        self.stretch_x
    }

    /// Vertical glyph scale.
    pub fn stretch_y(&self) -> f32 {
        self.stretch_y
    }

    /// Extra space after each glyph, in points.
    pub fn character_spacing(&self) -> f32 {
        self.character_spacing
    }

    /// Same font under another family name.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    /// Same font at another size.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    pub fn with_strikeout(mut self, strikeout: bool) -> Self {
        self.strikeout = strikeout;
        self
    }

    pub fn with_justify(mut self, justify: bool) -> Self {
        self.justify = justify;
        self
    }

    pub fn with_line_spacing(mut self, multiplier: f32) -> Self {
        self.line_spacing = multiplier;
        self
    }

    pub fn with_hanging_indent(mut self, indent: f32) -> Self {
        self.hanging_indent = indent;
        self
    }

    pub fn with_paragraph_spacing(mut self, spacing: f32) -> Self {
        self.paragraph_spacing = spacing;
        self
    }

    /// Horizontal and vertical glyph scale.
    pub fn with_stretch(mut self, stretch_x: f32, stretch_y: f32) -> Self {
        self.stretch_x = stretch_x;
        self.stretch_y = stretch_y;
        self
    }

    pub fn with_character_spacing(mut self, spacing: f32) -> Self {
        self.character_spacing = spacing;
        self
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}pt", self.family, self.size)?;
        if self.bold {
            f.write_str(" bold")?;
        }
        if self.italic {
            f.write_str(" italic")?;
        }
        Ok(())
    }
}

fn positive(what: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::config(format!("{} must be positive, got {}", what, value)))
    }
}

fn non_negative(what: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::config(format!("{} must be non-negative, got {}", what, value)))
    }
}

//! The stateful authoring engine.
//!
//! [`Scribe`] keeps a cursor, the current drawing attributes and a stack of saved
//! states, and turns high-level commands into operators on the current page's
//! content stream. Public coordinates are in the current [`ScaleMode`]; everything is
//! stored in points.
//!
//! ```
//! use pdf_scribe::{Margins, PageKind, Scribe, ScaleMode};
//!
//! # fn main() -> pdf_scribe::Result<()> {
//! let mut scribe = Scribe::new();
//! scribe.set_scale_mode(ScaleMode::Inches);
//! scribe.new_page(PageKind::Letter, false, Margins::new(0.5, 0.5))?;
//! scribe.move_to(1.0, 1.0).line_to(2.0, 0.0)?.finish_line();
//! scribe.write("Hello", true)?;
//! let pdf = scribe.to_bytes()?;
//! assert!(pdf.starts_with(b"%PDF-"));
//! # Ok(())
//! # }
//! ```

mod codes;
mod line_tracker;
mod page;
mod path;
mod picture;
mod print;
mod state;
mod text;

pub use codes::{BARCODE_MODULE_WIDTH, DEFAULT_BARCODE_HEIGHT, DEFAULT_QR_MODULE};
pub use page::PageKind;
pub use path::DEFAULT_CORNER_BULGE;
pub use print::DEFAULT_PRINT_PORT;
pub use state::{GraphicsStateFrame, SaveHandle, StateGuard};

use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::geometry::{Margins, Point};
use crate::layout::{PictureAlignment, TextAlignment};
use crate::style::{Color, Font, LineCapStyle, LineDashStyle, LineJoinStyle, LineStyle};
use crate::units::ScaleMode;
use crate::writer::{
    ContentStreamBuilder, FontRegistry, PdfMetadata, PdfWriter, PdfWriterConfig, ResolvedFont,
};

use line_tracker::LineStyleDiffer;
use state::GraphicsStateStack;

/// Size of the open page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PageGeometry {
    width: f32,
    height: f32,
}

/// Cursor-driven page authoring on top of [`PdfWriter`].
#[derive(Debug)]
pub struct Scribe {
    doc: PdfWriter,
    fonts: FontRegistry,
    page: Option<PageGeometry>,
    scale_mode: ScaleMode,
    /// Cursor in margin-box points
    position: Point,
    /// Margins in points
    margins: Margins,
    font: Font,
    fore_color: Color,
    fill_color: Color,
    line_style: LineStyle,
    picture_alignment: PictureAlignment,
    text_alignment: TextAlignment,
    path_open: bool,
    line_tracker: LineStyleDiffer,
    states: GraphicsStateStack,
}

impl Default for Scribe {
    fn default() -> Self {
        Self::new()
    }
}

impl Scribe {
    /// Engine with the default writer configuration.
    pub fn new() -> Self {
        Self::with_config(PdfWriterConfig::default())
    }

    /// Engine writing with an explicit configuration.
    pub fn with_config(config: PdfWriterConfig) -> Self {
        Self {
            doc: PdfWriter::with_config(config),
            fonts: FontRegistry::new(),
            page: None,
            scale_mode: ScaleMode::default(),
            position: Point::default(),
            margins: Margins::default(),
            font: Font::default(),
            fore_color: Color::black(),
            fill_color: Color::black(),
            line_style: LineStyle::new(),
            picture_alignment: PictureAlignment::default(),
            text_alignment: TextAlignment::default(),
            path_open: false,
            line_tracker: LineStyleDiffer::new(),
            states: GraphicsStateStack::new(),
        }
    }

    // ------------------------------------------------------------------
    // Units
    // ------------------------------------------------------------------

    /// Measurement mode used to interpret every public coordinate.
    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    /// Change the measurement mode. Stored values are not rescaled.
    pub fn set_scale_mode(&mut self, mode: ScaleMode) -> &mut Self {
        self.scale_mode = mode;
        self
    }

    fn to_native(&self, value: f32) -> f32 {
        self.scale_mode.to_native(value)
    }

    fn from_native(&self, value: f32) -> f32 {
        self.scale_mode.from_native(value)
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    /// Cursor position in the current mode.
    pub fn position(&self) -> Point {
        self.position.from_native(self.scale_mode)
    }

    /// Cursor x in the current mode.
    pub fn x(&self) -> f32 {
        self.from_native(self.position.x)
    }

    /// Cursor y in the current mode.
    pub fn y(&self) -> f32 {
        self.from_native(self.position.y)
    }

    /// Move the cursor, finishing any open line first.
    pub fn set_position(&mut self, position: Point) -> &mut Self {
        self.finish_line();
        self.position = position.to_native(self.scale_mode);
        self
    }

    /// Set only the cursor x.
    pub fn set_x(&mut self, x: f32) -> &mut Self {
        self.finish_line();
        self.position.x = self.to_native(x);
        self
    }

    /// Set only the cursor y.
    pub fn set_y(&mut self, y: f32) -> &mut Self {
        self.finish_line();
        self.position.y = self.to_native(y);
        self
    }

    // ------------------------------------------------------------------
    // Colours
    // ------------------------------------------------------------------

    /// Colour for lines, borders, text and bars.
    pub fn fore_color(&self) -> Color {
        self.fore_color
    }

    /// Colour for filled shapes.
    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn set_fore_color(&mut self, color: Color) -> &mut Self {
        self.finish_line();
        self.fore_color = color;
        if let Some(content) = self.doc.current_content_mut() {
            content.stroke_color(color);
        }
        self
    }

    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        self.finish_line();
        self.fill_color = color;
        if let Some(content) = self.doc.current_content_mut() {
            content.fill_color(color);
        }
        self
    }

    // ------------------------------------------------------------------
    // Line style
    // ------------------------------------------------------------------

    /// Style applied to the next stroked path.
    pub fn line_style(&self) -> &LineStyle {
        &self.line_style
    }

    /// Replace the line style. Open lines are stroked with the old style first.
    pub fn set_line_style(&mut self, style: LineStyle) -> &mut Self {
        self.finish_line();
        self.line_style = style;
        self
    }

    /// Set the line width in the current mode.
    pub fn set_line_width(&mut self, width: f32) -> Result<&mut Self> {
        let style = self.line_style.clone().with_width(width)?;
        Ok(self.set_line_style(style))
    }

    pub fn set_line_cap(&mut self, cap: LineCapStyle) -> &mut Self {
        let style = self.line_style.clone().with_cap(cap);
        self.set_line_style(style)
    }

    pub fn set_line_join(&mut self, join: LineJoinStyle) -> &mut Self {
        let style = self.line_style.clone().with_join(join);
        self.set_line_style(style)
    }

    pub fn set_line_dash(&mut self, dash: LineDashStyle) -> &mut Self {
        let style = self.line_style.clone().with_dash(dash);
        self.set_line_style(style)
    }

    // ------------------------------------------------------------------
    // Fonts
    // ------------------------------------------------------------------

    /// Current font request.
    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Replace the current font.
    ///
    /// The family must be built in or registered, and the style combination valid.
    pub fn set_font(&mut self, font: Font) -> Result<&mut Self> {
        self.fonts.resolve(&font)?;
        self.font = font;
        Ok(self)
    }

    /// Register a TrueType/OpenType program under `family`.
    pub fn register_font(&mut self, family: &str, data: Vec<u8>) -> Result<&mut Self> {
        self.fonts.register(family, data)?;
        Ok(self)
    }

    /// Register a font program read from disk.
    pub fn register_font_file(
        &mut self,
        family: &str,
        path: impl AsRef<Path>,
    ) -> Result<&mut Self> {
        self.fonts.register_file(family, path)?;
        Ok(self)
    }

    /// Fonts known to this engine.
    pub fn font_registry(&self) -> &FontRegistry {
        &self.fonts
    }

    fn resolved_font(&self) -> Result<ResolvedFont> {
        self.fonts.resolve(&self.font)
    }

    // ------------------------------------------------------------------
    // Alignment
    // ------------------------------------------------------------------

    pub fn picture_alignment(&self) -> PictureAlignment {
        self.picture_alignment
    }

    /// Anchor used by pictures, QR codes and barcodes.
    pub fn set_picture_alignment(&mut self, alignment: PictureAlignment) -> &mut Self {
        self.picture_alignment = alignment;
        self
    }

    pub fn text_alignment(&self) -> TextAlignment {
        self.text_alignment
    }

    /// Anchor used by text output.
    pub fn set_text_alignment(&mut self, alignment: TextAlignment) -> &mut Self {
        self.text_alignment = alignment;
        self
    }

    // ------------------------------------------------------------------
    // Document
    // ------------------------------------------------------------------

    /// Document information entries.
    pub fn metadata(&self) -> &PdfMetadata {
        self.doc.metadata()
    }

    pub fn metadata_mut(&mut self) -> &mut PdfMetadata {
        self.doc.metadata_mut()
    }

    /// Number of pages created so far.
    pub fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    /// Finalise the document and return its bytes.
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        self.into_document("to_bytes")?.finish()
    }

    /// Finalise the document into `writer`, streaming objects as they are serialized.
    pub fn write_to<W: Write>(self, writer: W) -> Result<()> {
        self.into_document("write_to")?.finish_to(writer)?;
        Ok(())
    }

    /// Finalise the document into a file.
    pub fn save(self, path: impl AsRef<Path>) -> Result<()> {
        let doc = self.into_document("save")?;
        let file = std::fs::File::create(path.as_ref())?;
        doc.finish_to(std::io::BufWriter::new(file))?;
        log::info!("saved {}", path.as_ref().display());
        Ok(())
    }

    /// Close any open line and hand over the document for serialization.
    fn into_document(mut self, operation: &str) -> Result<PdfWriter> {
        self.finish_line();
        if !self.doc.has_page() {
            return Err(Error::no_page(operation));
        }
        Ok(self.doc)
    }

    // ------------------------------------------------------------------
    // Content stream access
    // ------------------------------------------------------------------

    /// Content stream of the open page.
    fn content(&mut self, operation: &str) -> Result<&mut ContentStreamBuilder> {
        self.doc
            .current_content_mut()
            .ok_or_else(|| Error::no_page(operation))
    }

    fn require_page(&self, operation: &str) -> Result<()> {
        if self.doc.has_page() {
            Ok(())
        } else {
            Err(Error::no_page(operation))
        }
    }

    /// Content stream with the line style brought up to date.
    fn stroke_content(&mut self, operation: &str) -> Result<&mut ContentStreamBuilder> {
        let content = self
            .doc
            .current_content_mut()
            .ok_or_else(|| Error::no_page(operation))?;
        self.line_tracker
            .apply(&self.line_style, self.scale_mode, content);
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let scribe = Scribe::new();
        assert_eq!(scribe.scale_mode(), ScaleMode::Hundredths);
        assert_eq!(scribe.position(), Point::default());
        assert_eq!(scribe.fore_color(), Color::black());
        assert_eq!(scribe.font().family(), "Helvetica");
        assert_eq!(scribe.text_alignment(), TextAlignment::LeftBaseline);
        assert_eq!(scribe.page_count(), 0);
    }

    #[test]
    fn test_position_round_trips_through_mode() {
        let mut scribe = Scribe::new();
        scribe.set_scale_mode(ScaleMode::Inches);
        scribe.set_position(Point::new(1.0, 2.0));
        scribe.set_scale_mode(ScaleMode::Points);
        assert_eq!(scribe.position(), Point::new(72.0, 144.0));
    }

    #[test]
    fn test_negative_line_width_rejected_without_change() {
        let mut scribe = Scribe::new();
        assert!(matches!(
            scribe.set_line_width(-1.0),
            Err(Error::InvalidConfiguration(_))
        ));
        assert_eq!(scribe.line_style(), &LineStyle::new());
    }

    #[test]
    fn test_unknown_font_is_missing_resource() {
        let mut scribe = Scribe::new();
        let font = Font::new("Garamond", 10.0).unwrap();
        assert!(matches!(scribe.set_font(font), Err(Error::MissingResource(_))));
        assert_eq!(scribe.font(), &Font::default());
    }

    #[test]
    fn test_to_bytes_without_page() {
        assert!(matches!(Scribe::new().to_bytes(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_color_without_page_is_stored() {
        let mut scribe = Scribe::new();
        scribe.set_fore_color(Color::rgb(255, 0, 0));
        assert_eq!(scribe.fore_color(), Color::rgb(255, 0, 0));
    }
}

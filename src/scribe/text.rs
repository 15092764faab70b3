//! Text output: single runs, explicit line breaks, word wrapping and justification.
//!
//! Every call is split at CR, LF or CRLF. Each piece is one visual attempt; with a width
//! limit the piece is wrapped greedily and whatever does not fit is handed back to the
//! caller (or to the next iteration of [`Scribe::write_lines`]).
//!
//! A run is drawn inside `q … Q` with the text matrix
//! `stretchX 0 skew -stretchY x y`, which keeps glyphs upright in the flipped page
//! space. Bold and italic are simulated for registered fonts that only have one face.

use super::Scribe;
use crate::error::{Error, Result};
use crate::layout::{fit_line, justify_spacing, split_at_line_break, HorizontalAlign, TextMetrics};
use crate::style::Font;
use crate::writer::{
    ContentStreamBuilder, ContentStreamOp, EncodedText, LineCap, LineJoin, ResolvedFont,
    TextArrayItem,
};

/// Horizontal shear of the simulated italic.
pub(crate) const ITALIC_SKEW: f32 = 0.21256;

/// Simulated bold strokes glyph outlines with `size / BOLD_STROKE_DIVISOR`.
const BOLD_STROKE_DIVISOR: f32 = 30.0;

/// Rendered width of `text` in points: advances, character spacing and stretch.
fn measure(font: &ResolvedFont, style: &Font, text: &str) -> f32 {
    let advances = font.text_width(text);
    let spacing = style.character_spacing() * text.chars().count() as f32;
    (advances + spacing) * style.stretch_x()
}

/// Vertical metrics in points after vertical stretch.
fn stretched_metrics(font: &ResolvedFont, style: &Font) -> TextMetrics {
    let m = font.text_metrics();
    let k = style.stretch_y();
    TextMetrics {
        ascent: m.ascent * k,
        descent: m.descent * k,
        cap_height: m.cap_height * k,
        leading: m.leading * k,
    }
}

/// How one visual line ended.
struct LineOutcome {
    remainder: Option<String>,
    /// The remainder is the tail of a wrapped line rather than a new paragraph.
    wrapped: bool,
}

impl Scribe {
    /// Write `text` at the cursor.
    ///
    /// Embedded line breaks start new lines. With `new_line` the cursor also moves to the
    /// next line after the last piece; otherwise it moves past the text according to the
    /// text alignment.
    pub fn write(&mut self, text: &str, new_line: bool) -> Result<&mut Self> {
        let font = self.resolved_font()?;
        self.require_page("write")?;
        self.finish_line();

        let mut rest = text;
        while let Some((segment, after)) = split_at_line_break(rest) {
            self.write_segment(&font, segment, true, None)?;
            self.paragraph_break();
            rest = after;
        }
        self.write_segment(&font, rest, new_line, None)?;
        Ok(self)
    }

    /// Move to `(x, y)` and write.
    pub fn write_at(&mut self, x: f32, y: f32, text: &str, new_line: bool) -> Result<&mut Self> {
        self.require_page("write_at")?;
        self.move_to(x, y);
        self.write(text, new_line)
    }

    /// Write one visual line no wider than `width` and return what did not fit.
    ///
    /// The cursor always moves to the next line. Only left alignments are accepted.
    ///
    /// ```
    /// use pdf_scribe::{Margins, PageKind, Scribe, ScaleMode};
    ///
    /// # fn main() -> pdf_scribe::Result<()> {
    /// let mut scribe = Scribe::new();
    /// scribe.set_scale_mode(ScaleMode::Points);
    /// scribe.new_page(PageKind::Letter, false, Margins::default())?;
    /// let rest = scribe.write_line(40.0, "several words that will not fit", false)?;
    /// assert!(rest.is_some());
    /// # Ok(())
    /// # }
    /// ```
    pub fn write_line(&mut self, width: f32, text: &str, justify: bool) -> Result<Option<String>> {
        self.require_left_alignment()?;
        let font = self.resolved_font()?;
        self.require_page("write_line")?;
        self.finish_line();
        let width = self.to_native(width);
        Ok(self.write_line_native(&font, width, text, justify)?.remainder)
    }

    /// Write a whole block wrapped to `width`.
    ///
    /// Continuation lines of a wrapped paragraph are indented by `next_line_left_indent`
    /// and narrowed by both indents. Lines that follow an explicit break start at the
    /// original x with the full width.
    pub fn write_lines(
        &mut self,
        width: f32,
        next_line_left_indent: f32,
        next_line_right_indent: f32,
        text: &str,
        justify: bool,
    ) -> Result<&mut Self> {
        self.require_left_alignment()?;
        let font = self.resolved_font()?;
        self.require_page("write_lines")?;
        self.finish_line();

        if text.is_empty() {
            self.write_segment(&font, "", true, None)?;
            return Ok(self);
        }

        let full_width = self.to_native(width);
        let indent = self.to_native(next_line_left_indent);
        let narrow_width = full_width - indent - self.to_native(next_line_right_indent);
        let base_x = self.position.x;

        let mut outcome = self.write_line_native(&font, full_width, text, justify)?;
        while let Some(rest) = outcome.remainder.take() {
            let width = if outcome.wrapped {
                self.position.x = base_x + indent;
                narrow_width
            } else {
                self.position.x = base_x;
                full_width
            };
            outcome = self.write_line_native(&font, width, &rest, justify)?;
        }
        self.position.x = base_x;
        Ok(self)
    }

    /// Wrap to `width` using the current font's hanging indent and justification.
    pub fn write_wrapped(&mut self, width: f32, text: &str) -> Result<&mut Self> {
        let indent = self.font.hanging_indent();
        let justify = self.font.justify();
        self.write_lines(width, indent, 0.0, text, justify)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Rendered width of `text` in the current font, in the current mode.
    pub fn text_width(&self, text: &str) -> Result<f32> {
        let font = self.resolved_font()?;
        Ok(self.from_native(measure(&font, &self.font, text)))
    }

    /// Ascent plus descent plus leading.
    pub fn text_height(&self) -> Result<f32> {
        Ok(self.from_native(self.current_metrics()?.line_height()))
    }

    pub fn text_ascent(&self) -> Result<f32> {
        Ok(self.from_native(self.current_metrics()?.ascent))
    }

    /// Depth below the baseline, as a positive distance.
    pub fn text_descent(&self) -> Result<f32> {
        Ok(self.from_native(-self.current_metrics()?.descent))
    }

    pub fn text_cap_height(&self) -> Result<f32> {
        Ok(self.from_native(self.current_metrics()?.cap_height))
    }

    pub fn text_leading(&self) -> Result<f32> {
        Ok(self.from_native(self.current_metrics()?.leading))
    }

    fn current_metrics(&self) -> Result<TextMetrics> {
        let font = self.resolved_font()?;
        Ok(stretched_metrics(&font, &self.font))
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    fn require_left_alignment(&self) -> Result<()> {
        if self.text_alignment.is_left() {
            Ok(())
        } else {
            Err(Error::config(format!(
                "{} cannot be used with wrapped text; use a left alignment",
                self.text_alignment
            )))
        }
    }

    /// One visual line of at most `width` points from the start of `text`.
    fn write_line_native(
        &mut self,
        font: &ResolvedFont,
        width: f32,
        text: &str,
        justify: bool,
    ) -> Result<LineOutcome> {
        match split_at_line_break(text) {
            Some((segment, after)) => {
                match self.write_segment(font, segment, true, Some((width, justify)))? {
                    Some(rest) => {
                        // keep the break so the paragraph still ends there
                        let tail = &text[segment.len()..];
                        Ok(LineOutcome {
                            remainder: Some(format!("{}{}", rest, tail)),
                            wrapped: true,
                        })
                    },
                    None => {
                        self.paragraph_break();
                        Ok(LineOutcome {
                            remainder: Some(after.to_string()),
                            wrapped: false,
                        })
                    },
                }
            },
            None => {
                let rest = self.write_segment(font, text, true, Some((width, justify)))?;
                Ok(LineOutcome {
                    wrapped: rest.is_some(),
                    remainder: rest.map(str::to_string),
                })
            },
        }
    }

    /// Draw one break-free piece, wrapping it when `wrap` carries a width.
    ///
    /// Returns the part of `text` that did not fit.
    fn write_segment<'t>(
        &mut self,
        font: &ResolvedFont,
        text: &'t str,
        new_line: bool,
        wrap: Option<(f32, bool)>,
    ) -> Result<Option<&'t str>> {
        if text.is_empty() && !new_line {
            return Ok(None);
        }

        let mut remainder = None;
        let mut drawn_width = 0.0;
        if !text.is_empty() {
            let (line, word_spacing) = match wrap {
                Some((max_width, justify)) => {
                    let style = &self.font;
                    let fit = fit_line(text, max_width, |s| measure(font, style, s));
                    remainder = fit.remainder;
                    let spacing = if justify {
                        justify_spacing(&fit, max_width)
                    } else {
                        None
                    };
                    (fit.line, spacing)
                },
                None => (text, None),
            };
            log::debug!("text line {:?}", line);
            drawn_width = self.draw_run(font, line, word_spacing)?;
        }

        if new_line || remainder.is_some() {
            let metrics = stretched_metrics(font, &self.font);
            self.position.y += metrics.line_height() * self.font.line_spacing();
        } else {
            match self.text_alignment.horizontal() {
                HorizontalAlign::Left => self.position.x += drawn_width,
                HorizontalAlign::Center => self.position.x += drawn_width / 2.0,
                HorizontalAlign::Right => self.position.x -= drawn_width,
            }
        }
        Ok(remainder)
    }

    /// Extra gap after an explicit line break.
    fn paragraph_break(&mut self) {
        let spacing = self.to_native(self.font.paragraph_spacing());
        self.position.y += spacing;
    }

    /// Emit one run at the cursor and return its width in points.
    ///
    /// `word_spacing` is the extra advance per space, in points.
    fn draw_run(
        &mut self,
        font: &ResolvedFont,
        line: &str,
        word_spacing: Option<f32>,
    ) -> Result<f32> {
        let style = self.font.clone();
        let natural = measure(font, &style, line);
        let spaces = line.chars().filter(|c| *c == ' ').count() as f32;
        let width = natural + word_spacing.unwrap_or(0.0) * spaces;
        let metrics = stretched_metrics(font, &style);
        let (ox, oy) = self.text_alignment.resolve_offset(width, &metrics);
        let x = self.position.x + ox;
        let y = self.position.y + oy;
        let size = font.size();
        let fore = self.fore_color;

        let resource = self.doc.use_font(font, line)?;
        let content = self.content("write")?;
        content
            .save_state()
            .begin_text()
            .set_font(&resource, size);
        if style.character_spacing() != 0.0 {
            content.op(ContentStreamOp::SetCharacterSpacing(style.character_spacing()));
        }
        // Tw and TJ adjustments live in unscaled text space
        let unscaled_spacing = word_spacing.map(|tw| tw / style.stretch_x());
        if let (Some(tw), true) = (unscaled_spacing, font.is_single_byte()) {
            content.op(ContentStreamOp::SetWordSpacing(tw));
        }
        let skew = if font.simulate_italic() { ITALIC_SKEW } else { 0.0 };
        content.op(ContentStreamOp::SetTextMatrix(
            style.stretch_x(),
            0.0,
            skew,
            -style.stretch_y(),
            x,
            y,
        ));
        if font.simulate_bold() {
            content
                .op(ContentStreamOp::SetTextRenderMode(2))
                .stroke_color(fore)
                .set_line_cap(LineCap::Square)
                .set_dash_pattern(Vec::new(), 0.0)
                .set_line_join(LineJoin::Miter)
                .set_line_width(size / BOLD_STROKE_DIVISOR);
        }
        content.fill_color(fore);
        show_text(content, font, line, unscaled_spacing);
        if font.simulate_bold() {
            content.op(ContentStreamOp::SetTextRenderMode(0));
        }
        content.end_text();

        if style.underline() {
            content.rect(x, y + size / 4.0, width, -size / 15.0).fill();
        }
        if style.strikeout() {
            content.rect(x, y - size / 3.0, width, -size / 15.0).fill();
        }
        content.restore_state();
        Ok(width)
    }
}

/// Show-text operator for `line`.
///
/// Identity-H fonts ignore `Tw`, so justified lines get a `TJ` adjustment after every
/// space instead.
fn show_text(
    content: &mut ContentStreamBuilder,
    font: &ResolvedFont,
    line: &str,
    word_spacing: Option<f32>,
) {
    match (font.encode(line), word_spacing) {
        (EncodedText::Bytes(bytes), _) => {
            content.op(ContentStreamOp::ShowText(bytes));
        },
        (EncodedText::Hex(hex), None) => {
            content.op(ContentStreamOp::ShowHexText(hex));
        },
        (EncodedText::Hex(_), Some(tw)) => {
            let adjustment = -tw * 1000.0 / font.size();
            let mut items = Vec::new();
            for piece in line.split_inclusive(' ') {
                if let EncodedText::Hex(hex) = font.encode(piece) {
                    items.push(TextArrayItem::HexText(hex));
                }
                if piece.ends_with(' ') {
                    items.push(TextArrayItem::Adjustment(adjustment));
                }
            }
            content.op(ContentStreamOp::ShowTextArray(items));
        },
    }
}

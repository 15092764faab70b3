//! Font metrics and the font registry.
//!
//! Standard fonts carry the AFM metrics of the base-14 faces and are referenced by name.
//! Registered fonts are TrueType/OpenType programs parsed with `ttf-parser` and embedded
//! as Identity-H Type0 fonts.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use bitflags::bitflags;
use phf::phf_map;
use ttf_parser::{Face, GlyphId};

use crate::error::{Error, Result};
use crate::layout::TextMetrics;
use crate::style::{Font, StandardFamily};

bitflags! {
    /// FontDescriptor flags (ISO 32000-1 Table 123).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FontDescriptorFlags: u32 {
        /// Bit 1: All glyphs have the same width
        const FIXED_PITCH = 1 << 0;
        /// Bit 2: Glyphs have serifs
        const SERIF = 1 << 1;
        /// Bit 3: Glyphs outside the standard Latin set
        const SYMBOLIC = 1 << 2;
        /// Bit 6: Standard Latin character set
        const NONSYMBOLIC = 1 << 5;
        /// Bit 7: Glyphs are slanted
        const ITALIC = 1 << 6;
    }
}

/// Glyph metrics in 1/1000 em.
pub trait FontMetrics: fmt::Debug {
    /// Height above the baseline.
    fn ascent(&self) -> f32;
    /// Depth below the baseline (negative).
    fn descent(&self) -> f32;
    /// Height of capital letters.
    fn cap_height(&self) -> f32;
    /// Extra gap between lines.
    fn leading(&self) -> f32;
    /// Advance width of one character.
    fn char_width(&self, ch: char) -> f32;

    /// Advance width of a string.
    fn text_width(&self, text: &str) -> f32 {
        text.chars().map(|c| self.char_width(c)).sum()
    }
}

/// Advance widths of a standard face.
#[derive(Debug)]
enum Widths {
    /// Widths for codes 32..=126
    Ascii(&'static [u16; 95]),
    /// Same width for every glyph
    Fixed(u16),
}

/// One of the base-14 faces.
#[derive(Debug)]
pub struct StandardFont {
    base_font: &'static str,
    family: StandardFamily,
    ascent: f32,
    descent: f32,
    cap_height: f32,
    widths: Widths,
}

impl StandardFont {
    /// Face for a family and style combination.
    pub fn lookup(family: StandardFamily, bold: bool, italic: bool) -> &'static StandardFont {
        match (family, bold, italic) {
            (StandardFamily::Helvetica, false, false) => &HELVETICA,
            (StandardFamily::Helvetica, true, false) => &HELVETICA_BOLD,
            (StandardFamily::Helvetica, false, true) => &HELVETICA_OBLIQUE,
            (StandardFamily::Helvetica, true, true) => &HELVETICA_BOLD_OBLIQUE,
            (StandardFamily::Times, false, false) => &TIMES_ROMAN,
            (StandardFamily::Times, true, false) => &TIMES_BOLD,
            (StandardFamily::Times, false, true) => &TIMES_ITALIC,
            (StandardFamily::Times, true, true) => &TIMES_BOLD_ITALIC,
            (StandardFamily::Courier, false, false) => &COURIER,
            (StandardFamily::Courier, true, false) => &COURIER_BOLD,
            (StandardFamily::Courier, false, true) => &COURIER_OBLIQUE,
            (StandardFamily::Courier, true, true) => &COURIER_BOLD_OBLIQUE,
            (StandardFamily::Symbol, _, _) => &SYMBOL,
            (StandardFamily::ZapfDingbats, _, _) => &ZAPF_DINGBATS,
        }
    }

    /// PostScript name, used as `BaseFont`.
    pub fn base_font(&self) -> &'static str {
        self.base_font
    }

    /// Symbolic faces use their built-in encoding instead of WinAnsi.
    pub fn is_symbolic(&self) -> bool {
        self.family.is_symbolic()
    }

    /// Single-byte codes for `text`.
    ///
    /// Text faces use WinAnsiEncoding; characters it lacks become `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        if self.is_symbolic() {
            return text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect();
        }
        text.chars().map(win_ansi_code).collect()
    }
}

impl FontMetrics for StandardFont {
    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }

    fn cap_height(&self) -> f32 {
        self.cap_height
    }

    fn leading(&self) -> f32 {
        0.0
    }

    fn char_width(&self, ch: char) -> f32 {
        match &self.widths {
            Widths::Fixed(w) => *w as f32,
            Widths::Ascii(table) => {
                let code = ch as u32;
                if (32..=126).contains(&code) {
                    table[(code - 32) as usize] as f32
                } else if ch == '\u{a0}' {
                    table[0] as f32
                } else {
                    500.0
                }
            },
        }
    }
}

/// WinAnsi code for a character.
fn win_ansi_code(ch: char) -> u8 {
    let code = ch as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => code as u8,
        _ => WIN_ANSI_HIGH.get(&ch).copied().unwrap_or(b'?'),
    }
}

/// Characters WinAnsi places in 0x80..=0x9F.
static WIN_ANSI_HIGH: phf::Map<char, u8> = phf_map! {
    '€' => 0x80, '‚' => 0x82, 'ƒ' => 0x83, '„' => 0x84, '…' => 0x85, '†' => 0x86,
    '‡' => 0x87, 'ˆ' => 0x88, '‰' => 0x89, 'Š' => 0x8A, '‹' => 0x8B, 'Œ' => 0x8C,
    'Ž' => 0x8E, '‘' => 0x91, '’' => 0x92, '“' => 0x93, '”' => 0x94, '•' => 0x95,
    '–' => 0x96, '—' => 0x97, '˜' => 0x98, '™' => 0x99, 'š' => 0x9A, '›' => 0x9B,
    'œ' => 0x9C, 'ž' => 0x9E, 'Ÿ' => 0x9F,
};

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
static TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
static TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

#[rustfmt::skip]
static TIMES_ITALIC_WIDTHS: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
    920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
    333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
    500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

#[rustfmt::skip]
static TIMES_BOLD_ITALIC_WIDTHS: [u16; 95] = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    832, 667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889, 722, 722,
    611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611, 333, 278, 333, 570, 500,
    333, 500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778, 556, 500,
    500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389, 348, 220, 348, 570,
];

macro_rules! standard_font {
    ($name:ident, $base:literal, $family:ident, $asc:literal, $desc:literal, $cap:literal, $widths:expr) => {
        static $name: StandardFont = StandardFont {
            base_font: $base,
            family: StandardFamily::$family,
            ascent: $asc,
            descent: $desc,
            cap_height: $cap,
            widths: $widths,
        };
    };
}

standard_font!(HELVETICA, "Helvetica", Helvetica, 718.0, -207.0, 718.0, Widths::Ascii(&HELVETICA_WIDTHS));
standard_font!(HELVETICA_BOLD, "Helvetica-Bold", Helvetica, 718.0, -207.0, 718.0, Widths::Ascii(&HELVETICA_BOLD_WIDTHS));
standard_font!(HELVETICA_OBLIQUE, "Helvetica-Oblique", Helvetica, 718.0, -207.0, 718.0, Widths::Ascii(&HELVETICA_WIDTHS));
standard_font!(HELVETICA_BOLD_OBLIQUE, "Helvetica-BoldOblique", Helvetica, 718.0, -207.0, 718.0, Widths::Ascii(&HELVETICA_BOLD_WIDTHS));
standard_font!(TIMES_ROMAN, "Times-Roman", Times, 683.0, -217.0, 662.0, Widths::Ascii(&TIMES_ROMAN_WIDTHS));
standard_font!(TIMES_BOLD, "Times-Bold", Times, 676.0, -205.0, 676.0, Widths::Ascii(&TIMES_BOLD_WIDTHS));
standard_font!(TIMES_ITALIC, "Times-Italic", Times, 683.0, -217.0, 653.0, Widths::Ascii(&TIMES_ITALIC_WIDTHS));
standard_font!(TIMES_BOLD_ITALIC, "Times-BoldItalic", Times, 683.0, -217.0, 669.0, Widths::Ascii(&TIMES_BOLD_ITALIC_WIDTHS));
standard_font!(COURIER, "Courier", Courier, 629.0, -157.0, 562.0, Widths::Fixed(600));
standard_font!(COURIER_BOLD, "Courier-Bold", Courier, 626.0, -142.0, 562.0, Widths::Fixed(600));
standard_font!(COURIER_OBLIQUE, "Courier-Oblique", Courier, 629.0, -157.0, 562.0, Widths::Fixed(600));
standard_font!(COURIER_BOLD_OBLIQUE, "Courier-BoldOblique", Courier, 626.0, -142.0, 562.0, Widths::Fixed(600));
standard_font!(SYMBOL, "Symbol", Symbol, 800.0, -200.0, 700.0, Widths::Fixed(500));
standard_font!(ZAPF_DINGBATS, "ZapfDingbats", ZapfDingbats, 800.0, -200.0, 700.0, Widths::Fixed(500));

/// A parsed TrueType/OpenType font program.
pub struct EmbeddedFont {
    postscript_name: String,
    data: bytes::Bytes,
    /// Unicode -> GID
    glyph_lookup: HashMap<char, u16>,
    /// GID -> width in 1/1000 em
    glyph_widths: HashMap<u16, u16>,
    ascent: f32,
    descent: f32,
    line_gap: f32,
    cap_height: f32,
    bbox: [f32; 4],
    italic_angle: f32,
    flags: FontDescriptorFlags,
}

impl fmt::Debug for EmbeddedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedFont")
            .field("postscript_name", &self.postscript_name)
            .field("bytes", &self.data.len())
            .field("glyphs", &self.glyph_widths.len())
            .finish()
    }
}

impl EmbeddedFont {
    /// Parse a font program.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::Font("font data is empty".to_string()));
        }
        let face = Face::parse(&data, 0)
            .map_err(|e| Error::Font(format!("failed to parse font: {}", e)))?;

        let upem = face.units_per_em().max(1) as f32;
        let scale = |v: i16| v as f32 * 1000.0 / upem;

        let mut glyph_lookup = HashMap::new();
        for codepoint in 0x20..=0xFFFF_u32 {
            if let Some(ch) = char::from_u32(codepoint) {
                if let Some(gid) = face.glyph_index(ch) {
                    glyph_lookup.insert(ch, gid.0);
                }
            }
        }

        let mut glyph_widths = HashMap::new();
        for gid in 0..face.number_of_glyphs() {
            let advance = face.glyph_hor_advance(GlyphId(gid)).unwrap_or(0);
            glyph_widths.insert(gid, (advance as f32 * 1000.0 / upem).round() as u16);
        }

        let postscript_name = face
            .names()
            .into_iter()
            // Macintosh-platform records do not decode; keep looking for a Unicode one
            .find_map(|name| {
                (name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
                    .then(|| name.to_string())
                    .flatten()
            })
            .map(|name| name.replace(' ', ""))
            .unwrap_or_else(|| "EmbeddedFont".to_string());

        let mut flags = FontDescriptorFlags::NONSYMBOLIC;
        if face.is_monospaced() {
            flags |= FontDescriptorFlags::FIXED_PITCH;
        }
        if face.is_italic() {
            flags |= FontDescriptorFlags::ITALIC;
        }

        let bbox = face.global_bounding_box();
        let ascent = scale(face.ascender());

        Ok(Self {
            postscript_name,
            glyph_lookup,
            glyph_widths,
            ascent,
            descent: scale(face.descender()),
            line_gap: scale(face.line_gap()),
            cap_height: face.capital_height().map(scale).unwrap_or(ascent),
            bbox: [
                scale(bbox.x_min),
                scale(bbox.y_min),
                scale(bbox.x_max),
                scale(bbox.y_max),
            ],
            italic_angle: face.italic_angle().unwrap_or(0.0),
            flags,
            data: bytes::Bytes::from(data),
        })
    }

    /// PostScript name, used as `BaseFont`.
    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    /// Raw font program.
    pub fn font_data(&self) -> &bytes::Bytes {
        &self.data
    }

    /// Glyph for a character, 0 (.notdef) when absent.
    pub fn glyph_id(&self, ch: char) -> u16 {
        self.glyph_lookup.get(&ch).copied().unwrap_or(0)
    }

    /// Width of a glyph in 1/1000 em.
    pub fn glyph_width(&self, gid: u16) -> u16 {
        self.glyph_widths.get(&gid).copied().unwrap_or(500)
    }

    /// Identity-H hex string for `text`.
    pub fn encode_hex(&self, text: &str) -> String {
        let mut hex = String::with_capacity(text.len() * 4 + 2);
        hex.push('<');
        for ch in text.chars() {
            hex.push_str(&format!("{:04X}", self.glyph_id(ch)));
        }
        hex.push('>');
        hex
    }

    pub fn bbox(&self) -> [f32; 4] {
        self.bbox
    }

    pub fn italic_angle(&self) -> f32 {
        self.italic_angle
    }

    pub fn flags(&self) -> FontDescriptorFlags {
        self.flags
    }
}

impl FontMetrics for EmbeddedFont {
    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }

    fn cap_height(&self) -> f32 {
        self.cap_height
    }

    fn leading(&self) -> f32 {
        self.line_gap
    }

    fn char_width(&self, ch: char) -> f32 {
        self.glyph_width(self.glyph_id(ch)) as f32
    }
}

/// Face backing a resolved font.
#[derive(Debug, Clone)]
pub enum FontFace {
    /// Base-14 face, referenced by name.
    Standard(&'static StandardFont),
    /// Registered font program.
    Embedded(Arc<EmbeddedFont>),
}

/// Encoded glyph string ready for a show-text operator.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedText {
    /// Single-byte codes
    Bytes(Vec<u8>),
    /// Identity-H hex string
    Hex(String),
}

/// A [`Font`] request bound to an actual face.
#[derive(Debug, Clone)]
pub struct ResolvedFont {
    face: FontFace,
    size: f32,
    simulate_bold: bool,
    simulate_italic: bool,
}

impl ResolvedFont {
    pub fn face(&self) -> &FontFace {
        &self.face
    }

    /// Size in points.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Bold has to be painted with a stroke because the face has no bold design.
    pub fn simulate_bold(&self) -> bool {
        self.simulate_bold
    }

    /// Italic has to be produced with a skew because the face has no italic design.
    pub fn simulate_italic(&self) -> bool {
        self.simulate_italic
    }

    /// Metrics source.
    pub fn metrics(&self) -> &dyn FontMetrics {
        match &self.face {
            FontFace::Standard(font) => *font,
            FontFace::Embedded(font) => font.as_ref(),
        }
    }

    /// Unstretched advance width of `text` in points.
    pub fn text_width(&self, text: &str) -> f32 {
        self.metrics().text_width(text) * self.size / 1000.0
    }

    /// Vertical metrics in points.
    pub fn text_metrics(&self) -> TextMetrics {
        let m = self.metrics();
        let k = self.size / 1000.0;
        TextMetrics {
            ascent: m.ascent() * k,
            descent: m.descent() * k,
            cap_height: m.cap_height() * k,
            leading: m.leading() * k,
        }
    }

    /// Word spacing (`Tw`) only affects single-byte code 32.
    pub fn is_single_byte(&self) -> bool {
        matches!(self.face, FontFace::Standard(_))
    }

    /// Encode text for a show-text operator.
    pub fn encode(&self, text: &str) -> EncodedText {
        match &self.face {
            FontFace::Standard(font) => EncodedText::Bytes(font.encode(text)),
            FontFace::Embedded(font) => EncodedText::Hex(font.encode_hex(text)),
        }
    }

    /// Identity of the page resource this face needs.
    pub fn resource_key(&self) -> String {
        match &self.face {
            FontFace::Standard(font) => font.base_font().to_string(),
            // one resource per registered program, even when PostScript names repeat
            FontFace::Embedded(font) => {
                format!("embedded:{}@{:p}", font.postscript_name(), Arc::as_ptr(font))
            },
        }
    }
}

/// Fonts available to one engine instance.
#[derive(Debug, Default, Clone)]
pub struct FontRegistry {
    /// Lowercased family -> program
    embedded: HashMap<String, Arc<EmbeddedFont>>,
}

impl FontRegistry {
    /// Empty registry; the base-14 families are always available.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font program under a family name.
    pub fn register(&mut self, family: &str, data: Vec<u8>) -> Result<()> {
        let key = family.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(Error::config("font family must not be empty"));
        }
        if StandardFamily::from_name(&key).is_some() {
            return Err(Error::config(format!(
                "'{}' is a built-in family and cannot be replaced",
                family
            )));
        }
        let font = EmbeddedFont::from_bytes(data)?;
        log::debug!("registered font family '{}' ({})", family, font.postscript_name());
        self.embedded.insert(key, Arc::new(font));
        Ok(())
    }

    /// Register a font program read from disk.
    pub fn register_file(&mut self, family: &str, path: impl AsRef<Path>) -> Result<()> {
        let data = std::fs::read(path.as_ref())?;
        self.register(family, data)
    }

    /// True when `family` is built in or registered.
    pub fn contains(&self, family: &str) -> bool {
        StandardFamily::from_name(family).is_some()
            || self
                .embedded
                .contains_key(&family.trim().to_ascii_lowercase())
    }

    /// Bind a font request to a face.
    pub fn resolve(&self, font: &Font) -> Result<ResolvedFont> {
        font.validate()?;
        if let Some(family) = font.standard_family() {
            return Ok(ResolvedFont {
                face: FontFace::Standard(StandardFont::lookup(family, font.bold(), font.italic())),
                size: font.size(),
                simulate_bold: false,
                simulate_italic: false,
            });
        }
        let program = self
            .embedded
            .get(&font.family().trim().to_ascii_lowercase())
            .ok_or_else(|| {
                Error::MissingResource(format!(
                    "font family '{}' is not registered",
                    font.family()
                ))
            })?;
        Ok(ResolvedFont {
            face: FontFace::Embedded(Arc::clone(program)),
            size: font.size(),
            simulate_bold: font.bold(),
            simulate_italic: font.italic(),
        })
    }
}

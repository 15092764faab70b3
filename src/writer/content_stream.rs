//! Page content streams.
//!
//! [`ContentStreamBuilder`] records [`ContentStreamOp`]s and serializes them one
//! operator per line, operands first, in the order they were pushed.

use crate::error::Result;
use crate::style::Color;
use std::fmt;
use std::io::{self, Write};

/// One content stream operator with its operands, in user space.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// `q`
    SaveState,
    /// `Q`
    RestoreState,
    /// `a b c d e f cm`
    Transform(f32, f32, f32, f32, f32, f32),
    /// `BT`
    BeginText,
    /// `ET`
    EndText,
    /// `/name size Tf`
    SetFont(String, f32),
    /// `a b c d e f Tm`
    SetTextMatrix(f32, f32, f32, f32, f32, f32),
    /// Literal string shown with `Tj`
    ShowText(Vec<u8>),
    /// Preformatted `<...>` string shown with `Tj`
    ShowHexText(String),
    /// Strings and kerning shown with `TJ`
    ShowTextArray(Vec<TextArrayItem>),
    /// `Tc`
    SetCharacterSpacing(f32),
    /// `Tw`
    SetWordSpacing(f32),
    /// `Tr`
    SetTextRenderMode(u8),
    /// `rg`
    SetFillColorRGB(f32, f32, f32),
    /// `RG`
    SetStrokeColorRGB(f32, f32, f32),
    /// `w`
    SetLineWidth(f32),
    /// `m`
    MoveTo(f32, f32),
    /// `l`
    LineTo(f32, f32),
    /// `c`
    CurveTo(f32, f32, f32, f32, f32, f32),
    /// `v`: the first control point is the current point
    CurveToV(f32, f32, f32, f32),
    /// `re`
    Rectangle(f32, f32, f32, f32),
    /// `h`
    ClosePath,
    /// `S`
    Stroke,
    /// `f`
    Fill,
    /// `f*`
    FillEvenOdd,
    /// `B`
    FillStroke,
    /// `s`
    CloseStroke,
    /// `b`
    CloseFillStroke,
    /// `b*`
    CloseFillStrokeEvenOdd,
    /// `n`
    EndPath,
    /// `/name Do`
    PaintXObject(String),
    /// `J`
    SetLineCap(LineCap),
    /// `j`
    SetLineJoin(LineJoin),
    /// `[dashes] phase d`
    SetDashPattern(Vec<f32>, f32),
}

impl ContentStreamOp {
    /// The operator keyword that ends this operation.
    pub fn operator(&self) -> &'static str {
        use ContentStreamOp::*;
        match self {
            SaveState => "q",
            RestoreState => "Q",
            Transform(..) => "cm",
            BeginText => "BT",
            EndText => "ET",
            SetFont(..) => "Tf",
            SetTextMatrix(..) => "Tm",
            ShowText(_) | ShowHexText(_) => "Tj",
            ShowTextArray(_) => "TJ",
            SetCharacterSpacing(_) => "Tc",
            SetWordSpacing(_) => "Tw",
            SetTextRenderMode(_) => "Tr",
            SetFillColorRGB(..) => "rg",
            SetStrokeColorRGB(..) => "RG",
            SetLineWidth(_) => "w",
            MoveTo(..) => "m",
            LineTo(..) => "l",
            CurveTo(..) => "c",
            CurveToV(..) => "v",
            Rectangle(..) => "re",
            ClosePath => "h",
            Stroke => "S",
            Fill => "f",
            FillEvenOdd => "f*",
            FillStroke => "B",
            CloseStroke => "s",
            CloseFillStroke => "b",
            CloseFillStrokeEvenOdd => "b*",
            EndPath => "n",
            PaintXObject(_) => "Do",
            SetLineCap(_) => "J",
            SetLineJoin(_) => "j",
            SetDashPattern(..) => "d",
        }
    }

    /// Write the operands, each followed by a space.
    fn write_operands<W: Write>(&self, w: &mut W) -> io::Result<()> {
        use ContentStreamOp::*;
        match self {
            Transform(a, b, c, d, e, f)
            | SetTextMatrix(a, b, c, d, e, f)
            | CurveTo(a, b, c, d, e, f) => write_numbers(w, &[*a, *b, *c, *d, *e, *f]),
            CurveToV(a, b, c, d) | Rectangle(a, b, c, d) => write_numbers(w, &[*a, *b, *c, *d]),
            SetFillColorRGB(r, g, b) | SetStrokeColorRGB(r, g, b) => {
                write_numbers(w, &[*r, *g, *b])
            },
            MoveTo(x, y) | LineTo(x, y) => write_numbers(w, &[*x, *y]),
            SetCharacterSpacing(v) | SetWordSpacing(v) | SetLineWidth(v) => {
                write_numbers(w, &[*v])
            },
            SetFont(name, size) => write!(w, "/{} {} ", name, Num(*size)),
            PaintXObject(name) => write!(w, "/{} ", name),
            SetTextRenderMode(mode) => write!(w, "{} ", mode),
            SetLineCap(cap) => write!(w, "{} ", *cap as u8),
            SetLineJoin(join) => write!(w, "{} ", *join as u8),
            ShowText(bytes) => {
                write_literal(w, bytes)?;
                w.write_all(b" ")
            },
            ShowHexText(hex) => write!(w, "{} ", hex),
            ShowTextArray(items) => {
                w.write_all(b"[")?;
                for item in items {
                    match item {
                        TextArrayItem::Text(bytes) => write_literal(w, bytes)?,
                        TextArrayItem::HexText(hex) => w.write_all(hex.as_bytes())?,
                        TextArrayItem::Adjustment(adj) => write!(w, "{}", Num(*adj))?,
                    }
                    w.write_all(b" ")?;
                }
                w.write_all(b"] ")
            },
            SetDashPattern(dashes, phase) => {
                let dashes: Vec<String> = dashes.iter().map(|d| Num(*d).to_string()).collect();
                write!(w, "[{}] {} ", dashes.join(" "), Num(*phase))
            },
            _ => Ok(()),
        }
    }
}

/// `J` operand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt = 0,
    Round = 1,
    Square = 2,
}

/// `j` operand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineJoin {
    #[default]
    Miter = 0,
    Round = 1,
    Bevel = 2,
}

/// Element of a `TJ` array.
#[derive(Debug, Clone, PartialEq)]
pub enum TextArrayItem {
    /// Single-byte codes
    Text(Vec<u8>),
    /// Preformatted `<...>` string
    HexText(String),
    /// Thousandths of an em; negative values move the next glyph right
    Adjustment(f32),
}

/// Operand formatting: integers bare, fractions to four places without trailing zeros.
pub(crate) struct Num(pub f32);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_assert!(self.0.is_finite(), "non-finite content stream operand {}", self.0);
        let v = if self.0 == 0.0 { 0.0 } else { self.0 };
        if v.fract() == 0.0 && v.abs() < 1e9 {
            return write!(f, "{}", v as i64);
        }
        let s = format!("{:.4}", v);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        f.write_str(if s == "-0" { "0" } else { s })
    }
}

/// Bézier handle length for a quarter circle of radius 1.
pub const KAPPA: f32 = 0.552_284_8;

/// Ordered list of operations for one page.
#[derive(Debug, Default, Clone)]
pub struct ContentStreamBuilder {
    operations: Vec<ContentStreamOp>,
}

impl ContentStreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `op`.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    pub fn operations(&self) -> &[ContentStreamOp] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn begin_text(&mut self) -> &mut Self {
        self.op(ContentStreamOp::BeginText)
    }

    pub fn end_text(&mut self) -> &mut Self {
        self.op(ContentStreamOp::EndText)
    }

    /// Select the font resource `resource_name` at `size` points.
    pub fn set_font(&mut self, resource_name: &str, size: f32) -> &mut Self {
        self.op(ContentStreamOp::SetFont(resource_name.to_string(), size))
    }

    pub fn fill_color(&mut self, color: Color) -> &mut Self {
        self.op(ContentStreamOp::SetFillColorRGB(color.r, color.g, color.b))
    }

    pub fn stroke_color(&mut self, color: Color) -> &mut Self {
        self.op(ContentStreamOp::SetStrokeColorRGB(color.r, color.g, color.b))
    }

    pub fn set_line_width(&mut self, width: f32) -> &mut Self {
        self.op(ContentStreamOp::SetLineWidth(width))
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.op(ContentStreamOp::MoveTo(x, y))
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.op(ContentStreamOp::LineTo(x, y))
    }

    pub fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) -> &mut Self {
        self.op(ContentStreamOp::CurveTo(x1, y1, x2, y2, x3, y3))
    }

    /// Curve whose first control point is the current point.
    pub fn curve_to_v(&mut self, x2: f32, y2: f32, x3: f32, y3: f32) -> &mut Self {
        self.op(ContentStreamOp::CurveToV(x2, y2, x3, y3))
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.op(ContentStreamOp::Rectangle(x, y, width, height))
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.op(ContentStreamOp::Stroke)
    }

    pub fn fill(&mut self) -> &mut Self {
        self.op(ContentStreamOp::Fill)
    }

    pub fn fill_stroke(&mut self) -> &mut Self {
        self.op(ContentStreamOp::FillStroke)
    }

    pub fn close_path(&mut self) -> &mut Self {
        self.op(ContentStreamOp::ClosePath)
    }

    pub fn save_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::SaveState)
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::RestoreState)
    }

    /// Concatenate `[a b c d e f]` onto the current transformation matrix.
    pub fn transform(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> &mut Self {
        self.op(ContentStreamOp::Transform(a, b, c, d, e, f))
    }

    pub fn set_line_cap(&mut self, cap: LineCap) -> &mut Self {
        self.op(ContentStreamOp::SetLineCap(cap))
    }

    pub fn set_line_join(&mut self, join: LineJoin) -> &mut Self {
        self.op(ContentStreamOp::SetLineJoin(join))
    }

    /// Dash lengths alternate on and off, starting `phase` into the pattern.
    pub fn set_dash_pattern(&mut self, pattern: Vec<f32>, phase: f32) -> &mut Self {
        self.op(ContentStreamOp::SetDashPattern(pattern, phase))
    }

    /// Circle as four Bézier quadrants, starting and ending at the rightmost point.
    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32) -> &mut Self {
        let c = radius * KAPPA;

        self.move_to(cx + radius, cy)
            .curve_to(cx + radius, cy + c, cx + c, cy + radius, cx, cy + radius)
            .curve_to(cx - c, cy + radius, cx - radius, cy + c, cx - radius, cy)
            .curve_to(cx - radius, cy - c, cx - c, cy - radius, cx, cy - radius)
            .curve_to(cx + c, cy - radius, cx + radius, cy - c, cx + radius, cy)
            .close_path()
    }

    /// Draw a rounded rectangle.
    ///
    /// Width and height may be negative; the box then extends left or up from (x, y).
    pub fn rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
    ) -> &mut Self {
        let r = radius.abs().min(width.abs() / 2.0).min(height.abs() / 2.0);
        let rx = r * width.signum();
        let ry = r * height.signum();
        let kx = rx * KAPPA;
        let ky = ry * KAPPA;
        let (x1, y1) = (x + width, y + height);

        self.move_to(x + rx, y)
            .line_to(x1 - rx, y)
            .curve_to(x1 - rx + kx, y, x1, y + ry - ky, x1, y + ry)
            .line_to(x1, y1 - ry)
            .curve_to(x1, y1 - ry + ky, x1 - rx + kx, y1, x1 - rx, y1)
            .line_to(x + rx, y1)
            .curve_to(x + rx - kx, y1, x, y1 - ry + ky, x, y1 - ry)
            .line_to(x, y + ry)
            .curve_to(x, y + ry - ky, x + rx - kx, y, x + rx, y)
            .close_path()
    }

    /// Serialize every operation, one per line.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.operations.len() * 16);
        for op in &self.operations {
            op.write_operands(&mut buf)?;
            buf.extend_from_slice(op.operator().as_bytes());
            buf.push(b'\n');
        }
        Ok(buf)
    }
}

fn write_numbers<W: Write>(w: &mut W, values: &[f32]) -> io::Result<()> {
    for v in values {
        write!(w, "{} ", Num(*v))?;
    }
    Ok(())
}

/// `(...)` string with the delimiters and control characters escaped.
fn write_literal<W: Write>(w: &mut W, bytes: &[u8]) -> io::Result<()> {
    w.write_all(b"(")?;
    for &byte in bytes {
        match byte {
            b'(' | b')' | b'\\' => w.write_all(&[b'\\', byte])?,
            b'\n' => w.write_all(b"\\n")?,
            b'\r' => w.write_all(b"\\r")?,
            b'\t' => w.write_all(b"\\t")?,
            _ => w.write_all(&[byte])?,
        }
    }
    w.write_all(b")")
}

//! QR codes and barcodes anchored at the cursor.
//!
//! Both honour the picture alignment, and both leave the cursor at the far corner of
//! the placed box whatever the alignment was.

use super::Scribe;
use crate::error::Result;
use crate::geometry::{Point, Size};
use crate::writer::{BarPattern, ModuleMatrix, QrErrorCorrection};

/// Module pitch of a QR code drawn without an explicit size, in points.
pub const DEFAULT_QR_MODULE: f32 = 72.0 / 33.0;

/// Width of one barcode module, in points.
pub const BARCODE_MODULE_WIDTH: f32 = 0.8;

/// Bar height of a barcode drawn without an explicit height, in points.
pub const DEFAULT_BARCODE_HEIGHT: f32 = 36.0;

/// Modules to skip on each side and modules drawn per side.
fn visible_span(matrix: &ModuleMatrix, quiet_zone: bool) -> (usize, usize) {
    if quiet_zone {
        return (0, matrix.size());
    }
    let rings = matrix.blank_rings();
    (rings, matrix.size().saturating_sub(2 * rings))
}

impl Scribe {
    /// Draw a 2D module matrix.
    ///
    /// `size` is the side of the placed square in the current mode; without it each
    /// module is [`DEFAULT_QR_MODULE`] points. With `quiet_zone` off the blank rings
    /// around the symbol are not part of the placed box. Dark modules are filled with
    /// the fill colour; `border` strokes the box outline.
    pub fn qr_code(
        &mut self,
        matrix: &ModuleMatrix,
        size: Option<f32>,
        border: bool,
        quiet_zone: bool,
    ) -> Result<&mut Self> {
        self.require_page("qr_code")?;
        self.finish_line();
        let (skip, count) = visible_span(matrix, quiet_zone);
        let count = count.max(1);
        let side = match size {
            Some(size) => self.to_native(size),
            None => DEFAULT_QR_MODULE * count as f32,
        };
        let pitch = side / count as f32;
        let (dx, dy) = self.picture_alignment.resolve_offset(Size::new(side, side));
        let origin = self.position.offset(dx, dy);

        let content = self.content("qr_code")?;
        let mut dark = 0usize;
        for row in 0..count {
            for col in 0..count {
                if matrix.get(row + skip, col + skip) {
                    content.rect(
                        origin.x + col as f32 * pitch,
                        origin.y + row as f32 * pitch,
                        pitch,
                        pitch,
                    );
                    dark += 1;
                }
            }
        }
        if dark > 0 {
            content.fill();
        }
        if border {
            self.stroke_content("qr_code")?
                .rect(origin.x, origin.y, side, side)
                .stroke();
        }
        log::debug!("placed {}x{} module code ({} dark)", count, count, dark);

        self.position = Point::new(origin.x + side, origin.y + side);
        Ok(self)
    }

    /// Encode `text` as a QR code and draw it with its quiet zone.
    pub fn qr_code_text(
        &mut self,
        text: &str,
        level: QrErrorCorrection,
        size: Option<f32>,
        border: bool,
    ) -> Result<&mut Self> {
        let matrix = ModuleMatrix::qr(text, level)?;
        self.qr_code(&matrix, size, border, true)
    }

    /// Side of the square [`qr_code`](Self::qr_code) draws without an explicit size.
    pub fn qr_code_size(&self, matrix: &ModuleMatrix, quiet_zone: bool) -> f32 {
        let (_, count) = visible_span(matrix, quiet_zone);
        self.from_native(DEFAULT_QR_MODULE * count.max(1) as f32)
    }

    /// Draw a 1D symbol in the fore colour.
    ///
    /// `width` defaults to the natural width ([`BARCODE_MODULE_WIDTH`] per module) and
    /// only scales horizontally; `height` defaults to half an inch.
    pub fn barcode(
        &mut self,
        pattern: &BarPattern,
        width: Option<f32>,
        height: Option<f32>,
    ) -> Result<&mut Self> {
        self.require_page("barcode")?;
        self.finish_line();
        let natural = pattern.len() as f32 * BARCODE_MODULE_WIDTH;
        let w = width.map(|w| self.to_native(w)).unwrap_or(natural);
        let h = height
            .map(|h| self.to_native(h))
            .unwrap_or(DEFAULT_BARCODE_HEIGHT);
        let (dx, dy) = self.picture_alignment.resolve_offset(Size::new(w, h));
        let origin = self.position.offset(dx, dy);
        let fore = self.fore_color;

        let content = self.content("barcode")?;
        content
            .save_state()
            .fill_color(fore)
            .transform(w / natural, 0.0, 0.0, 1.0, origin.x, origin.y);
        for (start, len) in pattern.bars() {
            content.rect(
                start as f32 * BARCODE_MODULE_WIDTH,
                0.0,
                len as f32 * BARCODE_MODULE_WIDTH,
                h,
            );
        }
        content.fill().restore_state();

        self.position = Point::new(origin.x + w, origin.y + h);
        Ok(self)
    }

    /// Encode `text` as Code 128 and draw it.
    pub fn barcode_text(
        &mut self,
        text: &str,
        width: Option<f32>,
        height: Option<f32>,
    ) -> Result<&mut Self> {
        let pattern = BarPattern::code128(text)?;
        self.barcode(&pattern, width, height)
    }

    /// Natural size of `pattern` in the current mode.
    pub fn barcode_size(&self, pattern: &BarPattern, height: Option<f32>) -> Size {
        let width = pattern.len() as f32 * BARCODE_MODULE_WIDTH;
        let height = height
            .map(|h| self.to_native(h))
            .unwrap_or(DEFAULT_BARCODE_HEIGHT);
        Size::new(width, height).from_native(self.scale_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::geometry::Margins;
    use crate::layout::PictureAlignment;
    use crate::scribe::PageKind;
    use crate::units::ScaleMode;
    use crate::writer::ContentStreamOp;

    fn scribe() -> Scribe {
        let mut scribe = Scribe::new();
        scribe.set_scale_mode(ScaleMode::Points);
        scribe
            .new_page(PageKind::Letter, false, Margins::default())
            .unwrap();
        scribe
    }

    fn rects(scribe: &Scribe) -> Vec<(f32, f32, f32, f32)> {
        scribe
            .doc
            .current_content()
            .unwrap()
            .operations()
            .iter()
            .filter_map(|op| match op {
                ContentStreamOp::Rectangle(x, y, w, h) => Some((*x, *y, *w, *h)),
                _ => None,
            })
            .collect()
    }

    /// 4x4 matrix with one blank ring around a 2x2 checker.
    fn ringed() -> ModuleMatrix {
        ModuleMatrix::new(vec![
            vec![false, false, false, false],
            vec![false, true, false, false],
            vec![false, false, true, false],
            vec![false, false, false, false],
        ])
        .unwrap()
    }

    #[test]
    fn test_qr_with_quiet_zone() {
        let mut s = scribe();
        s.qr_code(&ringed(), Some(40.0), false, true).unwrap();
        assert_eq!(rects(&s), vec![(10.0, 10.0, 10.0, 10.0), (20.0, 20.0, 10.0, 10.0)]);
        assert_eq!(s.position(), Point::new(40.0, 40.0));
    }

    #[test]
    fn test_qr_without_quiet_zone() {
        let mut s = scribe();
        s.qr_code(&ringed(), Some(40.0), false, false).unwrap();
        assert_eq!(rects(&s), vec![(0.0, 0.0, 20.0, 20.0), (20.0, 20.0, 20.0, 20.0)]);
    }

    #[test]
    fn test_qr_cursor_ignores_alignment() {
        let mut s = scribe();
        s.move_to(100.0, 100.0);
        s.set_picture_alignment(PictureAlignment::CenterCenter);
        s.qr_code(&ringed(), Some(40.0), true, true).unwrap();
        assert_eq!(s.position(), Point::new(120.0, 120.0));
        assert_eq!(rects(&s).last(), Some(&(80.0, 80.0, 40.0, 40.0)));
    }

    #[test]
    fn test_qr_default_size() {
        let s = scribe();
        let size = s.qr_code_size(&ringed(), true);
        assert!((size - 4.0 * 72.0 / 33.0).abs() < 1e-4);
        assert!((s.qr_code_size(&ringed(), false) - 2.0 * 72.0 / 33.0).abs() < 1e-4);
    }

    #[test]
    fn test_barcode_scaling_and_cursor() {
        let mut s = scribe();
        let pattern = BarPattern::new(vec![true, true, false, true]).unwrap();
        s.move_to(10.0, 10.0);
        s.barcode(&pattern, Some(6.4), None).unwrap();
        let ops = s.doc.current_content().unwrap().operations().to_vec();
        assert!(ops.contains(&ContentStreamOp::Transform(2.0, 0.0, 0.0, 1.0, 10.0, 10.0)));
        assert_eq!(rects(&s), vec![(0.0, 0.0, 1.6, 36.0), (2.4, 0.0, 0.8, 36.0)]);
        assert_eq!(s.position(), Point::new(16.4, 46.0));
        assert_eq!(ops.last(), Some(&ContentStreamOp::RestoreState));
    }

    #[test]
    fn test_barcode_size() {
        let mut s = scribe();
        let pattern = BarPattern::new(vec![true; 10]).unwrap();
        assert_eq!(s.barcode_size(&pattern, None), Size::new(8.0, 36.0));
        s.set_scale_mode(ScaleMode::Inches);
        assert_eq!(s.barcode_size(&pattern, Some(1.0)).height, 1.0);
        s.set_scale_mode(ScaleMode::Points);
        assert_eq!(s.barcode_size(&pattern, None), Size::new(8.0, 36.0));
    }

    #[test]
    fn test_codes_need_page() {
        let mut s = Scribe::new();
        assert!(matches!(
            s.qr_code(&ringed(), None, false, true),
            Err(Error::InvalidState(_))
        ));
    }
}

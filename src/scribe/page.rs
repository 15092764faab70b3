//! Page lifecycle and margin box.

use serde::{Deserialize, Serialize};

use super::{PageGeometry, Scribe};
use crate::error::{Error, Result};
use crate::geometry::{Margins, Point, Size};

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageKind {
    /// 8.5 × 11 in
    Letter,
    /// 8.5 × 14 in
    Legal,
    /// 11 × 17 in
    Ledger,
}

impl PageKind {
    /// Portrait size in points.
    pub fn size(self) -> Size {
        match self {
            PageKind::Letter => Size::new(612.0, 792.0),
            PageKind::Legal => Size::new(612.0, 1008.0),
            PageKind::Ledger => Size::new(792.0, 1224.0),
        }
    }
}

impl Scribe {
    /// Start a page of a standard size. Margins are in the current mode.
    pub fn new_page(
        &mut self,
        kind: PageKind,
        landscape: bool,
        margins: Margins,
    ) -> Result<&mut Self> {
        let size = kind.size();
        self.open_page(size.width, size.height, landscape, margins)
    }

    /// Start a page of an arbitrary size given in the current mode.
    pub fn new_page_with_size(
        &mut self,
        width: f32,
        height: f32,
        landscape: bool,
        margins: Margins,
    ) -> Result<&mut Self> {
        let (width, height) = (self.to_native(width), self.to_native(height));
        self.open_page(width, height, landscape, margins)
    }

    fn open_page(
        &mut self,
        width: f32,
        height: f32,
        landscape: bool,
        margins: Margins,
    ) -> Result<&mut Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::config(format!(
                "page size must be positive, got {} x {}",
                width, height
            )));
        }
        if !margins.is_finite() {
            return Err(Error::config("margins must be finite"));
        }
        let (width, height) = if landscape {
            (height, width)
        } else {
            (width, height)
        };
        let margins = margins.to_native(self.scale_mode);

        self.finish_line();
        let (fore, fill) = (self.fore_color, self.fill_color);
        self.doc
            .add_page(width, height)
            .transform(1.0, 0.0, 0.0, -1.0, margins.left, height - margins.top)
            .stroke_color(fore)
            .fill_color(fill);

        self.page = Some(PageGeometry { width, height });
        self.margins = margins;
        self.line_tracker.reset();
        self.position = Point::default();
        Ok(self)
    }

    /// True once a page has been started.
    pub fn has_page(&self) -> bool {
        self.page.is_some()
    }

    /// Full page size in the current mode.
    pub fn page_size(&self) -> Option<Size> {
        self.page
            .map(|page| Size::new(page.width, page.height).from_native(self.scale_mode))
    }

    /// Size of the margin box in the current mode.
    pub fn size(&self) -> Option<Size> {
        self.page.map(|page| {
            Size::new(
                page.width - self.margins.left - self.margins.right,
                page.height - self.margins.top - self.margins.bottom,
            )
            .from_native(self.scale_mode)
        })
    }

    /// Page margins in the current mode.
    pub fn margins(&self) -> Margins {
        self.margins.from_native(self.scale_mode)
    }

    /// Offset of the margin box origin from the page corner, in the current mode.
    pub fn margin_offset(&self) -> Point {
        Point::new(self.margins.left, self.margins.top).from_native(self.scale_mode)
    }

    /// Change the margins of the open page.
    ///
    /// Moving the left or top edge moves the content origin; the cursor keeps its
    /// margin-relative coordinates.
    pub fn set_margins(&mut self, margins: Margins) -> Result<&mut Self> {
        self.require_page("set_margins")?;
        if !margins.is_finite() {
            return Err(Error::config("margins must be finite"));
        }
        self.finish_line();
        let margins = margins.to_native(self.scale_mode);
        self.move_margin_origin(margins);
        Ok(self)
    }

    /// Grow (or with negative values shrink) each margin.
    pub fn offset_margins(
        &mut self,
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
    ) -> Result<&mut Self> {
        let margins = self.margins().offset(left, top, right, bottom);
        self.set_margins(margins)
    }

    /// Adopt `margins` (points), translating the origin when left or top moved.
    pub(super) fn move_margin_origin(&mut self, margins: Margins) {
        let dx = margins.left - self.margins.left;
        let dy = margins.top - self.margins.top;
        if dx != 0.0 || dy != 0.0 {
            if let Some(content) = self.doc.current_content_mut() {
                content.transform(1.0, 0.0, 0.0, 1.0, dx, dy);
            }
        }
        self.margins = margins;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::ScaleMode;
    use crate::writer::ContentStreamOp;

    fn ops(scribe: &Scribe) -> Vec<ContentStreamOp> {
        scribe
            .doc
            .current_content()
            .map(|c| c.operations().to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn test_new_page_flips_and_offsets() {
        let mut scribe = Scribe::new();
        scribe.set_scale_mode(ScaleMode::Points);
        scribe
            .new_page(PageKind::Letter, false, Margins::new(36.0, 72.0))
            .unwrap();
        assert_eq!(
            ops(&scribe)[0],
            ContentStreamOp::Transform(1.0, 0.0, 0.0, -1.0, 36.0, 720.0)
        );
        assert_eq!(scribe.size(), Some(Size::new(540.0, 648.0)));
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        let mut scribe = Scribe::new();
        scribe.set_scale_mode(ScaleMode::Inches);
        scribe
            .new_page(PageKind::Legal, true, Margins::default())
            .unwrap();
        assert_eq!(scribe.page_size(), Some(Size::new(14.0, 8.5)));
    }

    #[test]
    fn test_new_page_resets_cursor() {
        let mut scribe = Scribe::new();
        scribe
            .new_page(PageKind::Letter, false, Margins::default())
            .unwrap();
        scribe.set_position(Point::new(100.0, 100.0));
        scribe
            .new_page(PageKind::Letter, false, Margins::default())
            .unwrap();
        assert_eq!(scribe.position(), Point::default());
        assert_eq!(scribe.page_count(), 2);
    }

    #[test]
    fn test_invalid_page_size() {
        let mut scribe = Scribe::new();
        let result = scribe.new_page_with_size(0.0, 100.0, false, Margins::default());
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
        assert!(!scribe.has_page());
    }

    #[test]
    fn test_set_margins_translates_origin() {
        let mut scribe = Scribe::new();
        scribe.set_scale_mode(ScaleMode::Points);
        scribe
            .new_page(PageKind::Letter, false, Margins::new(10.0, 10.0))
            .unwrap();
        scribe.set_margins(Margins::new(10.0, 30.0)).unwrap();
        assert_eq!(
            ops(&scribe).last(),
            Some(&ContentStreamOp::Transform(1.0, 0.0, 0.0, 1.0, 0.0, 20.0))
        );
        assert_eq!(scribe.margin_offset(), Point::new(10.0, 30.0));
    }

    #[test]
    fn test_right_margin_only_changes_size() {
        let mut scribe = Scribe::new();
        scribe.set_scale_mode(ScaleMode::Points);
        scribe
            .new_page(PageKind::Letter, false, Margins::default())
            .unwrap();
        let before = ops(&scribe).len();
        scribe.offset_margins(0.0, 0.0, 12.0, 0.0).unwrap();
        assert_eq!(ops(&scribe).len(), before);
        assert_eq!(scribe.size(), Some(Size::new(600.0, 792.0)));
    }

    #[test]
    fn test_set_margins_requires_page() {
        let mut scribe = Scribe::new();
        assert!(matches!(
            scribe.set_margins(Margins::default()),
            Err(Error::InvalidState(_))
        ));
    }
}

//! Raster pictures anchored at the cursor.

use std::path::Path;

use super::Scribe;
use crate::error::Result;
use crate::geometry::Size;
use crate::writer::{ContentStreamOp, ImageData};

impl Scribe {
    /// Paint `image` aligned to the cursor by the picture alignment.
    ///
    /// Width and height are in the current mode. With neither, the picture keeps its
    /// natural size at the resolution stored in the file (96 DPI when absent); with one,
    /// the other follows the aspect ratio. The cursor does not move.
    pub fn paint_picture(
        &mut self,
        image: ImageData,
        width: Option<f32>,
        height: Option<f32>,
    ) -> Result<&mut Self> {
        self.require_page("paint_picture")?;
        self.finish_line();
        let width = width.map(|w| self.to_native(w));
        let height = height.map(|h| self.to_native(h));
        let (w, h) = image.placed_size(width, height);
        let (dx, dy) = self.picture_alignment.resolve_offset(Size::new(w, h));
        let (x, y) = (self.position.x + dx, self.position.y + dy);

        let name = self.doc.add_image(image)?;
        self.content("paint_picture")?
            .save_state()
            .transform(w, 0.0, 0.0, -h, x, y + h)
            .op(ContentStreamOp::PaintXObject(name))
            .restore_state();
        Ok(self)
    }

    /// Decode JPEG or PNG bytes and paint them.
    pub fn paint_picture_bytes(
        &mut self,
        data: &[u8],
        width: Option<f32>,
        height: Option<f32>,
    ) -> Result<&mut Self> {
        let image = ImageData::from_bytes(data)?;
        self.paint_picture(image, width, height)
    }

    /// Load a JPEG or PNG file and paint it.
    pub fn paint_picture_file(
        &mut self,
        path: impl AsRef<Path>,
        width: Option<f32>,
        height: Option<f32>,
    ) -> Result<&mut Self> {
        let image = ImageData::from_file(path)?;
        self.paint_picture(image, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::geometry::{Margins, Point};
    use crate::layout::PictureAlignment;
    use crate::scribe::PageKind;
    use crate::units::ScaleMode;
    use crate::writer::ColorSpace;

    fn scribe() -> Scribe {
        let mut scribe = Scribe::new();
        scribe.set_scale_mode(ScaleMode::Points);
        scribe
            .new_page(PageKind::Letter, false, Margins::default())
            .unwrap();
        scribe
    }

    fn gray(width: u32, height: u32) -> ImageData {
        ImageData::new(width, height, ColorSpace::DeviceGray, vec![0; (width * height) as usize])
    }

    fn image_matrix(scribe: &Scribe) -> Option<ContentStreamOp> {
        scribe
            .doc
            .current_content()
            .unwrap()
            .operations()
            .iter()
            .rev()
            .find(|op| matches!(op, ContentStreamOp::Transform(..)))
            .cloned()
    }

    #[test]
    fn test_natural_size_at_96_dpi() {
        let mut s = scribe();
        s.move_to(10.0, 20.0);
        s.paint_picture(gray(96, 48), None, None).unwrap();
        assert_eq!(
            image_matrix(&s),
            Some(ContentStreamOp::Transform(72.0, 0.0, 0.0, -36.0, 10.0, 56.0))
        );
        assert_eq!(s.position(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_width_only_keeps_aspect() {
        let mut s = scribe();
        s.paint_picture(gray(100, 50), Some(40.0), None).unwrap();
        assert_eq!(
            image_matrix(&s),
            Some(ContentStreamOp::Transform(40.0, 0.0, 0.0, -20.0, 0.0, 20.0))
        );
    }

    #[test]
    fn test_right_bottom_alignment() {
        let mut s = scribe();
        s.move_to(100.0, 100.0);
        s.set_picture_alignment(PictureAlignment::RightBottom);
        s.paint_picture(gray(10, 10), Some(20.0), Some(10.0)).unwrap();
        assert_eq!(
            image_matrix(&s),
            Some(ContentStreamOp::Transform(20.0, 0.0, 0.0, -10.0, 80.0, 100.0))
        );
    }

    #[test]
    fn test_undecodable_bytes() {
        let mut s = scribe();
        let result = s.paint_picture_bytes(b"not an image", None, None);
        assert!(matches!(result, Err(Error::Image(_))));
    }
}

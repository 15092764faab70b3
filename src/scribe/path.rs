//! Lines, curves and shapes drawn from the cursor.
//!
//! Segments accumulate into one open path until something finishes it: an explicit
//! [`Scribe::finish_line`]/[`Scribe::finish_polygon`], a cursor jump, a shape, or a
//! change of colour or line style.

use super::Scribe;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::writer::{ContentStreamBuilder, ContentStreamOp};

/// Bulge giving a circular quarter arc.
pub const DEFAULT_CORNER_BULGE: f32 = 0.552_284_75;

impl Scribe {
    /// Content stream with an open path, starting one at the cursor if needed.
    fn path_content(&mut self, operation: &str) -> Result<&mut ContentStreamBuilder> {
        let content = self
            .doc
            .current_content_mut()
            .ok_or_else(|| Error::no_page(operation))?;
        if !self.path_open {
            self.line_tracker
                .apply(&self.line_style, self.scale_mode, content);
            content.move_to(self.position.x, self.position.y);
            self.path_open = true;
        }
        Ok(content)
    }

    /// Jump to an absolute position, stroking any open line.
    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.set_position(Point::new(x, y))
    }

    /// Jump by an offset, stroking any open line.
    pub fn offset_to(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.finish_line();
        let (dx, dy) = (self.to_native(dx), self.to_native(dy));
        self.position = self.position.offset(dx, dy);
        self
    }

    /// Straight segment to the cursor plus an offset.
    pub fn line_to(&mut self, dx: f32, dy: f32) -> Result<&mut Self> {
        let target = self.position.offset(self.to_native(dx), self.to_native(dy));
        self.path_content("line_to")?.line_to(target.x, target.y);
        self.position = target;
        Ok(self)
    }

    /// Quarter-arc style corner to the cursor plus an offset.
    ///
    /// With `from_side` the curve leaves vertically and arrives horizontally; otherwise
    /// the other way round.
    pub fn corner_to(&mut self, dx: f32, dy: f32, from_side: bool) -> Result<&mut Self> {
        self.corner_to_with_bulge(dx, dy, from_side, DEFAULT_CORNER_BULGE, DEFAULT_CORNER_BULGE)
    }

    /// Corner with explicit horizontal and vertical bulge factors.
    pub fn corner_to_with_bulge(
        &mut self,
        dx: f32,
        dy: f32,
        from_side: bool,
        bulge_h: f32,
        bulge_v: f32,
    ) -> Result<&mut Self> {
        let p0 = self.position;
        let p2 = p0.offset(self.to_native(dx), self.to_native(dy));
        let (c1, c2) = if from_side {
            (
                Point::new(p0.x, p0.y + (p2.y - p0.y) * bulge_v),
                Point::new(p2.x - (p2.x - p0.x) * bulge_h, p2.y),
            )
        } else {
            (
                Point::new(p0.x + (p2.x - p0.x) * bulge_h, p0.y),
                Point::new(p2.x, p2.y - (p2.y - p0.y) * bulge_v),
            )
        };
        self.path_content("corner_to")?
            .curve_to(c1.x, c1.y, c2.x, c2.y, p2.x, p2.y);
        self.position = p2;
        Ok(self)
    }

    /// Cubic Bézier with absolute control and end points.
    pub fn bezier_to(
        &mut self,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
        x4: f32,
        y4: f32,
    ) -> Result<&mut Self> {
        let mode = self.scale_mode;
        let c1 = Point::new(x2, y2).to_native(mode);
        let c2 = Point::new(x3, y3).to_native(mode);
        let end = Point::new(x4, y4).to_native(mode);
        self.path_content("bezier_to")?
            .curve_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
        self.position = end;
        Ok(self)
    }

    /// Cubic Bézier whose first control point is the cursor.
    pub fn bezier_to_v(&mut self, x2: f32, y2: f32, x4: f32, y4: f32) -> Result<&mut Self> {
        let mode = self.scale_mode;
        let c2 = Point::new(x2, y2).to_native(mode);
        let end = Point::new(x4, y4).to_native(mode);
        self.path_content("bezier_to")?
            .curve_to_v(c2.x, c2.y, end.x, end.y);
        self.position = end;
        Ok(self)
    }

    /// Stroke the open path, if any.
    pub fn finish_line(&mut self) -> &mut Self {
        if self.path_open {
            self.path_open = false;
            if let Some(content) = self.doc.current_content_mut() {
                content.stroke();
            }
        }
        self
    }

    /// Close the open path and paint it.
    ///
    /// `even_odd` selects the even-odd fill rule and implies a fill.
    pub fn finish_polygon(&mut self, border: bool, fill: bool, even_odd: bool) -> &mut Self {
        if !self.path_open {
            return self;
        }
        self.path_open = false;
        let op = match (border, fill, even_odd) {
            (true, _, true) => ContentStreamOp::CloseFillStrokeEvenOdd,
            (true, true, false) => ContentStreamOp::CloseFillStroke,
            (true, false, false) => ContentStreamOp::CloseStroke,
            (false, _, true) => ContentStreamOp::FillEvenOdd,
            (false, true, false) => ContentStreamOp::Fill,
            (false, false, false) => ContentStreamOp::EndPath,
        };
        if let Some(content) = self.doc.current_content_mut() {
            content.op(op);
        }
        self
    }

    /// Rectangle from the cursor; the cursor moves to the opposite corner.
    ///
    /// A non-zero `corner_radius` rounds the corners.
    pub fn rectangle(
        &mut self,
        width: f32,
        height: f32,
        corner_radius: f32,
        fill: bool,
        border: bool,
    ) -> Result<&mut Self> {
        self.require_page("rectangle")?;
        self.finish_line();
        let (w, h) = (self.to_native(width), self.to_native(height));
        let radius = self.to_native(corner_radius);
        let origin = self.position;

        if fill || border {
            let content = self.shape_content(border, "rectangle")?;
            if radius == 0.0 {
                content.rect(origin.x, origin.y, w, h);
            } else {
                content.rounded_rect(origin.x, origin.y, w, h, radius);
            }
            paint_shape(content, fill, border);
        }

        self.position = origin.offset(w, h);
        Ok(self)
    }

    /// Bordered rectangle with a second border `inset` inside it.
    pub fn rectangle_dual_offset(
        &mut self,
        width: f32,
        height: f32,
        inset: f32,
        corner_radius: f32,
    ) -> Result<&mut Self> {
        let origin = self.position();
        self.rectangle(width, height, corner_radius, false, true)?;
        self.move_to(origin.x + inset, origin.y + inset);
        self.rectangle(width - inset * 2.0, height - inset * 2.0, corner_radius, false, true)?;
        self.move_to(origin.x + width, origin.y + height);
        Ok(self)
    }

    /// Circle centred on the cursor. The cursor does not move.
    pub fn circle(&mut self, radius: f32, border: bool, fill: bool) -> Result<&mut Self> {
        self.require_page("circle")?;
        self.finish_line();
        if !(border || fill) {
            return Ok(self);
        }
        let r = self.to_native(radius);
        let center = self.position;
        let content = self.shape_content(border, "circle")?;
        content.circle(center.x, center.y, r);
        paint_shape(content, fill, border);
        Ok(self)
    }

    fn shape_content(
        &mut self,
        border: bool,
        operation: &str,
    ) -> Result<&mut ContentStreamBuilder> {
        if border {
            self.stroke_content(operation)
        } else {
            self.content(operation)
        }
    }
}

fn paint_shape(content: &mut ContentStreamBuilder, fill: bool, border: bool) {
    match (border, fill) {
        (true, true) => content.fill_stroke(),
        (true, false) => content.stroke(),
        _ => content.fill(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Margins;
    use crate::scribe::PageKind;
    use crate::units::ScaleMode;

    fn scribe() -> Scribe {
        let mut scribe = Scribe::new();
        scribe.set_scale_mode(ScaleMode::Points);
        scribe
            .new_page(PageKind::Letter, false, Margins::default())
            .unwrap();
        scribe
    }

    /// Operations after the page prologue and the line style.
    fn drawing_ops(scribe: &Scribe) -> Vec<ContentStreamOp> {
        scribe
            .doc
            .current_content()
            .unwrap()
            .operations()
            .iter()
            .skip(3)
            .filter(|op| {
                !matches!(
                    op,
                    ContentStreamOp::SetLineCap(_)
                        | ContentStreamOp::SetLineJoin(_)
                        | ContentStreamOp::SetLineWidth(_)
                        | ContentStreamOp::SetDashPattern(..)
                )
            })
            .cloned()
            .collect()
    }

    #[test]
    fn test_line_path_and_cursor() {
        let mut s = scribe();
        s.move_to(10.0, 10.0);
        s.line_to(5.0, 0.0).unwrap().line_to(0.0, 5.0).unwrap();
        s.finish_line();
        assert_eq!(
            drawing_ops(&s),
            vec![
                ContentStreamOp::MoveTo(10.0, 10.0),
                ContentStreamOp::LineTo(15.0, 10.0),
                ContentStreamOp::LineTo(15.0, 15.0),
                ContentStreamOp::Stroke,
            ]
        );
        assert_eq!(s.position(), Point::new(15.0, 15.0));
    }

    #[test]
    fn test_move_strokes_open_path() {
        let mut s = scribe();
        s.line_to(1.0, 1.0).unwrap();
        s.move_to(50.0, 50.0);
        assert_eq!(drawing_ops(&s).last(), Some(&ContentStreamOp::Stroke));
        assert!(!s.path_open);
    }

    #[test]
    fn test_finish_line_when_idle_is_noop() {
        let mut s = scribe();
        s.finish_line().finish_line();
        assert!(drawing_ops(&s).is_empty());
    }

    #[test]
    fn test_finish_polygon_truth_table() {
        let cases = [
            ((true, true, true), ContentStreamOp::CloseFillStrokeEvenOdd),
            ((true, false, true), ContentStreamOp::CloseFillStrokeEvenOdd),
            ((true, true, false), ContentStreamOp::CloseFillStroke),
            ((true, false, false), ContentStreamOp::CloseStroke),
            ((false, false, true), ContentStreamOp::FillEvenOdd),
            ((false, true, false), ContentStreamOp::Fill),
            ((false, false, false), ContentStreamOp::EndPath),
        ];
        for ((border, fill, even_odd), expected) in cases {
            let mut s = scribe();
            s.line_to(10.0, 0.0).unwrap().line_to(0.0, 10.0).unwrap();
            s.finish_polygon(border, fill, even_odd);
            assert_eq!(drawing_ops(&s).last(), Some(&expected));
        }
    }

    #[test]
    fn test_corner_control_points() {
        let mut s = scribe();
        s.corner_to_with_bulge(10.0, 20.0, true, 0.5, 0.5).unwrap();
        assert_eq!(
            drawing_ops(&s)[1],
            ContentStreamOp::CurveTo(0.0, 10.0, 5.0, 20.0, 10.0, 20.0)
        );

        let mut s = scribe();
        s.corner_to_with_bulge(10.0, 20.0, false, 0.5, 0.5).unwrap();
        assert_eq!(
            drawing_ops(&s)[1],
            ContentStreamOp::CurveTo(5.0, 0.0, 10.0, 10.0, 10.0, 20.0)
        );
        assert_eq!(s.position(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_bezier_absolute() {
        let mut s = scribe();
        s.bezier_to(1.0, 2.0, 3.0, 4.0, 5.0, 6.0).unwrap();
        s.bezier_to_v(7.0, 8.0, 9.0, 10.0).unwrap();
        assert_eq!(
            &drawing_ops(&s)[1..],
            &[
                ContentStreamOp::CurveTo(1.0, 2.0, 3.0, 4.0, 5.0, 6.0),
                ContentStreamOp::CurveToV(7.0, 8.0, 9.0, 10.0),
            ]
        );
        assert_eq!(s.position(), Point::new(9.0, 10.0));
    }

    #[test]
    fn test_rectangle_paint_and_cursor() {
        let mut s = scribe();
        s.move_to(5.0, 5.0);
        s.rectangle(20.0, 10.0, 0.0, true, true).unwrap();
        assert_eq!(
            drawing_ops(&s),
            vec![
                ContentStreamOp::Rectangle(5.0, 5.0, 20.0, 10.0),
                ContentStreamOp::FillStroke,
            ]
        );
        assert_eq!(s.position(), Point::new(25.0, 15.0));
    }

    #[test]
    fn test_invisible_rectangle_still_advances() {
        let mut s = scribe();
        s.rectangle(20.0, 10.0, 0.0, false, false).unwrap();
        assert!(drawing_ops(&s).is_empty());
        assert_eq!(s.position(), Point::new(20.0, 10.0));
    }

    #[test]
    fn test_rounded_rectangle_uses_curves() {
        let mut s = scribe();
        s.rectangle(20.0, 10.0, 2.0, false, true).unwrap();
        let ops = drawing_ops(&s);
        assert!(ops.iter().any(|op| matches!(op, ContentStreamOp::CurveTo(..))));
        assert_eq!(ops.last(), Some(&ContentStreamOp::Stroke));
    }

    #[test]
    fn test_dual_offset_cursor() {
        let mut s = scribe();
        s.move_to(10.0, 10.0);
        s.rectangle_dual_offset(40.0, 30.0, 2.0, 0.0).unwrap();
        let rects: Vec<_> = drawing_ops(&s)
            .into_iter()
            .filter(|op| matches!(op, ContentStreamOp::Rectangle(..)))
            .collect();
        assert_eq!(
            rects,
            vec![
                ContentStreamOp::Rectangle(10.0, 10.0, 40.0, 30.0),
                ContentStreamOp::Rectangle(12.0, 12.0, 36.0, 26.0),
            ]
        );
        assert_eq!(s.position(), Point::new(50.0, 40.0));
    }

    #[test]
    fn test_circle_keeps_cursor() {
        let mut s = scribe();
        s.move_to(30.0, 30.0);
        s.circle(10.0, false, true).unwrap();
        assert_eq!(drawing_ops(&s).last(), Some(&ContentStreamOp::Fill));
        assert_eq!(s.position(), Point::new(30.0, 30.0));
    }

    #[test]
    fn test_shapes_need_a_page() {
        let mut s = Scribe::new();
        assert!(matches!(s.line_to(1.0, 1.0), Err(Error::InvalidState(_))));
        assert!(matches!(
            s.rectangle(1.0, 1.0, 0.0, true, true),
            Err(Error::InvalidState(_))
        ));
        assert_eq!(s.position(), Point::default());
    }
}

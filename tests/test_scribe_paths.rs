//! Integration tests for cursor-driven paths and shapes.
//!
//! Documents are written uncompressed so the content stream can be inspected
//! as text.

use pdf_scribe::{
    Color, Error, LineDashStyle, Margins, PageKind, PdfWriterConfig, Point, ScaleMode, Scribe,
};

fn scribe() -> Scribe {
    let mut scribe = Scribe::with_config(PdfWriterConfig::default().with_compress(false));
    scribe.set_scale_mode(ScaleMode::Points);
    scribe
        .new_page(PageKind::Letter, false, Margins::default())
        .unwrap();
    scribe
}

fn render(scribe: Scribe) -> String {
    String::from_utf8_lossy(&scribe.to_bytes().unwrap()).into_owned()
}

mod page_setup_tests {
    use super::*;

    #[test]
    fn test_page_flips_y_axis_inside_margins() {
        let mut s = Scribe::with_config(PdfWriterConfig::default().with_compress(false));
        s.set_scale_mode(ScaleMode::Points);
        s.new_page(PageKind::Letter, false, Margins::new(36.0, 36.0))
            .unwrap();
        let pdf = render(s);
        assert!(pdf.contains("1 0 0 -1 36 756 cm"));
        assert!(pdf.contains("/MediaBox [0 0 612 792]"));
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        let mut s = scribe();
        s.new_page(PageKind::Legal, true, Margins::default()).unwrap();
        assert_eq!(s.page_size().unwrap().width, 1008.0);
        assert_eq!(s.page_count(), 2);
    }

    #[test]
    fn test_new_page_resets_cursor() {
        let mut s = scribe();
        s.move_to(100.0, 100.0);
        s.new_page(PageKind::Letter, false, Margins::default()).unwrap();
        assert_eq!(s.position(), Point::new(0.0, 0.0));
    }
}

mod line_tests {
    use super::*;

    #[test]
    fn test_line_is_stroked_when_cursor_jumps() {
        let mut s = scribe();
        s.move_to(10.0, 20.0);
        s.line_to(30.0, 0.0).unwrap().line_to(0.0, 15.0).unwrap();
        s.move_to(0.0, 0.0);
        let pdf = render(s);
        assert!(pdf.contains("10 20 m\n40 20 l\n40 35 l\nS"));
    }

    #[test]
    fn test_line_style_emitted_once_per_change() {
        let mut s = scribe();
        s.set_line_width(2.0).unwrap();
        s.line_to(10.0, 0.0).unwrap().finish_line();
        s.line_to(10.0, 0.0).unwrap().finish_line();
        s.set_line_dash(LineDashStyle::dash());
        s.line_to(10.0, 0.0).unwrap().finish_line();
        let pdf = render(s);
        assert_eq!(pdf.matches("2 w").count(), 1);
        assert_eq!(pdf.matches(" d\n").count(), 2);
    }

    #[test]
    fn test_line_needs_page() {
        let mut s = Scribe::new();
        assert!(matches!(s.line_to(1.0, 1.0), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_polygon_fill_rules() {
        let cases = [
            ((true, false, true), "b*"),
            ((true, true, false), "\nb\n"),
            ((true, false, false), "\ns\n"),
            ((false, false, true), "f*"),
            ((false, true, false), "\nf\n"),
            ((false, false, false), "\nn\n"),
        ];
        for ((border, fill, even_odd), op) in cases {
            let mut s = scribe();
            s.line_to(10.0, 0.0)
                .unwrap()
                .line_to(0.0, 10.0)
                .unwrap()
                .finish_polygon(border, fill, even_odd);
            let pdf = render(s);
            assert!(pdf.contains(op), "expected {op:?} for {border} {fill} {even_odd}");
        }
    }

    #[test]
    fn test_corner_to_ends_at_offset() {
        let mut s = scribe();
        s.move_to(10.0, 10.0);
        s.corner_to(20.0, 20.0, false).unwrap();
        assert_eq!(s.position(), Point::new(30.0, 30.0));
    }
}

mod shape_tests {
    use super::*;

    #[test]
    fn test_rectangle_moves_to_opposite_corner() {
        let mut s = scribe();
        s.move_to(5.0, 5.0);
        s.rectangle(50.0, 20.0, 0.0, true, true).unwrap();
        assert_eq!(s.position(), Point::new(55.0, 25.0));
        let pdf = render(s);
        assert!(pdf.contains("5 5 50 20 re\nB"));
    }

    #[test]
    fn test_invisible_rectangle_still_moves() {
        let mut s = scribe();
        s.rectangle(10.0, 10.0, 0.0, false, false).unwrap();
        assert_eq!(s.position(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_dual_offset_rectangle() {
        let mut s = scribe();
        s.rectangle_dual_offset(100.0, 50.0, 5.0, 0.0).unwrap();
        assert_eq!(s.position(), Point::new(100.0, 50.0));
        let pdf = render(s);
        assert!(pdf.contains("0 0 100 50 re\nS"));
        assert!(pdf.contains("5 5 90 40 re\nS"));
    }

    #[test]
    fn test_circle_keeps_cursor_and_uses_fill_colour() {
        let mut s = scribe();
        s.set_fill_color(Color::rgb(255, 0, 0));
        s.move_to(50.0, 50.0);
        s.circle(10.0, false, true).unwrap();
        assert_eq!(s.position(), Point::new(50.0, 50.0));
        let pdf = render(s);
        assert!(pdf.contains("1 0 0 rg"));
        assert!(pdf.contains("60 50 m"));
    }

    #[test]
    fn test_units_convert_at_the_boundary() {
        let mut s = scribe();
        s.set_scale_mode(ScaleMode::Inches);
        s.rectangle(1.0, 0.5, 0.0, true, false).unwrap();
        assert_eq!(s.position(), Point::new(1.0, 0.5));
        s.set_scale_mode(ScaleMode::Points);
        assert_eq!(s.position(), Point::new(72.0, 36.0));
    }
}

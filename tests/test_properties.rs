//! Property tests for the layout arithmetic.

use pdf_scribe::layout::{fit_line, justify_spacing};
use pdf_scribe::{PictureAlignment, Point, ScaleMode, Scribe, Size};
use proptest::prelude::*;

fn scale_mode() -> impl Strategy<Value = ScaleMode> {
    prop_oneof![
        Just(ScaleMode::Points),
        Just(ScaleMode::Hundredths),
        Just(ScaleMode::Inches),
    ]
}

fn picture_alignment() -> impl Strategy<Value = PictureAlignment> {
    (0..PictureAlignment::ALL.len()).prop_map(|i| PictureAlignment::ALL[i])
}

/// Lowercase words separated by single spaces.
fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,8}", 1..12).prop_map(|words| words.join(" "))
}

fn chars(s: &str) -> f32 {
    s.chars().count() as f32
}

proptest! {
    #[test]
    fn prop_units_round_trip(mode in scale_mode(), value in -10_000.0f32..10_000.0) {
        let back = mode.from_native(mode.to_native(value));
        prop_assert!((back - value).abs() <= value.abs() * 1e-5 + 1e-4);
    }

    #[test]
    fn prop_cursor_round_trip_across_modes(
        mode in scale_mode(),
        x in -1000.0f32..1000.0,
        y in -1000.0f32..1000.0,
    ) {
        let mut scribe = Scribe::new();
        scribe.set_scale_mode(ScaleMode::Points);
        scribe.move_to(x, y);
        scribe.set_scale_mode(mode);
        let p = scribe.position();
        scribe.move_to(0.0, 0.0);
        // positions read in a mode are written back in that same mode
        scribe.set_position(p);
        scribe.set_scale_mode(ScaleMode::Points);
        let q = scribe.position();
        prop_assert!((q.x - x).abs() < 1e-2 && (q.y - y).abs() < 1e-2);
    }

    #[test]
    fn prop_wrapped_line_fits(text in sentence(), max in 1.0f32..60.0) {
        let fit = fit_line(&text, max, chars);
        let single_word = !fit.line.contains(' ');
        prop_assert!(fit.width <= max || single_word);
        prop_assert_eq!(fit.width, chars(fit.line));
        if let Some(rest) = fit.remainder {
            prop_assert_eq!(format!("{} {}", fit.line, rest), text.clone());
        } else {
            prop_assert_eq!(fit.line, text.as_str());
        }
    }

    #[test]
    fn prop_justified_line_fills_width(text in sentence(), max in 1.0f32..60.0) {
        let fit = fit_line(&text, max, chars);
        if let Some(spacing) = justify_spacing(&fit, max) {
            let stretched = fit.width + spacing * fit.spaces() as f32;
            prop_assert!((stretched - max).abs() < 1e-3);
            prop_assert!(spacing >= 0.0);
        }
    }

    #[test]
    fn prop_picture_anchor_on_box(
        alignment in picture_alignment(),
        w in 0.0f32..500.0,
        h in 0.0f32..500.0,
    ) {
        let (dx, dy) = alignment.resolve_offset(Size::new(w, h));
        prop_assert!(dx <= 0.0 && dx >= -w);
        prop_assert!(dy <= 0.0 && dy >= -h);
        let anchor = Point::new(-dx, -dy);
        prop_assert!([0.0, w / 2.0, w].contains(&anchor.x));
        prop_assert!([0.0, h / 2.0, h].contains(&anchor.y));
    }
}

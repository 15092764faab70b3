//! Alignment of boxes and text runs against the cursor.
//!
//! The cursor is the anchor. An offset moves the box so the requested edge, corner or
//! center lands on it. In margin-box space y grows downward, so a negative vertical
//! offset lifts the box.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Size;

/// Horizontal placement relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    /// Box starts at the anchor.
    Left,
    /// Box is centered on the anchor.
    Center,
    /// Box ends at the anchor.
    Right,
}

impl HorizontalAlign {
    /// Offset to apply to the anchor x for a box of `width`.
    pub fn offset(self, width: f32) -> f32 {
        match self {
            HorizontalAlign::Left => 0.0,
            HorizontalAlign::Center => -width / 2.0,
            HorizontalAlign::Right => -width,
        }
    }
}

/// Vertical placement of a picture-like box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    /// Box hangs from the anchor.
    Top,
    /// Box is centered on the anchor.
    Center,
    /// Box sits on the anchor.
    Bottom,
}

impl VerticalAlign {
    /// Offset to apply to the anchor y for a box of `height`.
    pub fn offset(self, height: f32) -> f32 {
        match self {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Center => -height / 2.0,
            VerticalAlign::Bottom => -height,
        }
    }
}

/// Vertical placement of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextVertical {
    /// Top of the ascenders at the anchor.
    Top,
    /// Middle of the capitals at the anchor.
    Center,
    /// Baseline at the anchor.
    Baseline,
    /// Bottom of the descenders plus leading at the anchor.
    Bottom,
}

/// Vertical font metrics at a concrete size, in points.
///
/// `descent` is negative (below the baseline), following font-file convention.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub cap_height: f32,
    pub leading: f32,
}

impl TextMetrics {
    /// Distance between consecutive baselines before any spacing multiplier.
    pub fn line_height(&self) -> f32 {
        self.ascent - self.descent + self.leading
    }
}

impl TextVertical {
    /// Offset from the anchor to the baseline.
    pub fn offset(self, metrics: &TextMetrics) -> f32 {
        match self {
            TextVertical::Top => metrics.ascent,
            TextVertical::Center => metrics.cap_height / 2.0,
            TextVertical::Baseline => 0.0,
            TextVertical::Bottom => metrics.descent - metrics.leading,
        }
    }
}

macro_rules! alignment_names {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $ty {
            /// Every value, row by row.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Name of the value, accepted back by `FromStr`.
            pub fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => stringify!($variant),)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|a| a.name().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        Error::config(format!(
                            "unknown {} '{}'",
                            stringify!($ty),
                            wanted
                        ))
                    })
            }
        }
    };
}

/// Where a picture, code or other box sits relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PictureAlignment {
    #[default]
    LeftTop,
    CenterTop,
    RightTop,
    LeftCenter,
    CenterCenter,
    RightCenter,
    LeftBottom,
    CenterBottom,
    RightBottom,
}

alignment_names!(PictureAlignment {
    LeftTop,
    CenterTop,
    RightTop,
    LeftCenter,
    CenterCenter,
    RightCenter,
    LeftBottom,
    CenterBottom,
    RightBottom,
});

impl PictureAlignment {
    /// Horizontal component.
    pub fn horizontal(self) -> HorizontalAlign {
        use PictureAlignment::*;
        match self {
            LeftTop | LeftCenter | LeftBottom => HorizontalAlign::Left,
            CenterTop | CenterCenter | CenterBottom => HorizontalAlign::Center,
            RightTop | RightCenter | RightBottom => HorizontalAlign::Right,
        }
    }

    /// Vertical component.
    pub fn vertical(self) -> VerticalAlign {
        use PictureAlignment::*;
        match self {
            LeftTop | CenterTop | RightTop => VerticalAlign::Top,
            LeftCenter | CenterCenter | RightCenter => VerticalAlign::Center,
            LeftBottom | CenterBottom | RightBottom => VerticalAlign::Bottom,
        }
    }

    /// Offset from the anchor to the box's top-left corner.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_scribe::geometry::Size;
    /// use pdf_scribe::layout::PictureAlignment;
    ///
    /// let size = Size::new(2.0, 2.0);
    /// assert_eq!(PictureAlignment::LeftTop.resolve_offset(size), (0.0, 0.0));
    /// assert_eq!(PictureAlignment::RightBottom.resolve_offset(size), (-2.0, -2.0));
    /// ```
    pub fn resolve_offset(self, size: Size) -> (f32, f32) {
        (
            self.horizontal().offset(size.width),
            self.vertical().offset(size.height),
        )
    }
}

/// Where a text run sits relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextAlignment {
    LeftTop,
    CenterTop,
    RightTop,
    LeftCenter,
    CenterCenter,
    RightCenter,
    #[default]
    LeftBaseline,
    CenterBaseline,
    RightBaseline,
    LeftBottom,
    CenterBottom,
    RightBottom,
}

alignment_names!(TextAlignment {
    LeftTop,
    CenterTop,
    RightTop,
    LeftCenter,
    CenterCenter,
    RightCenter,
    LeftBaseline,
    CenterBaseline,
    RightBaseline,
    LeftBottom,
    CenterBottom,
    RightBottom,
});

impl TextAlignment {
    /// Horizontal component.
    pub fn horizontal(self) -> HorizontalAlign {
        use TextAlignment::*;
        match self {
            LeftTop | LeftCenter | LeftBaseline | LeftBottom => HorizontalAlign::Left,
            CenterTop | CenterCenter | CenterBaseline | CenterBottom => HorizontalAlign::Center,
            RightTop | RightCenter | RightBaseline | RightBottom => HorizontalAlign::Right,
        }
    }

    /// Vertical component.
    pub fn vertical(self) -> TextVertical {
        use TextAlignment::*;
        match self {
            LeftTop | CenterTop | RightTop => TextVertical::Top,
            LeftCenter | CenterCenter | RightCenter => TextVertical::Center,
            LeftBaseline | CenterBaseline | RightBaseline => TextVertical::Baseline,
            LeftBottom | CenterBottom | RightBottom => TextVertical::Bottom,
        }
    }

    /// True for the alignments usable with bounded wrapping.
    pub fn is_left(self) -> bool {
        self.horizontal() == HorizontalAlign::Left
    }

    /// Offset from the anchor to the glyph origin of a run `width` wide.
    pub fn resolve_offset(self, width: f32, metrics: &TextMetrics) -> (f32, f32) {
        (self.horizontal().offset(width), self.vertical().offset(metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picture_alignment_grid() {
        let size = Size::new(2.0, 2.0);
        let expected = [
            (5.0, 5.0),
            (4.0, 5.0),
            (3.0, 5.0),
            (5.0, 4.0),
            (4.0, 4.0),
            (3.0, 4.0),
            (5.0, 3.0),
            (4.0, 3.0),
            (3.0, 3.0),
        ];
        for (align, (ex, ey)) in PictureAlignment::ALL.iter().zip(expected) {
            let (dx, dy) = align.resolve_offset(size);
            assert_eq!((5.0 + dx, 5.0 + dy), (ex, ey), "{}", align);
        }
    }

    #[test]
    fn test_text_vertical_offsets() {
        let m = TextMetrics {
            ascent: 8.0,
            descent: -2.0,
            cap_height: 7.0,
            leading: 1.0,
        };
        assert_eq!(TextAlignment::LeftTop.resolve_offset(10.0, &m), (0.0, 8.0));
        assert_eq!(TextAlignment::CenterCenter.resolve_offset(10.0, &m), (-5.0, 3.5));
        assert_eq!(TextAlignment::RightBaseline.resolve_offset(10.0, &m), (-10.0, 0.0));
        assert_eq!(TextAlignment::LeftBottom.resolve_offset(10.0, &m), (0.0, -3.0));
        assert_eq!(m.line_height(), 11.0);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(PictureAlignment::default(), PictureAlignment::LeftTop);
        assert_eq!(TextAlignment::default(), TextAlignment::LeftBaseline);
    }

    #[test]
    fn test_only_left_family_is_left() {
        let lefts = TextAlignment::ALL.iter().filter(|a| a.is_left()).count();
        assert_eq!(lefts, 4);
        assert!(!TextAlignment::CenterBaseline.is_left());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "centerbottom".parse::<PictureAlignment>().unwrap(),
            PictureAlignment::CenterBottom
        );
        for a in TextAlignment::ALL {
            assert_eq!(a.name().parse::<TextAlignment>().unwrap(), *a);
        }
        assert!(matches!(
            "middle".parse::<TextAlignment>(),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}

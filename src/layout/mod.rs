//! Pure layout arithmetic: alignment offsets and greedy word wrapping.
//!
//! Nothing here touches a content stream, which keeps the geometry testable on its own.

pub mod alignment;
pub mod word_wrap;

pub use alignment::{
    HorizontalAlign, PictureAlignment, TextAlignment, TextMetrics, TextVertical, VerticalAlign,
};
pub use word_wrap::{fit_line, justify_spacing, split_at_line_break, LineFit};

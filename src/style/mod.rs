//! Drawing attributes carried by the engine: colours, line style, fonts.
//!
//! All types here are plain values. Changing the engine's current font or line style
//! means building a new value and assigning it.

pub mod color;
pub mod font;
pub mod line_style;

pub use color::Color;
pub use font::{Font, StandardFamily};
pub use line_style::{LineCapStyle, LineDashStyle, LineJoinStyle, LineStyle};

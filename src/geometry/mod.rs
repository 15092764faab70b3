//! Geometric primitives for page layout.
//!
//! Values here carry no unit of their own; the engine stores them in points and converts
//! at its public surface.

use serde::{Deserialize, Serialize};

use crate::units::ScaleMode;

/// A 2D point in margin-box space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_scribe::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Translate by an offset.
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub(crate) fn to_native(self, mode: ScaleMode) -> Self {
        Self::new(mode.to_native(self.x), mode.to_native(self.y))
    }

    pub(crate) fn from_native(self, mode: ScaleMode) -> Self {
        Self::new(mode.from_native(self.x), mode.from_native(self.y))
    }
}

/// Width and height of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Size {
    /// Create a new size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub(crate) fn from_native(self, mode: ScaleMode) -> Self {
        Self::new(mode.from_native(self.width), mode.from_native(self.height))
    }
}

/// Page margins.
///
/// The content origin is always the top-left corner of the margin box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    /// Left margin
    pub left: f32,
    /// Top margin
    pub top: f32,
    /// Right margin
    pub right: f32,
    /// Bottom margin
    pub bottom: f32,
}

impl Margins {
    /// Margins with right mirroring left and bottom mirroring top.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_scribe::geometry::Margins;
    ///
    /// let m = Margins::new(50.0, 75.0);
    /// assert_eq!(m.right, 50.0);
    /// assert_eq!(m.bottom, 75.0);
    /// ```
    pub fn new(left: f32, top: f32) -> Self {
        Self::with_sides(left, top, left, top)
    }

    /// Margins with every side given.
    pub fn with_sides(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same margin on every side.
    pub fn uniform(value: f32) -> Self {
        Self::with_sides(value, value, value, value)
    }

    /// Grow each side by the given amounts (negative values shrink).
    pub fn offset(self, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::with_sides(
            self.left + left,
            self.top + top,
            self.right + right,
            self.bottom + bottom,
        )
    }

    pub(crate) fn to_native(self, mode: ScaleMode) -> Self {
        Self::with_sides(
            mode.to_native(self.left),
            mode.to_native(self.top),
            mode.to_native(self.right),
            mode.to_native(self.bottom),
        )
    }

    pub(crate) fn from_native(self, mode: ScaleMode) -> Self {
        Self::with_sides(
            mode.from_native(self.left),
            mode.from_native(self.top),
            mode.from_native(self.right),
            mode.from_native(self.bottom),
        )
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
    }
}

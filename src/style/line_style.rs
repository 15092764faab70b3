//! Stroke attributes.
//!
//! Dash lengths are multiples of the line width, so a dashed hairline and a dashed
//! two-point rule keep the same rhythm.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::units::ScaleMode;

/// Width used when a [`LineStyle`] carries none, in points.
pub const DEFAULT_LINE_WIDTH: f32 = 0.1;

/// Shape at the open ends of stroked lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LineCapStyle {
    /// Square end flush with the endpoint.
    #[default]
    None,
    /// Semicircular end.
    Round,
    /// Square end projecting half the line width.
    Square,
}

/// Shape where two stroked segments meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LineJoinStyle {
    /// Sharp corner.
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Flattened corner.
    Bevel,
}

/// Dash pattern and phase, in multiples of the line width.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineDashStyle {
    pattern: Vec<f32>,
    phase: f32,
}

impl LineDashStyle {
    /// Continuous line.
    pub fn solid() -> Self {
        Self::default()
    }

    /// Six on, six off, starting mid-dash.
    pub fn dash() -> Self {
        Self {
            pattern: vec![6.0, 6.0],
            phase: 3.0,
        }
    }

    /// Two on, three off.
    pub fn dot() -> Self {
        Self {
            pattern: vec![2.0, 3.0],
            phase: 0.0,
        }
    }

    /// A dash followed by two dots.
    pub fn dash_dot_dot() -> Self {
        Self {
            pattern: vec![6.0, 3.0, 2.0, 3.0, 2.0, 3.0],
            phase: 0.0,
        }
    }

    /// Custom pattern of alternating on/off lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_scribe::style::LineDashStyle;
    ///
    /// let dash = LineDashStyle::new(vec![4.0, 1.0], 0.0).unwrap();
    /// assert_eq!(dash.pattern(), &[4.0, 1.0]);
    /// assert!(LineDashStyle::new(vec![4.0, -1.0], 0.0).is_err());
    /// ```
    pub fn new(pattern: Vec<f32>, phase: f32) -> Result<Self> {
        if let Some(bad) = pattern.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(Error::config(format!(
                "dash lengths must be non-negative, got {}",
                bad
            )));
        }
        if !phase.is_finite() {
            return Err(Error::config("dash phase must be finite"));
        }
        Ok(Self { pattern, phase })
    }

    /// Equal on and off lengths.
    pub fn on_off(on_off: f32, phase: f32) -> Result<Self> {
        Self::new(vec![on_off, on_off], phase)
    }

    /// Distinct on and off lengths.
    pub fn on_then_off(on: f32, off: f32, phase: f32) -> Result<Self> {
        Self::new(vec![on, off], phase)
    }

    /// Pattern lengths.
    pub fn pattern(&self) -> &[f32] {
        &self.pattern
    }

    /// Phase.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// True when the line is continuous.
    pub fn is_solid(&self) -> bool {
        self.pattern.iter().all(|v| *v == 0.0)
    }

    /// Pattern and phase scaled to absolute lengths for a given line width.
    ///
    /// Collapses to solid when the scaled pattern would be all zeros, which PDF rejects.
    pub(crate) fn scaled(&self, width: f32) -> (Vec<f32>, f32) {
        if self.is_solid() || width <= 0.0 {
            return (Vec::new(), 0.0);
        }
        (
            self.pattern.iter().map(|v| v * width).collect(),
            self.phase * width,
        )
    }
}

/// Complete stroke configuration.
///
/// Compared structurally: two styles built the same way are equal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineStyle {
    width: Option<f32>,
    cap: LineCapStyle,
    join: LineJoinStyle,
    dash: LineDashStyle,
}

impl LineStyle {
    /// Default style: backend width, butt cap, miter join, solid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Style with an explicit width in the engine's current measurement mode.
    pub fn with_width(mut self, width: f32) -> Result<Self> {
        if !width.is_finite() || width < 0.0 {
            return Err(Error::config(format!(
                "line width must be non-negative, got {}",
                width
            )));
        }
        self.width = Some(width);
        Ok(self)
    }

    /// Drop the explicit width so the default applies.
    pub fn with_default_width(mut self) -> Self {
        self.width = None;
        self
    }

    /// Replace the cap style.
    pub fn with_cap(mut self, cap: LineCapStyle) -> Self {
        self.cap = cap;
        self
    }

    /// Replace the join style.
    pub fn with_join(mut self, join: LineJoinStyle) -> Self {
        self.join = join;
        self
    }

    /// Replace the dash pattern.
    pub fn with_dash(mut self, dash: LineDashStyle) -> Self {
        self.dash = dash;
        self
    }

    /// Explicit width, if any.
    pub fn width(&self) -> Option<f32> {
        self.width
    }

    /// Cap style.
    pub fn cap(&self) -> LineCapStyle {
        self.cap
    }

    /// Join style.
    pub fn join(&self) -> LineJoinStyle {
        self.join
    }

    /// Dash pattern.
    pub fn dash(&self) -> &LineDashStyle {
        &self.dash
    }

    /// Width in points, interpreting an explicit width under `mode`.
    pub(crate) fn native_width(&self, mode: ScaleMode) -> f32 {
        self.width
            .map(|w| mode.to_native(w))
            .unwrap_or(DEFAULT_LINE_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style() {
        let style = LineStyle::new();
        assert_eq!(style.width(), None);
        assert_eq!(style.cap(), LineCapStyle::None);
        assert_eq!(style.join(), LineJoinStyle::Miter);
        assert!(style.dash().is_solid());
        assert_eq!(style.native_width(ScaleMode::Inches), DEFAULT_LINE_WIDTH);
    }

    #[test]
    fn test_structural_equality() {
        let a = LineStyle::new()
            .with_width(2.0)
            .unwrap()
            .with_dash(LineDashStyle::dot());
        let b = LineStyle::new()
            .with_dash(LineDashStyle::dot())
            .with_width(2.0)
            .unwrap();
        assert_eq!(a, b);
        assert_ne!(a, b.clone().with_cap(LineCapStyle::Round));
    }

    #[test]
    fn test_dash_presets_match_on_off_constructors() {
        assert_eq!(LineDashStyle::dash(), LineDashStyle::on_off(6.0, 3.0).unwrap());
        assert_eq!(
            LineDashStyle::dot(),
            LineDashStyle::on_then_off(2.0, 3.0, 0.0).unwrap()
        );
        assert_eq!(LineDashStyle::dash_dot_dot().pattern().len(), 6);
    }

    #[test]
    fn test_negative_width_rejected() {
        let err = LineStyle::new().with_width(-1.0).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_zero_width_allowed() {
        let style = LineStyle::new().with_width(0.0).unwrap();
        assert_eq!(style.width(), Some(0.0));
    }

    #[test]
    fn test_dash_scaling() {
        let (pattern, phase) = LineDashStyle::dash().scaled(0.5);
        assert_eq!(pattern, vec![3.0, 3.0]);
        assert_eq!(phase, 1.5);
        let (pattern, _) = LineDashStyle::dash().scaled(0.0);
        assert!(pattern.is_empty());
    }

    #[test]
    fn test_native_width_uses_mode() {
        let style = LineStyle::new().with_width(1.0).unwrap();
        assert_eq!(style.native_width(ScaleMode::Points), 1.0);
        assert_eq!(style.native_width(ScaleMode::Inches), 72.0);
    }
}

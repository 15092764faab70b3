//! Measurement modes and conversion to native PDF points.
//!
//! Every coordinate the engine stores is in points. Callers talk in the current
//! [`ScaleMode`]; conversion is a single multiplication so round trips are exact up to
//! float precision.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Points per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Unit in which callers express positions, sizes, widths and margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScaleMode {
    /// Native PDF points (1/72 inch).
    Points,
    /// Hundredths of an inch.
    #[default]
    Hundredths,
    /// Inches.
    Inches,
}

impl ScaleMode {
    /// Points per caller unit.
    pub fn factor(self) -> f32 {
        match self {
            ScaleMode::Points => 1.0,
            ScaleMode::Hundredths => POINTS_PER_INCH / 100.0,
            ScaleMode::Inches => POINTS_PER_INCH,
        }
    }

    /// Convert a caller value into points.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_scribe::units::ScaleMode;
    ///
    /// assert_eq!(ScaleMode::Inches.to_native(2.0), 144.0);
    /// assert!((ScaleMode::Hundredths.to_native(100.0) - 72.0).abs() < 1e-4);
    /// ```
    #[inline]
    pub fn to_native(self, value: f32) -> f32 {
        value * self.factor()
    }

    /// Convert points into a caller value.
    #[inline]
    pub fn from_native(self, value: f32) -> f32 {
        value / self.factor()
    }

    /// Canonical lowercase name, accepted back by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            ScaleMode::Points => "points",
            ScaleMode::Hundredths => "hundredths",
            ScaleMode::Inches => "inches",
        }
    }
}

impl fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScaleMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "points" | "point" | "pt" => Ok(ScaleMode::Points),
            "hundredths" | "hundredthsofaninch" | "hundredths_of_an_inch" => {
                Ok(ScaleMode::Hundredths)
            },
            "inches" | "inch" | "in" => Ok(ScaleMode::Inches),
            other => Err(Error::config(format!("unsupported scale mode '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factors() {
        assert_eq!(ScaleMode::Points.factor(), 1.0);
        assert!((ScaleMode::Hundredths.factor() - 0.72).abs() < 1e-6);
        assert_eq!(ScaleMode::Inches.factor(), 72.0);
    }

    #[test]
    fn test_default_is_hundredths() {
        assert_eq!(ScaleMode::default(), ScaleMode::Hundredths);
    }

    #[test]
    fn test_round_trip() {
        for mode in [ScaleMode::Points, ScaleMode::Hundredths, ScaleMode::Inches] {
            let v = 123.456_f32;
            let back = mode.from_native(mode.to_native(v));
            assert!((back - v).abs() < 1e-3, "{} round trip drifted: {}", mode, back);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Points".parse::<ScaleMode>().unwrap(), ScaleMode::Points);
        assert_eq!(" inches ".parse::<ScaleMode>().unwrap(), ScaleMode::Inches);
        assert_eq!("hundredths".parse::<ScaleMode>().unwrap(), ScaleMode::Hundredths);
        for mode in [ScaleMode::Points, ScaleMode::Hundredths, ScaleMode::Inches] {
            assert_eq!(mode.to_string().parse::<ScaleMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_parse_unknown_is_invalid_configuration() {
        let err = "furlongs".parse::<ScaleMode>().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_serde_name() {
        let json = serde_json::to_string(&ScaleMode::Inches).unwrap();
        assert_eq!(json, "\"Inches\"");
        let back: ScaleMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ScaleMode::Inches);
    }
}

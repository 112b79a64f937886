//! Scalar angle helpers: unit conversion, normalization and formatting

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest number of decimal places [`format_angle`] will render.
pub const MAX_ANGLE_PRECISION: i32 = 3;

/// Unit used when rendering an angle for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleFormat {
    #[default]
    Degrees,
    Radians,
}

impl AngleFormat {
    /// Unit marker appended after the number
    pub fn suffix(&self) -> &'static str {
        match self {
            AngleFormat::Degrees => "°",
            AngleFormat::Radians => " rad",
        }
    }
}

impl fmt::Display for AngleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngleFormat::Degrees => f.write_str("degrees"),
            AngleFormat::Radians => f.write_str("radians"),
        }
    }
}

impl std::str::FromStr for AngleFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "degrees" | "deg" => Ok(AngleFormat::Degrees),
            "radians" | "rad" => Ok(AngleFormat::Radians),
            other => Err(format!("unknown angle format: {other}")),
        }
    }
}

/// Convert radians to degrees
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Convert degrees to radians
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Fold an angle in degrees into `[-180, 180]`.
///
/// `±180` are fixed points. Values just above `180` land just above `-180`.
pub fn normalize_angle(degrees: f64) -> f64 {
    // `%` keeps the sign of the dividend, matching a truncated modulo.
    let mut normalized = degrees % 360.0;
    if normalized > 180.0 {
        normalized -= 360.0;
    } else if normalized < -180.0 {
        normalized += 360.0;
    }
    normalized
}

/// Render an angle (given in degrees) for display.
///
/// `precision` is silently clamped to `0..=3`. In radians mode the value is
/// converted before rounding.
pub fn format_angle(angle: f64, precision: i32, format: AngleFormat) -> String {
    let value = match format {
        AngleFormat::Degrees => angle,
        AngleFormat::Radians => degrees_to_radians(angle),
    };
    let decimals = precision.clamp(0, MAX_ANGLE_PRECISION) as usize;
    format!("{:.*}{}", decimals, round_half_away(value, decimals), format.suffix())
}

/// Round half away from zero before formatting, since `{:.N}` rounds half to even.
fn round_half_away(value: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let scaled = value * scale;
    if scaled.is_finite() {
        scaled.round() / scale
    } else {
        value
    }
}

/// True iff every component is finite (not NaN and not ±infinity)
pub fn is_valid_sensor_reading(pitch: f64, roll: f64, yaw: f64) -> bool {
    pitch.is_finite() && roll.is_finite() && yaw.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_radian_round_trip() {
        for x in [-1234.5678, -PI, -1e-9, 0.0, 0.25, 90.0, 1e6] {
            assert!((degrees_to_radians(radians_to_degrees(x)) - x).abs() < 1e-9 * x.abs().max(1.0));
            assert!((radians_to_degrees(degrees_to_radians(x)) - x).abs() < 1e-9 * x.abs().max(1.0));
        }
        assert!((radians_to_degrees(PI) - 180.0).abs() < 1e-12);
        assert!((degrees_to_radians(90.0) - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(90.0), 90.0);
        assert_eq!(normalize_angle(270.0), -90.0);
        assert_eq!(normalize_angle(-270.0), 90.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        assert_eq!(normalize_angle(540.0), 180.0);
    }

    #[test]
    fn test_normalize_boundaries_are_fixed_points() {
        assert_eq!(normalize_angle(180.0), 180.0);
        assert_eq!(normalize_angle(-180.0), -180.0);
        let just_above = normalize_angle(180.001);
        assert!((just_above - (-179.999)).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_many_turns() {
        for turns in -10..=10 {
            let base = 37.25;
            let d = base + 360.0 * turns as f64;
            assert!((normalize_angle(d) - base).abs() < 1e-9, "turns = {turns}");
        }
        assert!((normalize_angle(3600.0 + 0.125) - 0.125).abs() < 1e-9);
        assert!((normalize_angle(-3600.0 - 0.125) + 0.125).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_range_and_congruence() {
        let mut d = -5000.0;
        while d < 5000.0 {
            let n = normalize_angle(d);
            assert!((-180.0..=180.0).contains(&n), "{d} -> {n}");
            let k = (d - n) / 360.0;
            assert!((k - k.round()).abs() < 1e-9, "{d} -> {n} not congruent");
            d += 13.37;
        }
    }

    #[test]
    fn test_format_angle() {
        assert_eq!(format_angle(45.0, 1, AngleFormat::Degrees), "45.0°");
        assert_eq!(format_angle(45.678, 0, AngleFormat::Degrees), "46°");
        assert_eq!(format_angle(-12.3456, 2, AngleFormat::Degrees), "-12.35°");
        assert_eq!(format_angle(180.0, 3, AngleFormat::Radians), "3.142 rad");
    }

    #[test]
    fn test_format_angle_clamps_precision() {
        assert_eq!(format_angle(1.23456, 10, AngleFormat::Degrees), "1.235°");
        assert_eq!(format_angle(1.6, -4, AngleFormat::Degrees), "2°");
    }

    #[test]
    fn test_valid_sensor_reading() {
        assert!(is_valid_sensor_reading(0.0, 0.0, 0.0));
        assert!(is_valid_sensor_reading(f64::MAX, f64::MIN_POSITIVE, -1e300));
        assert!(!is_valid_sensor_reading(f64::NAN, 0.0, 0.0));
        assert!(!is_valid_sensor_reading(0.0, f64::INFINITY, 0.0));
        assert!(!is_valid_sensor_reading(0.0, 0.0, f64::NEG_INFINITY));
    }

    #[test]
    fn test_angle_format_parse() {
        assert_eq!("degrees".parse::<AngleFormat>(), Ok(AngleFormat::Degrees));
        assert_eq!("RAD".parse::<AngleFormat>(), Ok(AngleFormat::Radians));
        assert!("gradians".parse::<AngleFormat>().is_err());
    }
}

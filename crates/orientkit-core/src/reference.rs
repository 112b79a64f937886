//! Named reference orientations for alignment detection

use std::fmt;
use std::f64::consts::FRAC_1_SQRT_2;

use serde::{Deserialize, Serialize};

use crate::quaternion::Quaternion;

/// Device upright, no rotation
pub const PORTRAIT_REFERENCE: Quaternion = Quaternion::IDENTITY;

/// 90° about the vertical (z) axis
pub const LANDSCAPE_RIGHT_REFERENCE: Quaternion = Quaternion::new(FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2);

/// -90° about the vertical (z) axis
pub const LANDSCAPE_LEFT_REFERENCE: Quaternion = Quaternion::new(FRAC_1_SQRT_2, 0.0, 0.0, -FRAC_1_SQRT_2);

/// Orientation the device indicator measures alignment against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetOrientation {
    #[default]
    Portrait,
    /// Landscape right
    Landscape,
    LandscapeLeft,
}

impl TargetOrientation {
    /// Reference quaternion for this target
    pub fn reference(&self) -> Quaternion {
        match self {
            TargetOrientation::Portrait => PORTRAIT_REFERENCE,
            TargetOrientation::Landscape => LANDSCAPE_RIGHT_REFERENCE,
            TargetOrientation::LandscapeLeft => LANDSCAPE_LEFT_REFERENCE,
        }
    }
}

impl fmt::Display for TargetOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetOrientation::Portrait => "portrait",
            TargetOrientation::Landscape => "landscape",
            TargetOrientation::LandscapeLeft => "landscape-left",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for TargetOrientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "portrait" => Ok(TargetOrientation::Portrait),
            "landscape" | "landscape-right" => Ok(TargetOrientation::Landscape),
            "landscape-left" => Ok(TargetOrientation::LandscapeLeft),
            other => Err(format!("unknown target orientation: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_references_are_unit() {
        for target in [
            TargetOrientation::Portrait,
            TargetOrientation::Landscape,
            TargetOrientation::LandscapeLeft,
        ] {
            assert!(target.reference().is_normalized(), "{target}");
        }
    }

    #[test]
    fn test_landscape_is_quarter_turn_from_portrait() {
        let d = PORTRAIT_REFERENCE.angular_distance(&LANDSCAPE_RIGHT_REFERENCE);
        assert!((d - 90.0).abs() < 1e-6);
        let d = LANDSCAPE_LEFT_REFERENCE.angular_distance(&LANDSCAPE_RIGHT_REFERENCE);
        assert!((d - 180.0).abs() < 1e-6);
        assert!((LANDSCAPE_RIGHT_REFERENCE.to_euler_at(0).yaw - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_round_trip_names() {
        for target in [
            TargetOrientation::Portrait,
            TargetOrientation::Landscape,
            TargetOrientation::LandscapeLeft,
        ] {
            assert_eq!(target.to_string().parse::<TargetOrientation>(), Ok(target));
        }
        assert!("upside-down".parse::<TargetOrientation>().is_err());
    }
}

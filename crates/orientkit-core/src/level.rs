//! Roll-only angle math for the bubble level

use serde::{Deserialize, Serialize};

use crate::angle::radians_to_degrees;

/// Gravity vector in device-local coordinates (g or m/s², unit does not matter)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GravityVector {
    /// Lateral component
    pub x: f64,
    /// Vertical component
    pub y: f64,
    /// Depth component, unused by the roll computation
    #[serde(default)]
    pub z: f64,
}

impl GravityVector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Whether all components are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Roll angle of this vector, see [`calculate_roll_angle`]
    pub fn roll_angle(&self) -> f64 {
        calculate_roll_angle(self.x, self.y)
    }
}

/// Roll angle in degrees (`[-90, 90]`) from the lateral and vertical gravity
/// components.
///
/// `|y|` is used so tilting forward or backward gives the same reading.
pub fn calculate_roll_angle(x: f64, y: f64) -> f64 {
    radians_to_degrees(x.atan2(y.abs()))
}

/// `|angle| <= threshold`, boundary inclusive
pub fn is_within_threshold(angle: f64, threshold: f64) -> bool {
    angle.abs() <= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upright_is_zero() {
        for y in [0.1, 1.0, 9.81, 1000.0] {
            assert_eq!(calculate_roll_angle(0.0, y), 0.0);
        }
    }

    #[test]
    fn test_thirty_degrees() {
        assert!((calculate_roll_angle(0.5, 0.866) - 30.0).abs() < 0.01);
        assert!((calculate_roll_angle(-0.5, 0.866) + 30.0).abs() < 0.01);
    }

    #[test]
    fn test_sign_of_y_irrelevant() {
        for (x, y) in [(0.3, 0.9), (-0.7, 0.2), (1.0, 0.0), (0.0, 5.0)] {
            assert_eq!(calculate_roll_angle(x, y), calculate_roll_angle(x, -y));
        }
    }

    #[test]
    fn test_lying_on_side() {
        assert!((calculate_roll_angle(1.0, 0.0) - 90.0).abs() < 1e-9);
        assert!((calculate_roll_angle(-1.0, 0.0) + 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_inclusive() {
        assert!(is_within_threshold(1.0, 1.0));
        assert!(is_within_threshold(-1.0, 1.0));
        assert!(is_within_threshold(0.0, 0.0));
        assert!(!is_within_threshold(1.0001, 1.0));
        assert!(!is_within_threshold(-1.5, 1.0));
    }

    #[test]
    fn test_gravity_vector() {
        let g = GravityVector::new(0.5, -0.866, 0.1);
        assert!((g.roll_angle() - 30.0).abs() < 0.01);
        assert!(g.is_finite());
        assert!(!GravityVector::new(f64::NAN, 1.0, 0.0).is_finite());
    }
}

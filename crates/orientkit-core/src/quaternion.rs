//! Quaternion representation of device rotation

use std::ops::{Mul, Neg};

use serde::{Deserialize, Serialize};

use crate::angle::{degrees_to_radians, normalize_angle, radians_to_degrees};
use crate::euler::EulerAngles;

/// Allowed deviation of a unit quaternion's magnitude from 1
pub const NORMALIZED_TOLERANCE: f64 = 0.01;

/// Largest component magnitude whose pairwise products cannot overflow
const MAX_SAFE_COMPONENT: f64 = 1e150;

/// A rotation quaternion `(w, x, y, z)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self { w: 1.0, x: 0.0, y: 0.0, z: 0.0 };

    /// Create a new quaternion
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Create a quaternion from an axis and an angle in degrees
    pub fn from_axis_angle(axis: [f64; 3], angle_degrees: f64) -> Self {
        let len = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
        if len == 0.0 || !len.is_finite() {
            return Self::IDENTITY;
        }
        let half = degrees_to_radians(angle_degrees) / 2.0;
        let s = half.sin() / len;
        Self {
            w: half.cos(),
            x: axis[0] * s,
            y: axis[1] * s,
            z: axis[2] * s,
        }
    }

    /// Build the ZYX quaternion for the given angles, the inverse of [`Quaternion::to_euler_at`]
    pub fn from_euler_degrees(pitch: f64, roll: f64, yaw: f64) -> Self {
        let (sr, cr) = (degrees_to_radians(roll) * 0.5).sin_cos();
        let (sp, cp) = (degrees_to_radians(pitch) * 0.5).sin_cos();
        let (sy, cy) = (degrees_to_radians(yaw) * 0.5).sin_cos();

        Self {
            w: cr * cp * cy + sr * sp * sy,
            x: sr * cp * cy - cr * sp * sy,
            y: cr * sp * cy + sr * cp * sy,
            z: cr * cp * sy - sr * sp * cy,
        }
    }

    /// Four-dimensional dot product. Commutative.
    pub fn dot(&self, other: &Quaternion) -> f64 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Get the magnitude of the quaternion
    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Whether the magnitude is within [`NORMALIZED_TOLERANCE`] of 1
    pub fn is_normalized(&self) -> bool {
        (self.magnitude() - 1.0).abs() < NORMALIZED_TOLERANCE
    }

    /// Whether all four components are finite
    pub fn is_finite(&self) -> bool {
        self.w.is_finite() && self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Normalize the quaternion; a zero or non-finite magnitude yields identity
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 && mag.is_finite() {
            Self {
                w: self.w / mag,
                x: self.x / mag,
                y: self.y / mag,
                z: self.z / mag,
            }
        } else {
            Self::IDENTITY
        }
    }

    /// Get the conjugate of the quaternion
    pub fn conjugate(&self) -> Self {
        Self {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    /// Rotation angle in degrees (`[0, 180]`) separating two orientations.
    ///
    /// Uses `|dot|`, so `q` and `-q` are treated as the same rotation.
    pub fn angular_distance(&self, other: &Quaternion) -> f64 {
        let dot = self.dot(other).abs().clamp(0.0, 1.0);
        // NaN survives clamp; report the far end rather than NaN.
        if dot.is_nan() {
            return 180.0;
        }
        radians_to_degrees(2.0 * dot.acos())
    }

    /// ZYX Euler decomposition stamped with `timestamp`.
    ///
    /// The pitch argument is clamped to `[-1, 1]` so gimbal lock and
    /// unnormalized input still produce finite angles. Components large
    /// enough to overflow when multiplied are first divided by the largest one.
    pub fn to_euler_at(&self, timestamp: u64) -> EulerAngles {
        let Quaternion { w, x, y, z } = self.scaled_for_products();

        let sinr_cosp = 2.0 * (w * x + y * z);
        let cosr_cosp = 1.0 - 2.0 * (x * x + y * y);
        let roll = sinr_cosp.atan2(cosr_cosp);

        let sinp = (2.0 * (w * y - z * x)).clamp(-1.0, 1.0);
        let pitch = sinp.asin();

        let siny_cosp = 2.0 * (w * z + x * y);
        let cosy_cosp = 1.0 - 2.0 * (y * y + z * z);
        let yaw = siny_cosp.atan2(cosy_cosp);

        EulerAngles {
            pitch: normalize_angle(radians_to_degrees(pitch)),
            roll: normalize_angle(radians_to_degrees(roll)),
            yaw: normalize_angle(radians_to_degrees(yaw)),
            timestamp,
        }
    }

    fn scaled_for_products(&self) -> Self {
        let largest = self.w.abs().max(self.x.abs()).max(self.y.abs()).max(self.z.abs());
        if largest > MAX_SAFE_COMPONENT && largest.is_finite() {
            Self::new(self.w / largest, self.x / largest, self.y / largest, self.z / largest)
        } else {
            *self
        }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Neg for Quaternion {
    type Output = Quaternion;

    fn neg(self) -> Self::Output {
        Quaternion::new(-self.w, -self.x, -self.y, -self.z)
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Self) -> Self::Output {
        Quaternion::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }
}

/// Dot product of two quaternions
pub fn quaternion_dot_product(q1: &Quaternion, q2: &Quaternion) -> f64 {
    q1.dot(q2)
}

/// Angular distance in degrees between two orientations, see [`Quaternion::angular_distance`]
pub fn quaternion_angular_distance(current: &Quaternion, reference: &Quaternion) -> f64 {
    current.angular_distance(reference)
}

/// Whether `q` has unit magnitude within [`NORMALIZED_TOLERANCE`]
pub fn is_normalized_quaternion(q: &Quaternion) -> bool {
    q.is_normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-5;

    fn sample_rotations() -> Vec<Quaternion> {
        vec![
            Quaternion::IDENTITY,
            Quaternion::from_axis_angle([1.0, 0.0, 0.0], 37.0),
            Quaternion::from_axis_angle([0.0, 1.0, 0.0], -120.0),
            Quaternion::from_axis_angle([1.0, 2.0, 3.0], 77.7),
            Quaternion::new(0.1, -0.7, 0.3, 0.2),
        ]
    }

    #[test]
    fn test_identity_euler_is_zero() {
        let e = Quaternion::IDENTITY.to_euler_at(0);
        assert!(e.pitch.abs() < EPS);
        assert!(e.roll.abs() < EPS);
        assert!(e.yaw.abs() < EPS);
    }

    #[test]
    fn test_single_axis_rotations() {
        let roll = Quaternion::from_axis_angle([1.0, 0.0, 0.0], 90.0).to_euler_at(0);
        assert!((roll.roll - 90.0).abs() < EPS);
        assert!(roll.pitch.abs() < EPS);
        assert!(roll.yaw.abs() < EPS);

        // Slightly under 90 to stay clear of the gimbal-lock singularity for roll/yaw.
        let pitch = Quaternion::from_axis_angle([0.0, 1.0, 0.0], 89.999).to_euler_at(0);
        assert!((pitch.pitch - 89.999).abs() < 1e-3);
        assert!(pitch.roll.abs() < EPS);
        assert!(pitch.yaw.abs() < EPS);

        let yaw = Quaternion::from_axis_angle([0.0, 0.0, 1.0], 90.0).to_euler_at(0);
        assert!((yaw.yaw - 90.0).abs() < EPS);
        assert!(yaw.pitch.abs() < EPS);
        assert!(yaw.roll.abs() < EPS);
    }

    #[test]
    fn test_gimbal_lock_clamped() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let e = Quaternion::new(h, 0.0, h, 0.0).to_euler_at(0);
        assert!((e.pitch - 90.0).abs() < EPS);

        // 2(wy - zx) = 2.0, far outside asin's domain
        let e = Quaternion::new(1.0, 0.0, 1.0, 0.0).to_euler_at(0);
        assert!((e.pitch - 90.0).abs() < EPS);
        assert!(e.roll.is_finite() && e.yaw.is_finite());

        let e = Quaternion::new(1.0, 0.0, -1.0, 0.0).to_euler_at(0);
        assert!((e.pitch + 90.0).abs() < EPS);
    }

    #[test]
    fn test_euler_is_finite_for_degenerate_input() {
        for q in [
            Quaternion::new(0.0, 0.0, 0.0, 0.0),
            Quaternion::new(1e-300, 0.0, 0.0, 0.0),
            Quaternion::new(1e150, 1e150, -1e150, 1e150),
            Quaternion::new(5.0, 3.0, -2.0, 9.0),
        ] {
            let e = q.to_euler_at(0);
            assert!(e.pitch.is_finite() && e.roll.is_finite() && e.yaw.is_finite(), "{q:?}");
        }
    }

    #[test]
    fn test_euler_is_finite_for_huge_components() {
        let q = Quaternion::new(1e200, 1e200, 1e200, -1e200);
        let e = q.to_euler_at(0);
        assert!(e.is_valid(), "{e:?}");

        // Rescaled to exactly (1, 1, 1, -1) before the products are taken.
        let small = Quaternion::new(1.0, 1.0, 1.0, -1.0).to_euler_at(0);
        assert!((e.pitch - small.pitch).abs() < 1e-9);
        assert!((e.roll - small.roll).abs() < 1e-9);
        assert!((e.yaw - small.yaw).abs() < 1e-9);

        let e = Quaternion::new(-1e300, 1e300, f64::MAX, 1e250).to_euler_at(0);
        assert!(e.is_valid(), "{e:?}");
    }

    #[test]
    fn test_euler_round_trip() {
        let q = Quaternion::from_euler_degrees(20.0, -35.0, 110.0);
        let e = q.to_euler_at(42);
        assert!((e.pitch - 20.0).abs() < EPS);
        assert!((e.roll + 35.0).abs() < EPS);
        assert!((e.yaw - 110.0).abs() < EPS);
        assert_eq!(e.timestamp, 42);
    }

    #[test]
    fn test_dot_commutative() {
        let qs = sample_rotations();
        for a in &qs {
            for b in &qs {
                assert_eq!(a.dot(b), b.dot(a));
            }
        }
    }

    #[test]
    fn test_angular_distance_properties() {
        let qs = sample_rotations();
        for a in &qs {
            let n = a.normalize();
            assert!(n.angular_distance(&n) < 1e-4);
            assert!(n.angular_distance(&-n) < 1e-4);
            for b in &qs {
                let d = a.angular_distance(b);
                assert!((0.0..=180.0).contains(&d));
                assert_eq!(d, b.angular_distance(a));
            }
        }
    }

    #[test]
    fn test_angular_distance_known_values() {
        let landscape = Quaternion::from_axis_angle([0.0, 0.0, 1.0], 90.0);
        assert!((Quaternion::IDENTITY.angular_distance(&landscape) - 90.0).abs() < EPS);

        let flipped = Quaternion::from_axis_angle([1.0, 0.0, 0.0], 180.0);
        assert!((Quaternion::IDENTITY.angular_distance(&flipped) - 180.0).abs() < EPS);

        let tilt = Quaternion::from_axis_angle([0.0, 1.0, 0.0], 3.0);
        assert!((tilt.angular_distance(&Quaternion::IDENTITY) - 3.0).abs() < EPS);
    }

    #[test]
    fn test_normalize() {
        let q = Quaternion::new(4.0, 1.0, 2.0, 3.0);
        assert!(!q.is_normalized());
        let n = q.normalize();
        assert!((n.magnitude() - 1.0).abs() < 1e-12);
        assert!(n.is_normalized());
        assert_eq!(Quaternion::new(0.0, 0.0, 0.0, 0.0).normalize(), Quaternion::IDENTITY);
    }

    #[test]
    fn test_is_normalized_tolerance() {
        assert!(Quaternion::new(1.005, 0.0, 0.0, 0.0).is_normalized());
        assert!(!Quaternion::new(1.02, 0.0, 0.0, 0.0).is_normalized());
    }

    #[test]
    fn test_product_with_conjugate_is_identity() {
        let q = Quaternion::from_axis_angle([0.0, 1.0, 0.0], 45.0);
        let r = q * q.conjugate();
        assert!((r.w - 1.0).abs() < 1e-12);
        assert!(r.x.abs() < 1e-12 && r.y.abs() < 1e-12 && r.z.abs() < 1e-12);
    }
}

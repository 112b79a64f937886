//! Euler angle orientation snapshots

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::quaternion::Quaternion;

/// Pitch/roll/yaw in degrees, each within `[-180, 180]`, stamped in
/// milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerAngles {
    /// Rotation about the lateral axis
    pub pitch: f64,
    /// Rotation about the depth axis
    pub roll: f64,
    /// Rotation about the vertical axis
    pub yaw: f64,
    pub timestamp: u64,
}

/// The orientation reported to consumers is exactly an Euler snapshot
pub type OrientationState = EulerAngles;

impl EulerAngles {
    /// Zero orientation at the given time, used as the fallback reading
    pub fn zero_at(timestamp: u64) -> Self {
        Self {
            pitch: 0.0,
            roll: 0.0,
            yaw: 0.0,
            timestamp,
        }
    }

    /// Whether all three angles are finite
    pub fn is_valid(&self) -> bool {
        crate::angle::is_valid_sensor_reading(self.pitch, self.roll, self.yaw)
    }
}

/// Convert a quaternion to Euler angles, stamped with the current wall-clock time
pub fn quaternion_to_euler(q: &Quaternion) -> EulerAngles {
    q.to_euler_at(SystemClock.now_ms())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quaternion_to_euler_stamps_now() {
        let before = SystemClock.now_ms();
        let e = quaternion_to_euler(&Quaternion::IDENTITY);
        let after = SystemClock.now_ms();
        assert!(e.timestamp >= before && e.timestamp <= after);
        assert!(e.pitch.abs() < 1e-5 && e.roll.abs() < 1e-5 && e.yaw.abs() < 1e-5);
    }

    #[test]
    fn test_serializes_field_names() {
        let json = serde_json::to_value(EulerAngles::zero_at(7)).unwrap();
        assert_eq!(json["timestamp"], 7);
        assert!(json.get("pitch").is_some());
        assert!(json.get("roll").is_some());
        assert!(json.get("yaw").is_some());
    }

    #[test]
    fn test_is_valid() {
        assert!(EulerAngles::zero_at(0).is_valid());
        let bad = EulerAngles { roll: f64::NAN, ..EulerAngles::zero_at(0) };
        assert!(!bad.is_valid());
    }
}

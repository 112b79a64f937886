//! Simulated sensors so the indicators can run without hardware

use std::f64::consts::TAU;
use std::time::{Duration, Instant};

use orientkit_core::{degrees_to_radians, GravityVector, Quaternion};
use orientkit_sensor::RawOrientationSample;

/// Rocks the device back and forth with a sine profile
#[derive(Debug, Clone, Copy)]
pub struct Sweep {
    started: Instant,
    amplitude: f64,
    period: Duration,
}

impl Sweep {
    /// `amplitude` in degrees either side of rest, one full swing per `period`
    pub fn new(amplitude: f64, period: Duration) -> Self {
        Self {
            started: Instant::now(),
            amplitude,
            period,
        }
    }

    pub fn angle_at(&self, elapsed: Duration) -> f64 {
        let period = self.period.as_secs_f64();
        if period <= 0.0 {
            return 0.0;
        }
        self.amplitude * (TAU * elapsed.as_secs_f64() / period).sin()
    }

    fn current(&self) -> f64 {
        self.angle_at(self.started.elapsed())
    }

    /// Quaternion readings tilting about the device x axis away from `rest`
    pub fn orientation_around(
        self,
        rest: Quaternion,
    ) -> impl Fn() -> Option<RawOrientationSample> + Send + Sync + 'static {
        move || {
            let tilt = Quaternion::from_axis_angle([1.0, 0.0, 0.0], self.current());
            Some(RawOrientationSample::from(rest * tilt))
        }
    }

    /// Gravity readings for a device rolling side to side while held upright
    pub fn gravity(self) -> impl Fn() -> Option<GravityVector> + Send + Sync + 'static {
        move || {
            let roll = degrees_to_radians(self.current());
            Some(GravityVector::new(roll.sin(), roll.cos(), 0.0))
        }
    }
}

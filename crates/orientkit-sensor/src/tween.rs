//! Display smoothing: angles glide toward each new target over one update interval

use orientkit_core::{normalize_angle, EulerAngles};

/// Linear tween of a single angle in degrees.
///
/// Retargeting starts from the currently displayed value and takes the
/// shorter way around the ±180° seam.
#[derive(Debug, Clone)]
pub struct AngleTween {
    start: f64,
    /// Unwrapped end value; may lie outside `[-180, 180]`
    end: f64,
    started_at_ms: u64,
    duration_ms: u64,
}

impl AngleTween {
    /// A tween already resting at `value`
    pub fn settled(value: f64) -> Self {
        Self {
            start: value,
            end: value,
            started_at_ms: 0,
            duration_ms: 0,
        }
    }

    /// Head toward `target` from wherever the tween is at `now_ms`
    pub fn retarget(&mut self, target: f64, now_ms: u64, duration_ms: u64) {
        let current = self.value_at(now_ms);
        self.start = current;
        self.end = current + normalize_angle(target - current);
        self.started_at_ms = now_ms;
        self.duration_ms = duration_ms;
    }

    /// Progress in `[0, 1]`
    pub fn progress(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.started_at_ms) as f64;
        (elapsed / self.duration_ms as f64).min(1.0)
    }

    /// Displayed value at `now_ms`, normalized to `[-180, 180]`
    pub fn value_at(&self, now_ms: u64) -> f64 {
        let t = self.progress(now_ms);
        normalize_angle(self.start + (self.end - self.start) * t)
    }
}

/// Displayed pitch/roll/yaw, each tweened independently
#[derive(Debug, Clone)]
pub struct SmoothedOrientation {
    pitch: AngleTween,
    roll: AngleTween,
    yaw: AngleTween,
}

impl Default for SmoothedOrientation {
    fn default() -> Self {
        Self {
            pitch: AngleTween::settled(0.0),
            roll: AngleTween::settled(0.0),
            yaw: AngleTween::settled(0.0),
        }
    }
}

impl SmoothedOrientation {
    pub fn retarget(&mut self, target: &EulerAngles, now_ms: u64, duration_ms: u64) {
        self.pitch.retarget(target.pitch, now_ms, duration_ms);
        self.roll.retarget(target.roll, now_ms, duration_ms);
        self.yaw.retarget(target.yaw, now_ms, duration_ms);
    }

    /// Angles to draw at `now_ms`
    pub fn displayed(&self, now_ms: u64) -> EulerAngles {
        EulerAngles {
            pitch: self.pitch.value_at(now_ms),
            roll: self.roll.value_at(now_ms),
            yaw: self.yaw.value_at(now_ms),
            timestamp: now_ms,
        }
    }
}

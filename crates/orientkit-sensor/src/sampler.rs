//! Orientation sampling: validate raw readings, convert to Euler angles,
//! smooth the displayed values and throttle change notifications

use orientkit_config::IndicatorConfig;
use orientkit_core::{EulerAngles, OrientationState, Quaternion, Throttle};
use tracing::{info, trace, warn};

use crate::source::RawOrientationSample;
use crate::tween::SmoothedOrientation;

/// Default polling interval (~30 FPS)
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 33;
/// Default spacing between orientation notifications
pub const DEFAULT_ORIENTATION_CHANGE_THROTTLE_MS: u64 = 100;

/// Stateful adapter between a raw quaternion source and its consumers.
///
/// Invalid readings are dropped and the last good state is kept. Until the
/// first good reading arrives the state is the identity orientation.
#[derive(Debug, Clone)]
pub struct OrientationSampler {
    update_interval_ms: u64,
    enabled: bool,
    quaternion: Quaternion,
    orientation: OrientationState,
    display: SmoothedOrientation,
    throttle: Throttle,
    sensor_available: bool,
    discarded: u64,
}

impl Default for OrientationSampler {
    fn default() -> Self {
        Self::new(DEFAULT_UPDATE_INTERVAL_MS, DEFAULT_ORIENTATION_CHANGE_THROTTLE_MS)
    }
}

impl OrientationSampler {
    pub fn new(update_interval_ms: u64, orientation_change_throttle_ms: u64) -> Self {
        Self {
            update_interval_ms,
            enabled: true,
            quaternion: Quaternion::IDENTITY,
            orientation: EulerAngles::zero_at(0),
            display: SmoothedOrientation::default(),
            throttle: Throttle::new(orientation_change_throttle_ms),
            sensor_available: true,
            discarded: 0,
        }
    }

    pub fn from_config(config: &IndicatorConfig) -> Self {
        let mut sampler = Self::new(config.update_interval_ms, config.orientation_change_throttle_ms);
        sampler.enabled = config.enabled;
        sampler
    }

    pub fn update_interval_ms(&self) -> u64 {
        self.update_interval_ms
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Stop or resume processing. Nothing buffered while disabled is replayed.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            info!(enabled, "Orientation sampling toggled");
        }
        self.enabled = enabled;
    }

    /// Last accepted quaternion
    pub fn quaternion(&self) -> Quaternion {
        self.quaternion
    }

    /// Last computed orientation (target of the displayed values)
    pub fn orientation(&self) -> OrientationState {
        self.orientation
    }

    /// Smoothed angles to draw at `now_ms`
    pub fn displayed(&self, now_ms: u64) -> EulerAngles {
        self.display.displayed(now_ms)
    }

    /// Whether the last poll found a reading
    pub fn sensor_available(&self) -> bool {
        self.sensor_available
    }

    /// Number of readings rejected as non-finite
    pub fn discarded_samples(&self) -> u64 {
        self.discarded
    }

    /// Process one poll of the sensor.
    ///
    /// Returns the freshly computed state when the notification throttle
    /// window is open, `None` otherwise (including for dropped readings).
    pub fn tick(&mut self, sample: Option<RawOrientationSample>, now_ms: u64) -> Option<OrientationState> {
        if !self.enabled {
            return None;
        }

        let Some(raw) = sample else {
            if self.sensor_available {
                warn!("Orientation sensor unavailable, holding last known orientation");
                self.sensor_available = false;
            }
            return None;
        };
        if !self.sensor_available {
            info!("Orientation sensor available again");
            self.sensor_available = true;
        }

        let quaternion = raw.quaternion();
        if !quaternion.is_finite() {
            self.discarded += 1;
            trace!(?raw, "Discarding non-finite orientation sample");
            return None;
        }

        // Timestamps never run backwards even if the wall clock does.
        let timestamp = now_ms.max(self.orientation.timestamp);
        let euler = quaternion.to_euler_at(timestamp);
        if !euler.is_valid() {
            self.discarded += 1;
            trace!(?raw, "Discarding orientation sample with non-finite angles");
            return None;
        }

        self.quaternion = quaternion;
        self.orientation = euler;
        self.display.retarget(&euler, timestamp, self.update_interval_ms);

        self.throttle.try_fire(timestamp).then_some(euler)
    }
}

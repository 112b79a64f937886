//! Bubble-level pipeline: roll angle from gravity, single-threshold level state

use orientkit_config::LevelConfig;
use orientkit_core::{is_within_threshold, GravityVector, Throttle};
use serde::Serialize;
use tracing::{trace, warn};

/// Reported when the gravity source has no reading
pub const SENSOR_UNAVAILABLE: &str = "Gravity sensor not available on this device";

/// Outward notification from a [`LevelIndicator`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LevelEvent {
    /// Throttled roll angle in degrees
    AngleChanged { angle: f64 },
    /// The rendered angle text changed
    AngleTextChanged { text: String },
    LevelReached,
    LevelLost,
}

/// Tracks the roll angle and level state of the device.
///
/// Unlike the 3D indicator there is no hysteresis or debounce: every crossing
/// of the threshold produces a `LevelReached` / `LevelLost` event.
#[derive(Debug, Clone)]
pub struct LevelIndicator {
    config: LevelConfig,
    throttle: Throttle,
    angle: f64,
    was_level: bool,
    last_displayed_angle: f64,
    angle_text: String,
    sensor_error: Option<String>,
}

impl Default for LevelIndicator {
    fn default() -> Self {
        Self::new(LevelConfig::default())
    }
}

impl LevelIndicator {
    pub fn new(config: LevelConfig) -> Self {
        let config = config.validated();
        Self {
            throttle: Throttle::new(config.angle_change_throttle_ms),
            angle: 0.0,
            was_level: false,
            last_displayed_angle: 0.0,
            angle_text: format_angle_text(0.0),
            sensor_error: None,
            config,
        }
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Line rotation in degrees; 0 while disabled
    pub fn angle(&self) -> f64 {
        if self.config.enabled {
            self.angle
        } else {
            0.0
        }
    }

    pub fn is_level(&self) -> bool {
        self.was_level
    }

    pub fn angle_text(&self) -> &str {
        &self.angle_text
    }

    pub fn sensor_error(&self) -> Option<&str> {
        self.sensor_error.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Disabling forgets the level state so re-enabling reports a fresh crossing
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        if !enabled {
            self.was_level = false;
        }
    }

    /// Process one gravity poll and return the events it produced
    pub fn tick(&mut self, sample: Option<GravityVector>, now_ms: u64) -> Vec<LevelEvent> {
        let mut events = Vec::new();
        if !self.config.enabled {
            return events;
        }

        let Some(gravity) = sample else {
            if self.sensor_error.is_none() {
                warn!("{SENSOR_UNAVAILABLE}");
                self.sensor_error = Some(SENSOR_UNAVAILABLE.to_string());
            }
            return events;
        };
        self.sensor_error = None;

        if !gravity.is_finite() {
            trace!(?gravity, "Discarding non-finite gravity sample");
            return events;
        }

        let angle = gravity.roll_angle();
        self.angle = angle;
        let is_level = is_within_threshold(angle, self.config.level_threshold);

        if self.throttle.try_fire(now_ms) {
            events.push(LevelEvent::AngleChanged { angle });
        }

        if self.config.show_angle_text
            && (angle - self.last_displayed_angle).abs() >= self.config.angle_text_update_threshold
        {
            self.last_displayed_angle = angle;
            self.angle_text = format_angle_text(angle);
            events.push(LevelEvent::AngleTextChanged {
                text: self.angle_text.clone(),
            });
        }

        if is_level && !self.was_level {
            self.was_level = true;
            events.push(LevelEvent::LevelReached);
        } else if !is_level && self.was_level {
            self.was_level = false;
            events.push(LevelEvent::LevelLost);
        }

        events
    }
}

fn format_angle_text(angle: f64) -> String {
    format!("{angle:.1}")
}

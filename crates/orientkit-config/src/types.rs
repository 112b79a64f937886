use std::ops::RangeInclusive;

use orientkit_core::alignment::{DEFAULT_EXIT_MULTIPLIER, DEFAULT_MIN_STABLE_DURATION_MS};
use orientkit_core::{AngleFormat, HysteresisConfig, TargetOrientation};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Accepted range for sensor polling intervals (ms): 120 Hz down to 10 Hz
pub const UPDATE_INTERVAL_RANGE: RangeInclusive<u64> = 8..=100;
/// Accepted range for notification throttles (ms)
pub const THROTTLE_RANGE: RangeInclusive<u64> = 0..=1000;
/// Accepted range for the alignment tolerance (degrees)
pub const ALIGNMENT_TOLERANCE_RANGE: RangeInclusive<f64> = 0.1..=45.0;
/// Accepted range for the exit threshold multiplier
pub const EXIT_MULTIPLIER_RANGE: RangeInclusive<f64> = 1.0..=10.0;
/// Accepted range for displayed decimal places
pub const ANGLE_PRECISION_RANGE: RangeInclusive<i32> = 0..=3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientKitConfig {
    /// 3D device orientation indicator
    pub indicator: IndicatorConfig,
    /// Bubble-level line
    pub level: LevelConfig,
}

impl OrientKitConfig {
    /// Copy of this config with every field clamped into its accepted range
    pub fn validated(&self) -> Self {
        Self {
            indicator: self.indicator.validated(),
            level: self.level.validated(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Sensor polling interval in milliseconds (~30 FPS by default)
    pub update_interval_ms: u64,
    pub enabled: bool,
    /// Minimum spacing between orientation change notifications
    pub orientation_change_throttle_ms: u64,
    /// Degrees from the target that count as aligned
    pub alignment_tolerance: f64,
    /// Exit threshold = tolerance × this value
    pub exit_multiplier: f64,
    pub min_stable_duration_ms: u64,
    pub target_orientation: TargetOrientation,
    /// Decimal places in the numeric readout
    pub angle_precision: i32,
    pub angle_format: AngleFormat,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 33,
            enabled: true,
            orientation_change_throttle_ms: 100,
            alignment_tolerance: 2.0,
            exit_multiplier: DEFAULT_EXIT_MULTIPLIER,
            min_stable_duration_ms: DEFAULT_MIN_STABLE_DURATION_MS,
            target_orientation: TargetOrientation::Portrait,
            angle_precision: 1,
            angle_format: AngleFormat::Degrees,
        }
    }
}

impl IndicatorConfig {
    pub fn validated(&self) -> Self {
        let defaults = Self::default();
        Self {
            update_interval_ms: clamp_logged(
                "indicator.update_interval_ms",
                self.update_interval_ms,
                UPDATE_INTERVAL_RANGE,
            ),
            orientation_change_throttle_ms: clamp_logged(
                "indicator.orientation_change_throttle_ms",
                self.orientation_change_throttle_ms,
                THROTTLE_RANGE,
            ),
            alignment_tolerance: clamp_finite_logged(
                "indicator.alignment_tolerance",
                self.alignment_tolerance,
                ALIGNMENT_TOLERANCE_RANGE,
                defaults.alignment_tolerance,
            ),
            exit_multiplier: clamp_finite_logged(
                "indicator.exit_multiplier",
                self.exit_multiplier,
                EXIT_MULTIPLIER_RANGE,
                defaults.exit_multiplier,
            ),
            angle_precision: clamp_logged(
                "indicator.angle_precision",
                self.angle_precision,
                ANGLE_PRECISION_RANGE,
            ),
            ..self.clone()
        }
    }

    /// Detector thresholds derived from tolerance and multiplier
    pub fn hysteresis(&self) -> HysteresisConfig {
        HysteresisConfig::from_tolerance(
            self.alignment_tolerance,
            self.exit_multiplier,
            self.min_stable_duration_ms,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub update_interval_ms: u64,
    pub enabled: bool,
    /// Degrees either side of zero that count as level
    pub level_threshold: f64,
    pub angle_change_throttle_ms: u64,
    pub show_angle_text: bool,
    /// Minimum movement in degrees before the angle text is re-rendered
    pub angle_text_update_threshold: f64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 50,
            enabled: true,
            level_threshold: 1.0,
            angle_change_throttle_ms: 100,
            show_angle_text: false,
            angle_text_update_threshold: 0.1,
        }
    }
}

impl LevelConfig {
    pub fn validated(&self) -> Self {
        let defaults = Self::default();
        Self {
            update_interval_ms: clamp_logged(
                "level.update_interval_ms",
                self.update_interval_ms,
                UPDATE_INTERVAL_RANGE,
            ),
            angle_change_throttle_ms: clamp_logged(
                "level.angle_change_throttle_ms",
                self.angle_change_throttle_ms,
                THROTTLE_RANGE,
            ),
            level_threshold: finite_abs_logged(
                "level.level_threshold",
                self.level_threshold,
                defaults.level_threshold,
            ),
            angle_text_update_threshold: finite_abs_logged(
                "level.angle_text_update_threshold",
                self.angle_text_update_threshold,
                defaults.angle_text_update_threshold,
            ),
            ..self.clone()
        }
    }
}

fn clamp_logged<T>(field: &str, value: T, range: RangeInclusive<T>) -> T
where
    T: PartialOrd + Copy + std::fmt::Debug,
{
    let (min, max) = (*range.start(), *range.end());
    let clamped = if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    };
    if clamped != value {
        warn!(field, ?value, ?clamped, "Config value out of range, clamping");
    }
    clamped
}

/// Like [`clamp_logged`], but NaN and infinities fall back to `default`
fn clamp_finite_logged(field: &str, value: f64, range: RangeInclusive<f64>, default: f64) -> f64 {
    if !value.is_finite() {
        warn!(field, value, default, "Config value is not a finite number, using default");
        return default;
    }
    clamp_logged(field, value, range)
}

/// Magnitude of `value`, or `default` when it is not finite
fn finite_abs_logged(field: &str, value: f64, default: f64) -> f64 {
    if !value.is_finite() {
        warn!(field, value, default, "Config value is not a finite number, using default");
        return default;
    }
    value.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_indicator_component() {
        let c = IndicatorConfig::default();
        assert_eq!(c.update_interval_ms, 33);
        assert_eq!(c.orientation_change_throttle_ms, 100);
        assert_eq!(c.alignment_tolerance, 2.0);
        assert_eq!(c.target_orientation, TargetOrientation::Portrait);
        let h = c.hysteresis();
        assert_eq!(h.enter_threshold, 2.0);
        assert_eq!(h.exit_threshold, 4.0);
        assert_eq!(h.min_stable_duration_ms, 150);
    }

    #[test]
    fn test_validated_clamps() {
        let c = IndicatorConfig {
            update_interval_ms: 1,
            orientation_change_throttle_ms: 5000,
            alignment_tolerance: 90.0,
            exit_multiplier: 0.5,
            angle_precision: 7,
            ..IndicatorConfig::default()
        }
        .validated();
        assert_eq!(c.update_interval_ms, 8);
        assert_eq!(c.orientation_change_throttle_ms, 1000);
        assert_eq!(c.alignment_tolerance, 45.0);
        assert_eq!(c.exit_multiplier, 1.0);
        assert_eq!(c.angle_precision, 3);
        assert!(c.hysteresis().is_well_formed());
    }

    #[test]
    fn test_validated_keeps_in_range_values() {
        let c = OrientKitConfig::default();
        assert_eq!(c.validated(), c);
    }

    #[test]
    fn test_level_validated() {
        let c = LevelConfig {
            update_interval_ms: 500,
            level_threshold: -2.0,
            ..LevelConfig::default()
        }
        .validated();
        assert_eq!(c.update_interval_ms, 100);
        assert_eq!(c.level_threshold, 2.0);
    }

    #[test]
    fn test_non_finite_values_fall_back_to_defaults() {
        let c: OrientKitConfig = toml::from_str(
            r#"
            [indicator]
            alignment_tolerance = nan
            exit_multiplier = inf

            [level]
            level_threshold = nan
            angle_text_update_threshold = -inf
            "#,
        )
        .unwrap();
        let c = c.validated();

        assert!(ALIGNMENT_TOLERANCE_RANGE.contains(&c.indicator.alignment_tolerance));
        assert_eq!(c.indicator.alignment_tolerance, 2.0);
        assert_eq!(c.indicator.exit_multiplier, 2.0);
        assert!(c.indicator.hysteresis().is_well_formed());
        assert_eq!(c.level.level_threshold, 1.0);
        assert_eq!(c.level.angle_text_update_threshold, 0.1);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let c: OrientKitConfig = toml::from_str(
            r#"
            [indicator]
            target_orientation = "landscape-left"
            angle_format = "radians"

            [level]
            show_angle_text = true
            "#,
        )
        .unwrap();
        assert_eq!(c.indicator.target_orientation, TargetOrientation::LandscapeLeft);
        assert_eq!(c.indicator.angle_format, AngleFormat::Radians);
        assert_eq!(c.indicator.update_interval_ms, 33);
        assert!(c.level.show_angle_text);
        assert_eq!(c.level.level_threshold, 1.0);
    }
}

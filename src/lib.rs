//! orientkit: device orientation, alignment and bubble-level computation
//!
//! Re-exports the member crates:
//! - [`core`]: angle and quaternion math, alignment detector, roll math
//! - [`config`]: TOML configuration with defaults and validation
//! - [`sensor`]: sampling adapters, indicator pipelines and the polling runner

pub use orientkit_config as config;
pub use orientkit_core as core;
pub use orientkit_sensor as sensor;

pub use orientkit_config::{IndicatorConfig, LevelConfig, OrientKitConfig};
pub use orientkit_core::{
    calculate_roll_angle, degrees_to_radians, format_angle, is_normalized_quaternion,
    is_valid_sensor_reading, is_within_threshold, normalize_angle, quaternion_angular_distance,
    quaternion_dot_product, quaternion_to_euler, radians_to_degrees, AlignmentDetector,
    AlignmentState, AngleFormat, EulerAngles, GravityVector, HysteresisConfig, OrientationState,
    Quaternion, TargetOrientation,
};
pub use orientkit_sensor::{
    spawn_indicator, spawn_level, DeviceIndicator, IndicatorEvent, LevelEvent, LevelIndicator,
    OrientationSampler, PollingHandle, RawOrientationSample, SampleSource,
};

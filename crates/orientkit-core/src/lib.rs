//! orientkit-core: orientation and alignment math
//!
//! - Angle helpers: conversion, normalization to `[-180, 180]`, formatting
//! - Quaternion type with ZYX Euler extraction and angular distance
//! - Hysteresis alignment detector with time debounce
//! - Roll-only math for the bubble level
//!
//! Everything here is synchronous and allocation-free apart from string
//! formatting, so it can run on every sensor tick.

pub mod alignment;
pub mod angle;
pub mod clock;
pub mod euler;
pub mod level;
pub mod quaternion;
pub mod reference;
pub mod throttle;

pub use alignment::{AlignmentDetector, AlignmentState, HysteresisConfig};
pub use angle::{
    degrees_to_radians, format_angle, is_valid_sensor_reading, normalize_angle,
    radians_to_degrees, AngleFormat,
};
pub use clock::{Clock, SystemClock};
pub use euler::{quaternion_to_euler, EulerAngles, OrientationState};
pub use level::{calculate_roll_angle, is_within_threshold, GravityVector};
pub use quaternion::{
    is_normalized_quaternion, quaternion_angular_distance, quaternion_dot_product, Quaternion,
};
pub use reference::{
    TargetOrientation, LANDSCAPE_LEFT_REFERENCE, LANDSCAPE_RIGHT_REFERENCE, PORTRAIT_REFERENCE,
};
pub use throttle::Throttle;

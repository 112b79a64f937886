//! orientkit-sensor: turns periodic sensor readings into indicator state
//!
//! - [`OrientationSampler`]: validation, Euler conversion, display smoothing
//!   and throttled change notifications
//! - [`DeviceIndicator`]: sampler + hysteresis alignment against a target
//! - [`LevelIndicator`]: roll angle and level crossings from gravity
//! - [`spawn_pipeline`] and friends: tokio polling loop with enable/disable
//!   and clean teardown

pub mod indicator;
pub mod level;
pub mod readout;
pub mod runner;
pub mod sampler;
pub mod source;
pub mod tween;

pub use indicator::{DeviceIndicator, IndicatorEvent};
pub use level::{LevelEvent, LevelIndicator};
pub use readout::AngleReadout;
pub use runner::{spawn_indicator, spawn_level, spawn_pipeline, EventSink, Pipeline, PollingHandle};
pub use sampler::OrientationSampler;
pub use source::{sample_channel, FixedSource, LatestSample, RawOrientationSample, SampleSource};
pub use tween::{AngleTween, SmoothedOrientation};

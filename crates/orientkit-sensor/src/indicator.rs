//! 3D device indicator pipeline: sampling, alignment against a target
//! orientation, and change events

use orientkit_config::IndicatorConfig;
use orientkit_core::{
    AlignmentDetector, AlignmentState, EulerAngles, OrientationState, Quaternion, TargetOrientation,
};
use serde::Serialize;
use tracing::debug;

use crate::readout::AngleReadout;
use crate::sampler::OrientationSampler;
use crate::source::RawOrientationSample;

/// Outward notification from a [`DeviceIndicator`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum IndicatorEvent {
    /// Throttled orientation update
    OrientationChanged(OrientationState),
    /// Alignment flipped; only emitted on change
    AlignmentChanged { aligned: bool },
}

/// Orientation sampler wired to a hysteresis alignment detector.
///
/// Alignment is evaluated on each throttled orientation notification, using
/// the distance between the latest quaternion and the target's reference.
#[derive(Debug, Clone)]
pub struct DeviceIndicator {
    config: IndicatorConfig,
    sampler: OrientationSampler,
    detector: AlignmentDetector,
    reference: Quaternion,
    is_aligned: bool,
}

impl Default for DeviceIndicator {
    fn default() -> Self {
        Self::new(IndicatorConfig::default())
    }
}

impl DeviceIndicator {
    /// Build an indicator; the config is clamped into its accepted ranges first
    pub fn new(config: IndicatorConfig) -> Self {
        let config = config.validated();
        Self {
            sampler: OrientationSampler::from_config(&config),
            detector: AlignmentDetector::new(config.hysteresis()),
            reference: config.target_orientation.reference(),
            is_aligned: false,
            config,
        }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    pub fn sampler(&self) -> &OrientationSampler {
        &self.sampler
    }

    /// Alignment as last reported through [`IndicatorEvent::AlignmentChanged`].
    ///
    /// After the tolerance or target changes this keeps the previously
    /// reported value until the next notification tick compares it with the
    /// rebuilt detector, so listeners only hear about real changes.
    pub fn is_aligned(&self) -> bool {
        self.is_aligned
    }

    /// Live detector state; starts over when the tolerance or target changes
    pub fn alignment(&self) -> AlignmentState {
        self.detector.state()
    }

    pub fn orientation(&self) -> OrientationState {
        self.sampler.orientation()
    }

    /// Smoothed angles for drawing the model at `now_ms`
    pub fn displayed(&self, now_ms: u64) -> EulerAngles {
        self.sampler.displayed(now_ms)
    }

    pub fn readout(&self) -> AngleReadout {
        AngleReadout::new(self.config.angle_precision, self.config.angle_format)
    }

    pub fn is_enabled(&self) -> bool {
        self.sampler.is_enabled()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        self.sampler.set_enabled(enabled);
    }

    /// Change the tolerance; the detector starts over with the new thresholds
    pub fn set_alignment_tolerance(&mut self, tolerance: f64) {
        self.config = IndicatorConfig {
            alignment_tolerance: tolerance,
            ..self.config.clone()
        }
        .validated();
        self.rebuild_detector();
    }

    /// Change the target orientation; the detector starts over
    pub fn set_target(&mut self, target: TargetOrientation) {
        self.config.target_orientation = target;
        self.reference = target.reference();
        self.rebuild_detector();
    }

    fn rebuild_detector(&mut self) {
        debug!(
            tolerance = self.config.alignment_tolerance,
            target = %self.config.target_orientation,
            "Rebuilding alignment detector"
        );
        self.detector = AlignmentDetector::new(self.config.hysteresis());
    }

    /// Process one sensor poll and return the events it produced
    pub fn tick(&mut self, sample: Option<RawOrientationSample>, now_ms: u64) -> Vec<IndicatorEvent> {
        let Some(state) = self.sampler.tick(sample, now_ms) else {
            return Vec::new();
        };

        let distance = self.sampler.quaternion().angular_distance(&self.reference);
        let alignment = self.detector.check(distance, state.timestamp);

        let mut events = vec![IndicatorEvent::OrientationChanged(state)];
        if alignment.is_aligned != self.is_aligned {
            self.is_aligned = alignment.is_aligned;
            events.push(IndicatorEvent::AlignmentChanged {
                aligned: alignment.is_aligned,
            });
        }
        events
    }
}

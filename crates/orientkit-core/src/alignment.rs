//! Hysteresis-based alignment detection
//!
//! Entering the aligned state requires the angular distance to drop to
//! `enter_threshold`; leaving it requires exceeding the wider
//! `exit_threshold`. The gap between the two is a dead zone in which the
//! current state is kept, so noise around a single boundary cannot make the
//! indicator flicker. On top of that, a state change is only applied once the
//! opposite verdict has been observed continuously for `min_stable_duration_ms`.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default exit threshold as a multiple of the enter threshold
pub const DEFAULT_EXIT_MULTIPLIER: f64 = 2.0;

/// Default debounce window
pub const DEFAULT_MIN_STABLE_DURATION_MS: u64 = 150;

/// Thresholds (degrees) and debounce window for an [`AlignmentDetector`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HysteresisConfig {
    pub enter_threshold: f64,
    pub exit_threshold: f64,
    pub min_stable_duration_ms: u64,
}

impl HysteresisConfig {
    /// Derive the exit threshold from a tolerance and a multiplier
    pub fn from_tolerance(tolerance: f64, exit_multiplier: f64, min_stable_duration_ms: u64) -> Self {
        Self {
            enter_threshold: tolerance,
            exit_threshold: tolerance * exit_multiplier,
            min_stable_duration_ms,
        }
    }

    /// `exit >= enter` and both non-negative. The detector does not check this.
    pub fn is_well_formed(&self) -> bool {
        self.enter_threshold >= 0.0 && self.exit_threshold >= self.enter_threshold
    }
}

impl Default for HysteresisConfig {
    fn default() -> Self {
        Self::from_tolerance(2.0, DEFAULT_EXIT_MULTIPLIER, DEFAULT_MIN_STABLE_DURATION_MS)
    }
}

/// Snapshot of an [`AlignmentDetector`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AlignmentState {
    pub is_aligned: bool,
    /// Most recent angular distance passed to `check`, in degrees
    pub deviation_angle: f64,
    /// Last time (ms) the state changed or was confirmed
    pub last_transition_time: u64,
}

/// Two-state (aligned / not aligned) debounced detector.
///
/// Owned by a single update path; not meant to be shared between callers.
#[derive(Debug, Clone)]
pub struct AlignmentDetector {
    config: HysteresisConfig,
    state: AlignmentState,
}

impl AlignmentDetector {
    pub fn new(config: HysteresisConfig) -> Self {
        Self {
            config,
            state: AlignmentState::default(),
        }
    }

    pub fn config(&self) -> &HysteresisConfig {
        &self.config
    }

    /// Feed one measurement and return the resulting state.
    ///
    /// When the verdict matches the current state the debounce timer restarts
    /// at `current_time_ms`, so only sustained deviation can flip the state.
    pub fn check(&mut self, angular_distance: f64, current_time_ms: u64) -> AlignmentState {
        self.state.deviation_angle = angular_distance;

        let threshold = if self.state.is_aligned {
            self.config.exit_threshold
        } else {
            self.config.enter_threshold
        };
        let within = angular_distance <= threshold;

        if within != self.state.is_aligned {
            let stable = current_time_ms
                .checked_sub(self.state.last_transition_time)
                .is_some_and(|elapsed| elapsed >= self.config.min_stable_duration_ms);

            if stable {
                self.state.is_aligned = within;
                self.state.last_transition_time = current_time_ms;
                debug!(
                    aligned = within,
                    deviation = angular_distance,
                    at_ms = current_time_ms,
                    "Alignment state changed"
                );
            }
        } else {
            self.state.last_transition_time = current_time_ms;
        }

        self.state
    }

    /// Return to the initial not-aligned state
    pub fn reset(&mut self) {
        self.state = AlignmentState::default();
    }

    /// Current state without updating
    pub fn state(&self) -> AlignmentState {
        self.state
    }
}

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::StabilizerError;

/// Default minimum decay applied when the device is near vertical.
pub const DEFAULT_MIN_DECAY: f64 = 0.15;

/// Default magnitude below which a gravity component reads as "flat".
pub const DEFAULT_FLAT_THRESHOLD: f64 = 0.2;

/// Default lower snap target for locked viewing, radians (~-179.6 deg).
pub const DEFAULT_MIN_LOCK_ANGLE: f64 = -0.209 * 15.0;

/// Default upper snap target for locked viewing, radians (~-119.7 deg).
pub const DEFAULT_MAX_LOCK_ANGLE: f64 = -0.209 * 10.0;

/// Default unlock animation window in seconds.
pub const DEFAULT_UNLOCK_DURATION: f64 = 1.0;

/// Configuration for the stabilizer pipeline.
///
/// Every constant the pipeline depends on is injected here so tests can
/// vary them; none live as hidden globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilizerConfig {
    /// Decay floor of the gravity filter (decay at zero horizontal tilt).
    pub min_decay: f64,
    /// Gravity component magnitude under which a sample is discarded as a
    /// flat reading.
    pub flat_threshold: f64,
    /// Lower boundary of the lock band and its snap target, radians.
    pub min_lock_angle: f64,
    /// Upper boundary of the lock band and its snap target, radians.
    pub max_lock_angle: f64,
    /// Length of the unlock animation window, seconds.
    pub unlock_duration: f64,
    /// Nominal gravity sampling rate, Hz (informational; the source's own
    /// interval is authoritative).
    pub sensor_rate_hz: f64,
    /// Unlock animation tick rate, Hz.
    pub animation_rate_hz: f64,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            min_decay: DEFAULT_MIN_DECAY,
            flat_threshold: DEFAULT_FLAT_THRESHOLD,
            min_lock_angle: DEFAULT_MIN_LOCK_ANGLE,
            max_lock_angle: DEFAULT_MAX_LOCK_ANGLE,
            unlock_duration: DEFAULT_UNLOCK_DURATION,
            sensor_rate_hz: 30.0,
            animation_rate_hz: 60.0,
        }
    }
}

impl StabilizerConfig {
    /// Midpoint of the lock band.
    pub fn lock_midpoint(&self) -> f64 {
        (self.min_lock_angle + self.max_lock_angle) / 2.0
    }

    /// Validate the configuration.
    ///
    /// The lock band must satisfy `min < midpoint < max` inside (-π, π),
    /// and every rate, threshold, and duration must be strictly positive.
    pub fn validate(&self) -> Result<(), StabilizerError> {
        let invalid = |msg: String| Err(StabilizerError::InvalidConfig(msg));

        if !(0.0..1.0).contains(&self.min_decay) {
            return invalid(format!("min_decay {} not in [0, 1)", self.min_decay));
        }
        if !(self.flat_threshold > 0.0 && self.flat_threshold.is_finite()) {
            return invalid(format!("flat_threshold {} must be positive", self.flat_threshold));
        }
        if self.min_lock_angle >= self.max_lock_angle {
            return invalid(format!(
                "lock band empty: min {} >= max {}",
                self.min_lock_angle, self.max_lock_angle
            ));
        }
        if self.min_lock_angle <= -PI || self.max_lock_angle >= PI {
            return invalid(format!(
                "lock band [{}, {}] outside (-pi, pi)",
                self.min_lock_angle, self.max_lock_angle
            ));
        }
        if !(self.unlock_duration > 0.0 && self.unlock_duration.is_finite()) {
            return invalid(format!("unlock_duration {} must be positive", self.unlock_duration));
        }
        if !(self.sensor_rate_hz > 0.0 && self.animation_rate_hz > 0.0) {
            return invalid(format!(
                "tick rates must be positive: sensor {} Hz, animation {} Hz",
                self.sensor_rate_hz, self.animation_rate_hz
            ));
        }
        Ok(())
    }
}

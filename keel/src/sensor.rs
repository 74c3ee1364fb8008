//! Gravity source abstraction.
//!
//! The stabilizer does not talk to platform sensor APIs directly; it is
//! handed anything that can produce screen-plane gravity samples on a fixed
//! cadence. Implementations may be backed by real device sensors, a
//! simulation profile, or a scripted mock.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// One screen-plane gravity reading.
///
/// Components are the device gravity vector projected onto the screen
/// plane, normalized to roughly [-1, 1] per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravitySample {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl GravitySample {
    /// Create a sample.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A "flat" reading: the device is lying nearly level, so the
    /// screen-plane gravity direction is ill-defined and the sample must
    /// be discarded.
    pub fn is_flat(&self, threshold: f64) -> bool {
        self.x.abs() < threshold && self.y.abs() < threshold
    }
}

/// Error type for gravity source operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensorError {
    /// The underlying sensor could not be started.
    #[error("gravity sensor unavailable: {0}")]
    Unavailable(String),
    /// The source was asked to deliver before `start()`.
    #[error("gravity source not started")]
    NotStarted,
}

/// Result type for gravity source operations.
pub type SensorResult<T> = Result<T, SensorError>;

/// Trait for anything that produces gravity samples on a schedule.
///
/// The engine polls `poll()` once per `sample_interval()` on its own
/// scheduling queue. A `None` return means the sensor had nothing for that
/// tick; the tick is skipped entirely, never treated as a zero reading.
pub trait GravitySource: Send {
    /// Begin producing samples.
    ///
    /// # Returns
    /// * `Ok(())` once the source is delivering
    /// * `Err(SensorError::Unavailable)` if the sensor cannot be started;
    ///   surfaced once, not retried
    fn start(&mut self) -> SensorResult<()>;

    /// Stop producing samples. Idempotent.
    fn stop(&mut self);

    /// Fixed sampling interval this source is driven at.
    fn sample_interval(&self) -> Duration;

    /// The sample for the current tick, or `None` if the sensor skipped
    /// this tick.
    fn poll(&mut self) -> Option<GravitySample>;
}

impl GravitySource for Box<dyn GravitySource> {
    fn start(&mut self) -> SensorResult<()> {
        (**self).start()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn sample_interval(&self) -> Duration {
        (**self).sample_interval()
    }

    fn poll(&mut self) -> Option<GravitySample> {
        (**self).poll()
    }
}

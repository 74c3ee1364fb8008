use keel_math::FitError;
use thiserror::Error;

use crate::sensor::SensorError;

/// Errors produced by the stabilizer and its engine.
#[derive(Error, Debug)]
pub enum StabilizerError {
    /// Surface dimensions would produce a degenerate scale factor.
    #[error(transparent)]
    InvalidDimensions(#[from] FitError),

    /// The gravity source could not be started.
    #[error("sensor error: {0}")]
    Sensor(#[from] SensorError),

    /// Configuration validation failure.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `start()` was called while the engine is already delivering ticks.
    #[error("engine is already running")]
    AlreadyRunning,

    /// The engine already ran once and handed its gravity source to the
    /// worker; create a new engine to run again.
    #[error("gravity source already consumed by a previous run")]
    SourceExhausted,
}

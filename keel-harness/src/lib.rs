//! Test and demo support for the KEEL stabilizer
//!
//! Provides simulated handheld tilt motions and a gravity source that
//! replays them at a fixed rate, for exercising the engine without device
//! sensors.

pub mod scripted_source;
pub mod tilt_profiles;

pub use scripted_source::ProfileGravitySource;
pub use tilt_profiles::{TestTilts, TiltMotion};

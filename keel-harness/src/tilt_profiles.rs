//! Simulated handheld tilt motions for stabilizer testing
//!
//! Provides various device tilt functions for exercising the pipeline,
//! including steady holds, sinusoidal sway, slow twists, and face-up
//! (flat) stretches.

use keel::GravitySample;
use std::f64::consts::PI;
use std::time::Duration;

/// Gravity sample whose raw tilt angle (`atan2(x, y) - π`) equals
/// `raw_angle`, as a unit vector.
fn sample_at_angle(raw_angle: f64) -> GravitySample {
    let theta = raw_angle + PI;
    GravitySample::new(theta.sin(), theta.cos())
}

/// Trait for simulated tilt motion functions
pub trait TiltMotion: Send + Sync {
    /// Screen-plane gravity at the given time
    fn gravity_at(&self, t: Duration) -> GravitySample;

    /// Get motion description
    fn description(&self) -> &str;
}

/// Steady hold at a fixed tilt angle (no motion)
pub struct SteadyTilt {
    raw_angle: f64,
}

impl SteadyTilt {
    pub fn new(raw_angle: f64) -> Self {
        Self { raw_angle }
    }
}

impl TiltMotion for SteadyTilt {
    fn gravity_at(&self, _t: Duration) -> GravitySample {
        sample_at_angle(self.raw_angle)
    }

    fn description(&self) -> &str {
        "Steady hold (no motion)"
    }
}

/// Sinusoidal sway around a base tilt angle
pub struct SwayingTilt {
    base_angle: f64,
    amplitude_rad: f64,
    period_sec: f64,
}

impl SwayingTilt {
    pub fn new(base_angle: f64, amplitude_rad: f64, period_sec: f64) -> Self {
        Self {
            base_angle,
            amplitude_rad,
            period_sec,
        }
    }
}

impl TiltMotion for SwayingTilt {
    fn gravity_at(&self, t: Duration) -> GravitySample {
        let phase = 2.0 * PI * t.as_secs_f64() / self.period_sec;
        sample_at_angle(self.base_angle + self.amplitude_rad * phase.sin())
    }

    fn description(&self) -> &str {
        "Sinusoidal sway"
    }
}

/// Slow continuous twist at a constant angular rate
pub struct TwistingTilt {
    start_angle: f64,
    rate_rad_per_sec: f64,
}

impl TwistingTilt {
    pub fn new(start_angle: f64, rate_rad_per_sec: f64) -> Self {
        Self {
            start_angle,
            rate_rad_per_sec,
        }
    }
}

impl TiltMotion for TwistingTilt {
    fn gravity_at(&self, t: Duration) -> GravitySample {
        sample_at_angle(self.start_angle + self.rate_rad_per_sec * t.as_secs_f64())
    }

    fn description(&self) -> &str {
        "Slow continuous twist"
    }
}

/// Device lying face up: every reading is flat and gets discarded
pub struct FaceUp;

impl TiltMotion for FaceUp {
    fn gravity_at(&self, _t: Duration) -> GravitySample {
        GravitySample::new(0.05, 0.02)
    }

    fn description(&self) -> &str {
        "Face up (flat readings)"
    }
}

/// Collection of standard test tilts
pub struct TestTilts {
    /// Base tilt angle shared by the named motions, radians
    pub base_angle: f64,
}

impl TestTilts {
    pub fn new(base_angle: f64) -> Self {
        Self { base_angle }
    }

    /// Get all standard test motions
    pub fn all_motions(&self) -> Vec<Box<dyn TiltMotion>> {
        vec![
            Box::new(SteadyTilt::new(self.base_angle)),
            Box::new(SwayingTilt::new(self.base_angle, 0.4, 4.0)),
            Box::new(TwistingTilt::new(self.base_angle, 0.25)),
            Box::new(FaceUp),
        ]
    }

    /// Get motion by name
    pub fn get_motion(&self, name: &str) -> Option<Box<dyn TiltMotion>> {
        match name.to_lowercase().as_str() {
            "steady" => Some(Box::new(SteadyTilt::new(self.base_angle))),
            "sway" => Some(Box::new(SwayingTilt::new(self.base_angle, 0.4, 4.0))),
            "twist" => Some(Box::new(TwistingTilt::new(self.base_angle, 0.25))),
            "faceup" => Some(Box::new(FaceUp)),
            _ => None,
        }
    }
}

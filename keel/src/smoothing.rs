//! Adaptive exponential smoothing of gravity samples.

use crate::sensor::GravitySample;

/// Smoothed screen-plane gravity, the filter's per-tick output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedGravity {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

/// Exponential decay filter with tilt-adaptive gain.
///
/// The decay factor grows with the horizontal tilt magnitude, so large,
/// confident tilts track quickly while near-vertical readings move the
/// state slowly. The smoothed state starts at the (-1, -1) warm-up
/// sentinel; the first real sample blends against that nonphysical value,
/// which is retained source behavior rather than a clean cold start.
#[derive(Debug, Clone)]
pub struct GravityFilter {
    min_decay: f64,
    smoothed: SmoothedGravity,
}

impl GravityFilter {
    /// Warm-up sentinel for the smoothed state before any sample arrives.
    pub const WARMUP_SENTINEL: f64 = -1.0;

    /// Create a filter with the given decay floor.
    pub fn new(min_decay: f64) -> Self {
        Self {
            min_decay,
            smoothed: SmoothedGravity {
                x: Self::WARMUP_SENTINEL,
                y: Self::WARMUP_SENTINEL,
            },
        }
    }

    /// Decay factor for a given horizontal component.
    ///
    /// `min_decay` at `x = 0`, rising linearly to 1.0 at `|x| = 1`.
    pub fn decay_for(&self, x: f64) -> f64 {
        self.min_decay + x.abs() * (1.0 - self.min_decay)
    }

    /// Blend a sample into the smoothed state and return the new state.
    pub fn update(&mut self, sample: GravitySample) -> SmoothedGravity {
        let decay = self.decay_for(sample.x);
        self.smoothed = SmoothedGravity {
            x: sample.x * decay + self.smoothed.x * (1.0 - decay),
            y: sample.y * decay + self.smoothed.y * (1.0 - decay),
        };
        self.smoothed
    }

    /// Current smoothed state without updating it.
    pub fn smoothed(&self) -> SmoothedGravity {
        self.smoothed
    }
}

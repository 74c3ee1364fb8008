//! Common utilities for keel integration tests

use keel::GravitySample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

/// Gravity sample whose raw tilt angle (`atan2(x, y) - π`) equals
/// `raw_angle` exactly, as a unit vector.
pub fn sample_for_raw_angle(raw_angle: f64) -> GravitySample {
    let theta = raw_angle + PI;
    GravitySample::new(theta.sin(), theta.cos())
}

/// A run of samples around a base tilt with seeded Gaussian-ish jitter.
///
/// NOTE: not a realistic handheld motion trace; it only exists to confirm
/// the filter holds near the mean under per-axis noise.
pub fn noisy_samples(
    base_raw_angle: f64,
    count: usize,
    noise_std: f64,
    seed: u64,
) -> Vec<GravitySample> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let clean = sample_for_raw_angle(base_raw_angle);

    (0..count)
        .map(|_| {
            let jitter_x = rng.gen_range(-3.0..3.0) * noise_std / 3.0;
            let jitter_y = rng.gen_range(-3.0..3.0) * noise_std / 3.0;
            GravitySample::new(clean.x + jitter_x, clean.y + jitter_y)
        })
        .collect()
}

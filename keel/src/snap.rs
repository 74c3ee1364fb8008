//! Tilt angle derivation and lock-band snapping.

use std::f64::consts::PI;

use crate::smoothing::SmoothedGravity;

/// Instantaneous tilt angle from smoothed gravity, radians.
///
/// `atan2(x, y) - π`, so the result lies in (-2π, 0]; it is normalized
/// only when a transform is built from it.
pub fn raw_tilt_angle(smoothed: SmoothedGravity) -> f64 {
    smoothed.x.atan2(smoothed.y) - PI
}

/// Snap a raw angle to the nearer lock-band boundary.
///
/// Inside the band the angle snaps hard to `min_lock_angle` (lower half,
/// midpoint inclusive) or `max_lock_angle` (upper half). Outside the band
/// the tilt has moved past the snap range and the raw angle passes through
/// unchanged, so a locked surface still tracks live once pushed far enough.
pub fn snap_to_lock_band(raw_angle: f64, min_lock_angle: f64, max_lock_angle: f64) -> f64 {
    let midpoint = (min_lock_angle + max_lock_angle) / 2.0;
    if raw_angle > min_lock_angle && raw_angle <= midpoint {
        min_lock_angle
    } else if raw_angle > midpoint && raw_angle < max_lock_angle {
        max_lock_angle
    } else {
        raw_angle
    }
}

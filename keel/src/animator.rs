//! Unlock release animation.
//!
//! A fixed-window underdamped spring eases the displayed angle from the
//! snapped lock angle back to the live tilt angle. The curve constants are
//! kept bit-exact; they encode the intended bounce-then-settle feel, and
//! the reference table below pins them against drift.

use crate::state::UnlockContext;

/// Spring easing progress at time `t` (seconds).
///
/// `f(0) = 0` exactly and `f(t)` settles to 1 well inside the animation
/// window, overshooting on the way (peak ~1.32 near `t = 0.27`).
pub fn spring_progress(t: f64) -> f64 {
    let envelope = -(-6.0 * t).exp2() / 2.0;
    envelope * (-2.0 * (6.0 * t).exp2() + (12.0 * t).sin() + 2.0 * (12.0 * t).cos())
}

/// Displayed angle at `elapsed` seconds into an unlock animation, radians.
pub fn sample(context: &UnlockContext, elapsed: f64) -> f64 {
    context.initial_angle + context.delta_angle * spring_progress(elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Reference values for the spring curve, f64 evaluation of the
    /// closed form at fixed times.
    #[rustfmt::skip]
    const SPRING_REFERENCE: [(f64, f64); 13] = [
        (0.05, 1.003030679416519e-01),
        (0.10, 4.534748014482405e-01),
        (0.15, 8.608185760300819e-01),
        (0.20, 1.173963044139078e+00),
        (0.25, 1.325068475169930e+00),
        (0.30, 1.321066542576365e+00),
        (0.40, 1.077790992692491e+00),
        (0.50, 8.974421828061371e-01),
        (0.60, 9.171031322192507e-01),
        (0.70, 1.005005078121270e+00),
        (0.80, 1.038476055110864e+00),
        (0.90, 1.016218120404434e+00),
        (1.00, 9.910067578166832e-01),
    ];

    #[test]
    fn test_progress_starts_at_exact_zero() {
        assert_eq!(spring_progress(0.0), 0.0);
    }

    #[test]
    fn test_progress_matches_reference_table() {
        for (t, expected) in SPRING_REFERENCE.iter() {
            assert_relative_eq!(spring_progress(*t), *expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_progress_settles_near_one_after_first_bounce() {
        let mut t = 0.3;
        while t <= 1.0 {
            assert!(
                (spring_progress(t) - 1.0).abs() <= 0.33,
                "progress strayed from 1 at t={t}"
            );
            t += 0.01;
        }
    }

    #[test]
    fn test_sample_interpolates_context() {
        let context = UnlockContext {
            start_time: 0.0,
            initial_angle: -3.135,
            delta_angle: 1.935,
        };
        // At t=0 the displayed angle is exactly the captured initial angle
        assert_eq!(sample(&context, 0.0), -3.135);
        // Near the end of the window it has essentially reached the target
        let settled = sample(&context, 1.0);
        assert_relative_eq!(settled, -3.135 + 1.935, epsilon = 0.02);
    }

    #[test]
    fn test_zero_delta_holds_initial_angle() {
        let context = UnlockContext {
            start_time: 0.0,
            initial_angle: -1.7,
            delta_angle: 0.0,
        };
        for i in 0..10 {
            assert_eq!(sample(&context, i as f64 * 0.1), -1.7);
        }
    }
}

//! End-to-end pipeline scenarios driven through the stabilizer core with
//! injected time.

mod common;

use approx::assert_relative_eq;
use common::{noisy_samples, sample_for_raw_angle};
use keel::{
    GravitySample, LockState, Stabilizer, StabilizerConfig, StabilizerEvent, SurfaceGeometry,
};
use keel_math::Extent;
use std::f64::consts::PI;

fn phone_geometry() -> SurfaceGeometry {
    SurfaceGeometry::new(Extent::new(390.0, 200.0), Extent::new(1280.0, 720.0))
}

fn new_stabilizer() -> Stabilizer {
    let _ = env_logger::builder().is_test(true).try_init();
    Stabilizer::new(StabilizerConfig::default(), phone_geometry()).unwrap()
}

#[test]
fn steady_tilt_converges_to_its_raw_angle() {
    let mut stabilizer = new_stabilizer();
    let sample = GravitySample::new(0.6, 0.1);

    let mut last = None;
    for _ in 0..30 {
        if let Some(transform) = stabilizer.process_event(StabilizerEvent::Sample(sample)) {
            last = Some(transform);
        }
    }

    let transform = last.expect("steady tilt should emit transforms");
    let expected = (0.6f64).atan2(0.1) - PI;
    assert_relative_eq!(transform.rotation, expected, epsilon = 1e-6);
    assert_relative_eq!(transform.scale_x, 0.5799630941050103, epsilon = 1e-6);
    assert_eq!(transform.scale_x, transform.scale_y);
}

#[test]
fn lock_snaps_an_in_band_tilt_to_the_lower_target() {
    let mut stabilizer = new_stabilizer();
    let config = StabilizerConfig::default();

    // Settle in Free on a tilt above the band
    let free_sample = sample_for_raw_angle(-0.5);
    for _ in 0..40 {
        stabilizer.process_event(StabilizerEvent::Sample(free_sample));
    }
    assert_relative_eq!(stabilizer.last_display_angle().unwrap(), -0.5, epsilon = 1e-6);

    stabilizer.process_event(StabilizerEvent::Lock);
    assert_eq!(stabilizer.lock_state(), &LockState::Locked);

    // Tilt into the lower half of the lock band
    let banded_sample = sample_for_raw_angle(-3.0);
    let mut last = None;
    for _ in 0..40 {
        if let Some(transform) = stabilizer.process_event(StabilizerEvent::Sample(banded_sample)) {
            last = Some(transform);
        }
    }

    assert_relative_eq!(
        last.unwrap().rotation,
        config.min_lock_angle,
        epsilon = 1e-12
    );
}

#[test]
fn unlock_releases_from_the_snap_angle_to_live_tracking() {
    let mut stabilizer = new_stabilizer();
    let config = StabilizerConfig::default();

    // Locked and snapped to the lower target
    stabilizer.process_event(StabilizerEvent::Lock);
    for _ in 0..40 {
        stabilizer.process_event(StabilizerEvent::Sample(sample_for_raw_angle(-3.0)));
    }
    assert_eq!(
        stabilizer.last_display_angle().unwrap(),
        config.min_lock_angle
    );

    // The device has meanwhile tilted well out of the band
    stabilizer.process_event(StabilizerEvent::Unlock { now: 2.0 });
    for _ in 0..40 {
        stabilizer.process_event(StabilizerEvent::Sample(sample_for_raw_angle(-1.2)));
    }
    assert!(stabilizer.lock_state().is_unlocking());

    // At elapsed zero the animation holds the captured angle exactly
    let at_start = stabilizer
        .process_event(StabilizerEvent::AnimationTick { now: 2.0 })
        .unwrap();
    assert_relative_eq!(at_start.rotation, config.min_lock_angle, epsilon = 1e-12);

    // Past the window the state is Free and the live raw angle shows
    let past_window = stabilizer
        .process_event(StabilizerEvent::AnimationTick { now: 3.5 })
        .unwrap();
    assert_eq!(stabilizer.lock_state(), &LockState::Free);
    let live = stabilizer.last_raw_angle().unwrap();
    assert_relative_eq!(past_window.rotation, live, epsilon = 1e-9);
    assert_relative_eq!(live, -1.2, epsilon = 1e-6);
}

#[test]
fn mid_animation_display_blends_between_capture_and_target() {
    let mut stabilizer = new_stabilizer();
    let config = StabilizerConfig::default();

    stabilizer.process_event(StabilizerEvent::Lock);
    for _ in 0..40 {
        stabilizer.process_event(StabilizerEvent::Sample(sample_for_raw_angle(-3.0)));
    }
    stabilizer.process_event(StabilizerEvent::Unlock { now: 0.0 });
    for _ in 0..40 {
        stabilizer.process_event(StabilizerEvent::Sample(sample_for_raw_angle(-1.2)));
    }

    // Half way in, the display has left the capture angle but the state
    // machine is still animating
    let midway = stabilizer
        .process_event(StabilizerEvent::AnimationTick { now: 0.5 })
        .unwrap();
    assert!(stabilizer.lock_state().is_unlocking());
    assert!(midway.rotation > config.min_lock_angle);
    // delta was captured at unlock time (raw -3.0), so the animation
    // settles toward that capture, not the newer -1.2 tilt
    assert!(midway.rotation < -1.2);
}

#[test]
fn noisy_tilt_holds_near_the_mean_angle() {
    let mut stabilizer = new_stabilizer();
    let base = -1.9;

    let mut last = None;
    for sample in noisy_samples(base, 120, 0.05, 42) {
        if let Some(transform) = stabilizer.process_event(StabilizerEvent::Sample(sample)) {
            last = Some(transform);
        }
    }

    assert_relative_eq!(last.unwrap().rotation, base, epsilon = 0.1);
}

#[test]
fn flat_stretch_keeps_the_last_transform_as_known_good() {
    let mut stabilizer = new_stabilizer();
    for _ in 0..40 {
        stabilizer.process_event(StabilizerEvent::Sample(GravitySample::new(0.6, 0.1)));
    }
    let settled = stabilizer.last_display_angle().unwrap();

    // Device laid flat: every tick is discarded, nothing is emitted
    for _ in 0..20 {
        let emitted =
            stabilizer.process_event(StabilizerEvent::Sample(GravitySample::new(0.05, -0.1)));
        assert!(emitted.is_none());
    }
    assert_eq!(stabilizer.last_display_angle().unwrap(), settled);
}

#[test]
fn diagnostics_count_emitted_angles_and_reset_on_read() {
    let mut stabilizer = new_stabilizer();
    for _ in 0..25 {
        stabilizer.process_event(StabilizerEvent::Sample(GravitySample::new(0.6, 0.1)));
    }

    let snapshot = stabilizer.take_diagnostics();
    assert_eq!(snapshot.sample_count, 25);
    let mean = snapshot.mean_angle_degrees.unwrap();
    assert!((0.0..360.0).contains(&mean));
    // Settled around atan2(0.6, 0.1) - pi, i.e. ~260.5 degrees
    assert_relative_eq!(mean, 260.5, epsilon = 15.0);

    assert_eq!(stabilizer.take_diagnostics().sample_count, 0);
}

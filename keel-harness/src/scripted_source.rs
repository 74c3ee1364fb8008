//! Gravity source that replays a tilt motion at a fixed rate.

use keel::sensor::{GravitySample, GravitySource, SensorResult};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

use crate::tilt_profiles::TiltMotion;

/// Replays a [`TiltMotion`] as a gravity source.
///
/// Time advances one sample interval per poll, independent of wall clock,
/// so replays are deterministic. Optional seeded dropout returns `None`
/// for a fraction of ticks to exercise the nullable-sample contract.
pub struct ProfileGravitySource {
    motion: Box<dyn TiltMotion>,
    interval: Duration,
    tick: u64,
    started: bool,
    dropout: Option<(f64, ChaCha8Rng)>,
}

impl ProfileGravitySource {
    /// Create a source replaying `motion` at `rate_hz`.
    pub fn new(motion: Box<dyn TiltMotion>, rate_hz: f64) -> Self {
        Self {
            motion,
            interval: Duration::from_secs_f64(1.0 / rate_hz),
            tick: 0,
            started: false,
            dropout: None,
        }
    }

    /// Drop roughly `rate` of all ticks (0.0 to 1.0), seeded.
    pub fn with_dropout(mut self, rate: f64, seed: u64) -> Self {
        self.dropout = Some((rate, ChaCha8Rng::seed_from_u64(seed)));
        self
    }

    /// Simulated time of the next sample.
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.interval.as_secs_f64() * self.tick as f64)
    }
}

impl GravitySource for ProfileGravitySource {
    fn start(&mut self) -> SensorResult<()> {
        log::info!("Replaying tilt profile: {}", self.motion.description());
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.started = false;
    }

    fn sample_interval(&self) -> Duration {
        self.interval
    }

    fn poll(&mut self) -> Option<GravitySample> {
        if !self.started {
            return None;
        }
        let t = self.elapsed();
        self.tick += 1;

        if let Some((rate, rng)) = self.dropout.as_mut() {
            if rng.gen::<f64>() < *rate {
                return None;
            }
        }
        Some(self.motion.gravity_at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilt_profiles::{SteadyTilt, TwistingTilt};

    #[test]
    fn test_poll_advances_simulated_time() {
        let mut source = ProfileGravitySource::new(Box::new(TwistingTilt::new(-2.0, 0.25)), 10.0);
        source.start().unwrap();

        let first = source.poll().unwrap();
        let second = source.poll().unwrap();
        assert_ne!(first, second);
        assert_eq!(source.elapsed(), Duration::from_millis(200));
    }

    #[test]
    fn test_not_started_yields_nothing() {
        let mut source = ProfileGravitySource::new(Box::new(SteadyTilt::new(-1.7)), 30.0);
        assert!(source.poll().is_none());
        source.start().unwrap();
        assert!(source.poll().is_some());
        source.stop();
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_dropout_skips_a_fraction_of_ticks() {
        let mut source = ProfileGravitySource::new(Box::new(SteadyTilt::new(-1.7)), 30.0)
            .with_dropout(0.5, 7);
        source.start().unwrap();

        let delivered = (0..1000).filter(|_| source.poll().is_some()).count();
        assert!((300..700).contains(&delivered), "delivered {delivered}");
    }

    #[test]
    fn test_no_dropout_delivers_every_tick() {
        let mut source = ProfileGravitySource::new(Box::new(SteadyTilt::new(-1.7)), 30.0);
        source.start().unwrap();
        assert!((0..100).all(|_| source.poll().is_some()));
    }
}

//! Mock gravity source for testing

use crate::sensor::{GravitySample, GravitySource, SensorError, SensorResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock gravity source driven by a prerecorded script.
///
/// Each `poll()` consumes the next script entry; `None` entries exercise
/// the nullable-sample contract. With a single-entry script the source
/// repeats that entry forever; otherwise a drained script keeps returning
/// `None`.
pub struct MockGravitySource {
    script: Vec<Option<GravitySample>>,
    cursor: Arc<Mutex<usize>>,
    started: Arc<AtomicBool>,
    interval: Duration,
    fail_to_start: bool,
}

impl MockGravitySource {
    /// Create a mock source with a prerecorded script.
    pub fn new(script: Vec<Option<GravitySample>>) -> Self {
        Self {
            script,
            cursor: Arc::new(Mutex::new(0)),
            started: Arc::new(AtomicBool::new(false)),
            interval: Duration::from_millis(33),
            fail_to_start: false,
        }
    }

    /// Create a mock source that returns the same sample forever.
    pub fn new_repeating(sample: GravitySample) -> Self {
        Self::new(vec![Some(sample)])
    }

    /// Create a mock source whose `start()` fails.
    pub fn new_unavailable() -> Self {
        Self {
            fail_to_start: true,
            ..Self::new(Vec::new())
        }
    }

    /// Override the sampling interval (default 33 ms, ~30 Hz).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Whether `start()` has been called without a matching `stop()`.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Number of polls consumed so far.
    pub fn polled(&self) -> usize {
        *self.cursor.lock().unwrap()
    }
}

impl GravitySource for MockGravitySource {
    fn start(&mut self) -> SensorResult<()> {
        if self.fail_to_start {
            return Err(SensorError::Unavailable("mock configured to fail".to_string()));
        }
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) {
        self.started.store(false, Ordering::SeqCst);
    }

    fn sample_interval(&self) -> Duration {
        self.interval
    }

    fn poll(&mut self) -> Option<GravitySample> {
        if !self.started.load(Ordering::SeqCst) {
            return None;
        }

        let mut cursor = self.cursor.lock().unwrap();
        *cursor += 1;

        if self.script.len() == 1 {
            return self.script[0];
        }
        self.script.get(*cursor - 1).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeating_mode() {
        let sample = GravitySample::new(0.6, 0.1);
        let mut source = MockGravitySource::new_repeating(sample);
        source.start().unwrap();
        for _ in 0..5 {
            assert_eq!(source.poll(), Some(sample));
        }
    }

    #[test]
    fn test_script_consumed_in_order_then_drained() {
        let mut source = MockGravitySource::new(vec![
            Some(GravitySample::new(0.5, 0.5)),
            None,
            Some(GravitySample::new(0.7, 0.2)),
        ]);
        source.start().unwrap();
        assert_eq!(source.poll(), Some(GravitySample::new(0.5, 0.5)));
        assert_eq!(source.poll(), None);
        assert_eq!(source.poll(), Some(GravitySample::new(0.7, 0.2)));
        assert_eq!(source.poll(), None);
        assert_eq!(source.polled(), 4);
    }

    #[test]
    fn test_poll_before_start_yields_nothing() {
        let mut source = MockGravitySource::new_repeating(GravitySample::new(0.6, 0.1));
        assert_eq!(source.poll(), None);
    }

    #[test]
    fn test_unavailable_source_fails_start() {
        let mut source = MockGravitySource::new_unavailable();
        assert!(matches!(source.start(), Err(SensorError::Unavailable(_))));
    }
}

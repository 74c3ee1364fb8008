//! Rotation diagnostics counter.
//!
//! Accumulates the displayed angles the pipeline produced since the last
//! snapshot. Reset-on-read: each `take()` starts a fresh accumulation
//! window.

use std::collections::HashMap;

/// Number of ten-degree histogram buckets over [0, 360).
pub const HISTOGRAM_BUCKETS: usize = 36;

/// Snapshot of the rotation counter, produced by `take()`.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsSnapshot {
    /// Displayed angles recorded in the window.
    pub sample_count: u64,
    /// Mean displayed angle in degrees, `None` for an empty window.
    pub mean_angle_degrees: Option<f64>,
    /// Ten-degree angle buckets over [0, 360).
    pub histogram: [u64; HISTOGRAM_BUCKETS],
}

/// Accumulates displayed angles between snapshots.
#[derive(Debug, Clone)]
pub struct RotationCounter {
    sample_count: u64,
    angle_sum_degrees: f64,
    histogram: [u64; HISTOGRAM_BUCKETS],
}

impl Default for RotationCounter {
    fn default() -> Self {
        Self {
            sample_count: 0,
            angle_sum_degrees: 0.0,
            histogram: [0; HISTOGRAM_BUCKETS],
        }
    }
}

impl RotationCounter {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one displayed angle, degrees in [0, 360).
    pub fn record(&mut self, angle_degrees: f64) {
        let bucket = ((angle_degrees / 10.0) as usize).min(HISTOGRAM_BUCKETS - 1);
        self.histogram[bucket] += 1;
        self.angle_sum_degrees += angle_degrees;
        self.sample_count += 1;
    }

    /// Current counts as a key/value property map.
    pub fn tracking_properties(&self) -> HashMap<String, f64> {
        let mut properties = HashMap::new();
        properties.insert("sample_count".to_string(), self.sample_count as f64);
        if self.sample_count > 0 {
            properties.insert(
                "mean_angle_deg".to_string(),
                self.angle_sum_degrees / self.sample_count as f64,
            );
            let peak = self
                .histogram
                .iter()
                .enumerate()
                .max_by_key(|(_, count)| **count)
                .map(|(bucket, _)| bucket as f64 * 10.0)
                .unwrap_or(0.0);
            properties.insert("peak_bucket_deg".to_string(), peak);
        }
        properties
    }

    /// Snapshot and reset.
    pub fn take(&mut self) -> DiagnosticsSnapshot {
        let snapshot = DiagnosticsSnapshot {
            sample_count: self.sample_count,
            mean_angle_degrees: (self.sample_count > 0)
                .then(|| self.angle_sum_degrees / self.sample_count as f64),
            histogram: self.histogram,
        };
        *self = Self::default();
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_record_and_take() {
        let mut counter = RotationCounter::new();
        counter.record(90.0);
        counter.record(100.0);
        counter.record(95.0);

        let snapshot = counter.take();
        assert_eq!(snapshot.sample_count, 3);
        assert_relative_eq!(snapshot.mean_angle_degrees.unwrap(), 95.0, epsilon = 1e-12);
        assert_eq!(snapshot.histogram[9], 2); // 90.0 and 95.0
        assert_eq!(snapshot.histogram[10], 1); // 100.0
    }

    #[test]
    fn test_take_resets() {
        let mut counter = RotationCounter::new();
        counter.record(10.0);
        let _ = counter.take();

        let empty = counter.take();
        assert_eq!(empty.sample_count, 0);
        assert_eq!(empty.mean_angle_degrees, None);
        assert!(empty.histogram.iter().all(|count| *count == 0));
    }

    #[test]
    fn test_bucket_edges() {
        let mut counter = RotationCounter::new();
        counter.record(0.0);
        counter.record(9.999);
        counter.record(10.0);
        counter.record(359.999);

        let snapshot = counter.take();
        assert_eq!(snapshot.histogram[0], 2);
        assert_eq!(snapshot.histogram[1], 1);
        assert_eq!(snapshot.histogram[35], 1);
    }

    #[test]
    fn test_tracking_properties() {
        let mut counter = RotationCounter::new();
        assert_eq!(counter.tracking_properties()["sample_count"], 0.0);

        counter.record(260.0);
        counter.record(262.0);
        let properties = counter.tracking_properties();
        assert_eq!(properties["sample_count"], 2.0);
        assert_relative_eq!(properties["mean_angle_deg"], 261.0, epsilon = 1e-12);
        assert_eq!(properties["peak_bucket_deg"], 260.0);
    }
}

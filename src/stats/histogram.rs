//! Allocation size histogram using HdrHistogram
//!
//! Records the byte size of every allocation so the shape produced by the
//! configured trend/distribution can be checked after a run.

use hdrhistogram::Histogram;

/// Largest trackable block size (1 TiB); larger values are clamped.
const MAX_TRACKABLE_SIZE: u64 = 1 << 40;

/// Allocation size histogram wrapper
///
/// Configured for 1 byte to 1 TiB with 3 significant digits, so reported
/// percentiles are within 0.1% of the recorded sizes.
#[derive(Debug, Clone)]
pub struct SizeHistogram {
    histogram: Histogram<u64>,
}

impl SizeHistogram {
    /// Create an empty histogram
    pub fn new() -> Self {
        let histogram = Histogram::new_with_bounds(1, MAX_TRACKABLE_SIZE, 3)
            .expect("static histogram bounds are valid");

        Self { histogram }
    }

    /// Record one allocation of `size` bytes
    #[inline]
    pub fn record(&mut self, size: usize) {
        let value = (size as u64).clamp(1, MAX_TRACKABLE_SIZE);
        self.histogram.saturating_record(value);
    }

    /// Size at `percentile` (0.0 - 100.0), or `None` if nothing was recorded
    pub fn percentile(&self, percentile: f64) -> Option<u64> {
        if self.histogram.is_empty() {
            return None;
        }
        Some(self.histogram.value_at_percentile(percentile))
    }

    /// Smallest recorded size
    pub fn min(&self) -> Option<u64> {
        (!self.histogram.is_empty()).then(|| self.histogram.min())
    }

    /// Largest recorded size
    pub fn max(&self) -> Option<u64> {
        (!self.histogram.is_empty()).then(|| self.histogram.max())
    }

    /// Mean recorded size
    pub fn mean(&self) -> f64 {
        self.histogram.mean()
    }

    /// Number of recorded allocations
    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    /// `true` if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }

    /// Clear all recorded values
    pub fn reset(&mut self) {
        self.histogram.reset();
    }
}

impl Default for SizeHistogram {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_histogram() {
        let hist = SizeHistogram::new();
        assert!(hist.is_empty());
        assert_eq!(hist.percentile(50.0), None);
        assert_eq!(hist.min(), None);
        assert_eq!(hist.max(), None);
    }

    #[test]
    fn test_record_and_query() {
        let mut hist = SizeHistogram::new();
        for size in [100, 200, 300, 400, 500] {
            hist.record(size);
        }
        assert_eq!(hist.len(), 5);
        assert_eq!(hist.min(), Some(100));
        assert_eq!(hist.max(), Some(500));
        let p50 = hist.percentile(50.0).unwrap();
        assert!((299..=301).contains(&p50), "p50 = {}", p50);
        assert!((hist.mean() - 300.0).abs() < 1.0);
    }

    #[test]
    fn test_zero_size_is_clamped() {
        let mut hist = SizeHistogram::new();
        hist.record(0);
        assert_eq!(hist.min(), Some(1));
    }

    #[test]
    fn test_reset() {
        let mut hist = SizeHistogram::new();
        hist.record(4096);
        hist.reset();
        assert!(hist.is_empty());
    }
}

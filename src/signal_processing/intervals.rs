use crate::series::{RPeakSequence, Sample, TimeSeries};

/// Converts R-peak sample positions into an RR-interval series.
///
/// Each output sample is stamped with the time of the beat that opens the
/// interval and holds the interval length in seconds.
pub struct IntervalExtractor {
    sample_rate: f64,
}

impl IntervalExtractor {
    /// # Arguments
    /// * `sample_rate` - ECG sampling frequency in Hz the peak indices refer to
    pub fn new(sample_rate: f64) -> Self {
        Self { sample_rate }
    }

    /// Returns an empty series when fewer than two peaks are given.
    pub fn process(&self, peaks: &RPeakSequence) -> TimeSeries {
        if peaks.len() < 2 {
            log::warn!(
                "Need at least 2 R-peaks to form an interval, got {}",
                peaks.len()
            );
            return TimeSeries::empty();
        }

        let samples = peaks
            .indices()
            .windows(2)
            .map(|w| {
                Sample::new(
                    w[0] as f64 / self.sample_rate,
                    (w[1] - w[0]) as f64 / self.sample_rate,
                )
            })
            .collect();

        TimeSeries::from_ordered(samples)
    }
}

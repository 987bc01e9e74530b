use crate::config::MeanFilterConfig;
use crate::series::{Sample, TimeSeries};

/// RR outlier rejection using a local mean
///
/// For every window of `window_len` intervals, the intervals lying strictly
/// inside the physiological bounds (excluding the centre one) are averaged.
/// The centre interval is kept only if it lies strictly within
/// `±tolerance` of that mean. Intervals that never sit at a window centre
/// (the first and last `window_len / 2`) are dropped, so the output is a
/// shorter subsequence of the input with gaps where outliers were removed.
pub struct MeanFilter {
    window_len: usize,
    min_rr: f64,
    max_rr: f64,
    tolerance: f64,
}

impl MeanFilter {
    pub fn new(config: &MeanFilterConfig) -> Self {
        Self {
            window_len: config.window_len,
            min_rr: config.min_rr_secs,
            max_rr: config.max_rr_secs,
            tolerance: config.tolerance,
        }
    }

    pub fn process(&self, rr: &TimeSeries) -> TimeSeries {
        let samples = rr.samples();
        if samples.len() < self.window_len {
            log::warn!(
                "Mean filter needs {} intervals, got {}",
                self.window_len,
                samples.len()
            );
            return TimeSeries::empty();
        }

        let center = self.window_len / 2;
        let mut kept: Vec<Sample> = Vec::with_capacity(samples.len());
        let mut degenerate = 0usize;

        for window in samples.windows(self.window_len) {
            let (sum, count) = window
                .iter()
                .enumerate()
                .filter(|&(j, s)| j != center && s.value > self.min_rr && s.value < self.max_rr)
                .fold((0.0, 0usize), |(sum, count), (_, s)| (sum + s.value, count + 1));

            if count == 0 {
                degenerate += 1;
                continue;
            }

            let local_mean = sum / count as f64;
            let candidate = window[center];
            if local_mean * (1.0 - self.tolerance) < candidate.value
                && local_mean * (1.0 + self.tolerance) > candidate.value
            {
                kept.push(candidate);
            }
        }

        if degenerate > 0 {
            log::debug!(
                "Mean filter skipped {} windows without in-range intervals",
                degenerate
            );
        }
        log::debug!("Mean filter kept {} of {} intervals", kept.len(), samples.len());

        TimeSeries::from_ordered(kept)
    }
}

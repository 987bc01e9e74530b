use crate::constants::MIN_NORMALIZATION_MEAN;
use crate::series::TimeSeries;
use rolling_stats::Stats;

/// Running statistics (count, mean, min, max) over the values of a series.
///
/// Returns `None` for an empty series.
pub fn series_stats(series: &TimeSeries) -> Option<Stats<f64>> {
    if series.is_empty() {
        return None;
    }
    let mut stats = Stats::new();
    for value in series.values() {
        stats.update(value);
    }
    Some(stats)
}

/// Rescales a series by its own mean, making it dimensionless.
pub struct Normalizer;

impl Normalizer {
    /// Divide every value by the series mean, in place.
    ///
    /// An empty series, or one whose mean is zero or not finite, is left
    /// untouched. Returns the mean that was applied.
    pub fn normalize(series: &mut TimeSeries) -> Option<f64> {
        let mean = series_stats(series)?.mean;
        if !mean.is_finite() || mean.abs() < MIN_NORMALIZATION_MEAN {
            log::warn!("Cannot normalize by mean {}", mean);
            return None;
        }
        series.scale_values(1.0 / mean);
        Some(mean)
    }
}

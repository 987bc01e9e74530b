use super::WindowFlag;
use crate::config::DetectorConfig;
use crate::error::{ApneaError, Result};
use crate::series::TimeSeries;
use crate::signal_processing::series_stats;
use serde::Serialize;

/// Amplitude and frequency limits a window is compared against
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    /// Minimum mean normalized amplitude of an apnea window
    pub amplitude: f64,
    /// Maximum mean instantaneous frequency of an apnea window, Hz
    pub frequency: f64,
}

/// Sliding-window apnea classifier
///
/// The amplitude threshold adapts to the recording: it is a linear function
/// of the midpoint between the smallest and largest normalized amplitude.
/// The frequency threshold is fixed. A window is apnea when its mean
/// amplitude is above the amplitude threshold and its mean frequency is
/// below the frequency threshold.
///
/// Window means use the boundary policy of the reference algorithm: the
/// samples from the window start up to the first sample at or beyond the
/// window length are summed, that boundary sample is then subtracted, and
/// the sum is divided by one less than the number of summed samples.
pub struct ApneaDetector {
    config: DetectorConfig,
}

impl ApneaDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Thresholds for a normalized amplitude series, `None` when it is empty.
    pub fn thresholds(&self, amplitude: &TimeSeries) -> Option<Thresholds> {
        let stats = series_stats(amplitude)?;
        let mid = (stats.max + stats.min) * 0.5;
        Some(Thresholds {
            amplitude: self.config.amp_offset + self.config.amp_slope * (mid + 1.0) * 0.5,
            frequency: self.config.freq_threshold_hz,
        })
    }

    /// Classify every analysis window.
    ///
    /// `amplitude` and `frequency` must be the same length and are read on
    /// the amplitude timestamps. Windows whose divisor would be zero or
    /// negative are skipped.
    pub fn detect(&self, amplitude: &TimeSeries, frequency: &TimeSeries) -> Result<Vec<WindowFlag>> {
        if amplitude.len() != frequency.len() {
            return Err(ApneaError::InvalidInput(format!(
                "amplitude has {} samples, frequency has {}",
                amplitude.len(),
                frequency.len()
            )));
        }

        let amp = amplitude.samples();
        let freq = frequency.samples();
        if amp.len() < 2 {
            log::warn!("Apnea detection needs at least 2 samples, got {}", amp.len());
            return Ok(Vec::new());
        }
        let Some(thresholds) = self.thresholds(amplitude) else {
            return Ok(Vec::new());
        };
        log::debug!(
            "Apnea thresholds: amplitude > {:.4}, frequency < {:.4} Hz",
            thresholds.amplitude,
            thresholds.frequency
        );

        let last = amp.len() - 1;
        let mut flags = Vec::with_capacity(amp.len());
        let mut skipped = 0usize;
        let mut start = 0usize;

        loop {
            let mut reached_end = false;
            let mut end = start;
            let mut sum_amp = 0.0;
            let mut sum_freq = 0.0;
            while amp[end].time - amp[start].time < self.config.window_secs {
                if end == last {
                    reached_end = true;
                    break;
                }
                sum_amp += amp[end].value;
                sum_freq += freq[end].value;
                end += 1;
            }
            sum_amp -= amp[end].value;
            sum_freq -= freq[end].value;

            let divisor = end as i64 - start as i64 - 1;
            if divisor > 0 {
                let mean_amp = sum_amp / divisor as f64;
                let mean_freq = sum_freq / divisor as f64;
                let is_apnea = mean_amp > thresholds.amplitude && mean_freq < thresholds.frequency;
                flags.push(WindowFlag::new(amp[start].time, is_apnea));
            } else {
                skipped += 1;
            }

            let window_start = start;
            while amp[start].time - amp[window_start].time < self.config.step_secs {
                if start == last {
                    reached_end = true;
                    break;
                }
                start += 1;
            }

            if reached_end {
                break;
            }
        }

        if skipped > 0 {
            log::debug!("Skipped {} analysis windows without samples", skipped);
        }
        Ok(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Sample;
    use approx::assert_relative_eq;

    fn uniform(n: usize, f: impl Fn(usize) -> f64) -> TimeSeries {
        TimeSeries::new((0..n).map(|i| Sample::new(i as f64, f(i))).collect()).unwrap()
    }

    #[test]
    fn test_threshold_formula() {
        let detector = ApneaDetector::new(&DetectorConfig::default());
        let amp = uniform(10, |i| if i == 3 { 0.5 } else if i == 7 { 1.5 } else { 1.0 });
        let thresholds = detector.thresholds(&amp).unwrap();
        // mid = 1.0 -> -0.555 + 1.3 * 2.0 * 0.5
        assert_relative_eq!(thresholds.amplitude, 0.745, epsilon = 1e-12);
        assert_eq!(thresholds.frequency, 0.06);
    }

    #[test]
    fn test_window_schedule() {
        let detector = ApneaDetector::new(&DetectorConfig::default());
        let amp = uniform(1000, |_| 1.0);
        let freq = uniform(1000, |_| 0.1);
        let flags = detector.detect(&amp, &freq).unwrap();

        let starts: Vec<f64> = flags.iter().map(|f| f.start_time).collect();
        // Starts every 60 s; the window starting at 720 s runs off the end
        assert_eq!(starts.len(), 13);
        assert_eq!(starts[0], 0.0);
        assert_eq!(starts[1], 60.0);
        assert_eq!(*starts.last().unwrap(), 720.0);
        assert!(flags.iter().all(|f| !f.is_apnea));
    }

    #[test]
    fn test_flags_high_amplitude_low_frequency() {
        let detector = ApneaDetector::new(&DetectorConfig::default());
        // Normalized amplitude 0.5 everywhere except a 2.0 plateau in 300..700
        let amp = uniform(1200, |i| if (300..700).contains(&i) { 2.0 } else { 0.5 });
        let freq = uniform(1200, |_| 0.03);
        let flags = detector.detect(&amp, &freq).unwrap();

        // threshold = -0.555 + 1.3 * 2.25 * 0.5 = 0.9075
        let positive: Vec<f64> = flags
            .iter()
            .filter(|f| f.is_apnea)
            .map(|f| f.start_time)
            .collect();
        assert!(positive.contains(&300.0));
        assert!(!positive.contains(&0.0));
        assert!(!positive.contains(&720.0));
    }

    #[test]
    fn test_boundary_policy() {
        let config = DetectorConfig {
            window_secs: 3.0,
            step_secs: 100.0,
            ..DetectorConfig::default()
        };
        let detector = ApneaDetector::new(&config);
        // Window 0: sums samples 0..3 (1+2+3), subtracts sample 3 (4), divides by 2
        let amp = uniform(6, |i| (i + 1) as f64);
        let freq = uniform(6, |_| 0.0);
        let flags = detector.detect(&amp, &freq).unwrap();
        assert_eq!(flags.len(), 1);
        // mean = (6 - 4) / 2 = 1.0; threshold = -0.555 + 1.3 * 4.5 * 0.5 = 2.37
        assert!(!flags[0].is_apnea);
    }

    #[test]
    fn test_degenerate_window_skipped() {
        let config = DetectorConfig {
            window_secs: 0.5,
            step_secs: 1.0,
            ..DetectorConfig::default()
        };
        let detector = ApneaDetector::new(&config);
        let amp = uniform(5, |_| 1.0);
        let freq = uniform(5, |_| 0.0);
        // Every window holds a single sample: divisor 0, nothing is emitted
        assert!(detector.detect(&amp, &freq).unwrap().is_empty());
    }

    #[test]
    fn test_length_mismatch() {
        let detector = ApneaDetector::new(&DetectorConfig::default());
        let result = detector.detect(&uniform(10, |_| 1.0), &uniform(9, |_| 1.0));
        assert!(matches!(result, Err(ApneaError::InvalidInput(_))));
    }

    #[test]
    fn test_too_short() {
        let detector = ApneaDetector::new(&DetectorConfig::default());
        let flags = detector.detect(&uniform(1, |_| 1.0), &uniform(1, |_| 1.0)).unwrap();
        assert!(flags.is_empty());
    }
}

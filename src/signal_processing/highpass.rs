use crate::series::{Sample, TimeSeries};

/// Single-pole IIR high-pass filter for RR baseline drift removal.
///
/// `y[i] = alpha * (y[i-1] + x[i] - x[i-1])` with `alpha = RC / (RC + dt)`
/// and `RC = 1 / (2π·cutoff)`. The first input sample only seeds the
/// difference, so the output is one sample shorter and starts at the
/// second input timestamp.
pub struct HighPassFilter {
    alpha: f64,
}

impl HighPassFilter {
    /// Create a filter with an explicit smoothing factor.
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }

    /// Create a filter for the given cutoff on a grid sampled at `sample_rate`.
    pub fn with_cutoff(sample_rate: f64, cutoff_hz: f64) -> Self {
        let rc = 1.0 / (2.0 * std::f64::consts::PI * cutoff_hz);
        let dt = 1.0 / sample_rate;
        Self::new(rc / (rc + dt))
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn process(&self, input: &TimeSeries) -> TimeSeries {
        let samples = input.samples();
        if samples.len() < 2 {
            return TimeSeries::empty();
        }

        let mut prev = 0.0;
        let out = samples
            .windows(2)
            .map(|w| {
                prev = self.alpha * (prev + w[1].value - w[0].value);
                Sample::new(w[1].time, prev)
            })
            .collect();

        TimeSeries::from_ordered(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(values: impl Iterator<Item = f64>) -> TimeSeries {
        TimeSeries::new(
            values
                .enumerate()
                .map(|(i, v)| Sample::new(i as f64, v))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_alpha_for_default_cutoff() {
        let filter = HighPassFilter::with_cutoff(1.0, 0.01);
        let rc = 1.0 / (0.02 * std::f64::consts::PI);
        assert!((filter.alpha() - rc / (rc + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_constant_input_decays() {
        let filter = HighPassFilter::with_cutoff(1.0, 0.01);
        // Step from 0 to a constant baseline, then hold
        let input = uniform((0..2000).map(|i| if i == 0 { 0.0 } else { 0.9 }));
        let out = filter.process(&input);

        assert_eq!(out.len(), 1999);
        assert_eq!(out.first().unwrap().time, 1.0);
        for sample in out.samples().iter().skip(1500) {
            assert!(sample.value.abs() < 1e-6, "Expected ~0, got {}", sample.value);
        }
    }

    #[test]
    fn test_passes_fast_oscillation() {
        let filter = HighPassFilter::with_cutoff(1.0, 0.01);
        let input = uniform((0..1000).map(|i| 1.0 + 0.1 * (i as f64 * 0.5).sin()));
        let out = filter.process(&input);

        let tail: Vec<f64> = out.values().skip(500).collect();
        let max = tail.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = tail.iter().cloned().fold(f64::INFINITY, f64::min);
        let amplitude = (max - min) / 2.0;
        assert!(
            (amplitude - 0.1).abs() < 0.02,
            "AC amplitude should be ~0.1, got {}",
            amplitude
        );
    }

    #[test]
    fn test_empty() {
        let filter = HighPassFilter::new(0.9);
        assert!(filter.process(&TimeSeries::empty()).is_empty());
    }
}

use crate::series::{Sample, TimeSeries};

/// Linear-interpolation resampler onto a uniform grid
///
/// The grid starts at the first input timestamp and advances by
/// `1 / rate_hz`. Each consecutive input pair contributes the grid instants
/// that fall before its second point; the grid cursor is shared across
/// segments, so the last input instant itself is generally not reproduced.
pub struct Resampler {
    rate_hz: f64,
}

impl Resampler {
    pub fn new(rate_hz: f64) -> Self {
        Self { rate_hz }
    }

    pub fn process(&self, input: &TimeSeries) -> TimeSeries {
        let samples = input.samples();
        if samples.len() < 2 {
            log::warn!("Resampling needs at least 2 samples, got {}", samples.len());
            return TimeSeries::empty();
        }

        let start = samples[0].time;
        let step = 1.0 / self.rate_hz;
        let expected = (input.duration() * self.rate_hz) as usize + 1;
        let mut out = Vec::with_capacity(expected);

        let mut k = 0usize;
        let mut x = start;
        for pair in samples.windows(2) {
            let (p1, p2) = (pair[0], pair[1]);
            if p2.time <= p1.time {
                continue;
            }

            let slope = (p2.value - p1.value) / (p2.time - p1.time);
            let intercept = p1.value - slope * p1.time;

            while x < p2.time {
                out.push(Sample::new(x, slope * x + intercept));
                k += 1;
                x = start + k as f64 * step;
            }
        }

        TimeSeries::from_ordered(out)
    }
}

use crate::series::{Sample, TimeSeries};

/// Simple moving average over a circular buffer
///
/// Keeps a running sum so each update is O(1) regardless of window size.
pub struct MovingAverage {
    buffer: Vec<f64>,
    index: usize,
    filled: bool,
    sum: f64,
}

impl MovingAverage {
    /// Create a new moving average filter
    ///
    /// # Arguments
    /// * `window_size` - Number of samples to average
    pub fn new(window_size: usize) -> Self {
        Self {
            buffer: vec![0.0; window_size.max(1)],
            index: 0,
            filled: false,
            sum: 0.0,
        }
    }

    /// Add a new value and return the updated average
    pub fn add(&mut self, value: f64) -> f64 {
        self.sum += value - self.buffer[self.index];
        self.buffer[self.index] = value;
        self.index = (self.index + 1) % self.buffer.len();

        if self.index == 0 {
            self.filled = true;
        }

        self.average()
    }

    /// Mean of the values currently in the window
    pub fn average(&self) -> f64 {
        let count = if self.filled {
            self.buffer.len()
        } else {
            self.index.max(1)
        };
        self.sum / count as f64
    }

}

/// Moving-average low-pass over a time series
///
/// Output at input index `i >= window_len` is the mean of the last
/// `window_len` inputs, stamped `window_len / 2` samples earlier so it sits
/// at the window centre. The first `window_len` inputs only fill the window.
pub struct LowPassFilter {
    window_len: usize,
}

impl LowPassFilter {
    pub fn new(window_len: usize) -> Self {
        Self {
            window_len: window_len.max(1),
        }
    }

    pub fn process(&self, input: &TimeSeries) -> TimeSeries {
        let samples = input.samples();
        let mut average = MovingAverage::new(self.window_len);
        let mut out = Vec::with_capacity(samples.len().saturating_sub(self.window_len));

        for (i, sample) in samples.iter().enumerate() {
            let mean = average.add(sample.value);
            if i < self.window_len {
                continue;
            }
            out.push(Sample::new(samples[i - self.window_len / 2].time, mean));
        }

        TimeSeries::from_ordered(out)
    }
}

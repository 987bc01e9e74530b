use crate::series::{Sample, TimeSeries};
use std::cmp::Ordering;
use std::collections::VecDeque;

/// Sorted view of the samples currently in a sliding window.
///
/// Entries are ordered by value and then by stream position, so evicting a
/// sample removes exactly that sample even when other samples in the window
/// carry the same value.
#[derive(Debug, Default)]
struct OrderedWindow {
    sorted: Vec<(f64, usize)>,
}

impl OrderedWindow {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            sorted: Vec::with_capacity(capacity),
        }
    }

    fn cmp_entry(a: &(f64, usize), b: &(f64, usize)) -> Ordering {
        a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
    }

    fn insert(&mut self, value: f64, position: usize) {
        let entry = (value, position);
        let at = self
            .sorted
            .binary_search_by(|probe| Self::cmp_entry(probe, &entry))
            .unwrap_or_else(|i| i);
        self.sorted.insert(at, entry);
    }

    fn remove(&mut self, value: f64, position: usize) {
        let entry = (value, position);
        if let Ok(at) = self
            .sorted
            .binary_search_by(|probe| Self::cmp_entry(probe, &entry))
        {
            self.sorted.remove(at);
        }
    }

    fn len(&self) -> usize {
        self.sorted.len()
    }

    fn median(&self) -> Option<f64> {
        let n = self.sorted.len();
        if n == 0 {
            return None;
        }
        if n % 2 == 0 {
            Some((self.sorted[n / 2 - 1].0 + self.sorted[n / 2].0) / 2.0)
        } else {
            Some(self.sorted[n / 2].0)
        }
    }
}

/// Sliding median filter
///
/// Emits one value per input sample once the window holds `window_len`
/// samples, so the first `window_len - 1` inputs produce no output. Output
/// `k` is stamped with input timestamp `k + window_len / 2`, the centre of
/// the window it summarises.
pub struct MedianFilter {
    window_len: usize,
}

impl MedianFilter {
    pub fn new(window_len: usize) -> Self {
        Self {
            window_len: window_len.max(1),
        }
    }

    pub fn process(&self, input: &TimeSeries) -> TimeSeries {
        let samples = input.samples();
        if samples.len() < self.window_len {
            log::warn!(
                "Median filter needs {} samples, got {}",
                self.window_len,
                samples.len()
            );
            return TimeSeries::empty();
        }

        let mut fifo: VecDeque<(f64, usize)> = VecDeque::with_capacity(self.window_len);
        let mut ordered = OrderedWindow::with_capacity(self.window_len);
        let mut out = Vec::with_capacity(samples.len() + 1 - self.window_len);

        for (i, sample) in samples.iter().enumerate() {
            fifo.push_back((sample.value, i));
            ordered.insert(sample.value, i);

            if fifo.len() > self.window_len
                && let Some((value, position)) = fifo.pop_front()
            {
                ordered.remove(value, position);
            }

            if ordered.len() < self.window_len {
                continue;
            }
            if let Some(median) = ordered.median() {
                let k = out.len();
                out.push(Sample::new(samples[k + self.window_len / 2].time, median));
            }
        }

        TimeSeries::from_ordered(out)
    }
}

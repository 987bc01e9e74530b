//! Paired time/value series and the R-peak input type.

use crate::error::{ApneaError, Result};
use serde::Serialize;

/// One sample of a [`TimeSeries`]: a timestamp in seconds and a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub time: f64,
    pub value: f64,
}

impl Sample {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Time series whose timestamps never decrease.
///
/// Every pipeline stage produces a fresh series. The only in-place
/// modification offered is [`TimeSeries::scale_values`], used by the
/// amplitude normalizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    samples: Vec<Sample>,
}

impl TimeSeries {
    /// Build a series, rejecting decreasing or non-finite timestamps.
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        if samples.iter().any(|s| !s.time.is_finite()) {
            return Err(ApneaError::InvalidInput(
                "timestamps must be finite".to_string(),
            ));
        }
        if let Some(pos) = samples.windows(2).position(|w| w[1].time < w[0].time) {
            return Err(ApneaError::InvalidInput(format!(
                "timestamps decrease at index {}",
                pos + 1
            )));
        }
        Ok(Self { samples })
    }

    /// Build a series from parallel timestamp and value slices.
    pub fn from_parts(times: &[f64], values: &[f64]) -> Result<Self> {
        if times.len() != values.len() {
            return Err(ApneaError::InvalidInput(format!(
                "{} timestamps for {} values",
                times.len(),
                values.len()
            )));
        }
        Self::new(
            times
                .iter()
                .zip(values)
                .map(|(&t, &v)| Sample::new(t, v))
                .collect(),
        )
    }

    /// Stages construct their output in timestamp order; this is only
    /// checked in debug builds.
    pub(crate) fn from_ordered(samples: Vec<Sample>) -> Self {
        debug_assert!(samples.windows(2).all(|w| w[0].time <= w[1].time));
        Self { samples }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.time)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.value)
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Time between the first and last sample, 0 for fewer than two samples.
    pub fn duration(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }

    /// Multiply every value by `factor`, keeping timestamps.
    pub fn scale_values(&mut self, factor: f64) {
        for sample in self.samples.iter_mut() {
            sample.value *= factor;
        }
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Detected R-peak positions, in samples, strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RPeakSequence {
    indices: Vec<u64>,
}

impl RPeakSequence {
    /// Validate and wrap a list of R-peak sample indices.
    ///
    /// Short sequences are accepted here; the interval extractor turns them
    /// into an empty series. Repeated or decreasing indices are rejected.
    pub fn new(indices: Vec<u64>) -> Result<Self> {
        if let Some(pos) = indices.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ApneaError::InvalidInput(format!(
                "R-peak indices must be strictly increasing (index {} is {} after {})",
                pos + 1,
                indices[pos + 1],
                indices[pos]
            )));
        }
        Ok(Self { indices })
    }

    pub fn indices(&self) -> &[u64] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

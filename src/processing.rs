use crate::apnea::{ApneaDetector, DetectionResult, EpisodeAggregator, Thresholds, WindowFlag};
use crate::config::ApneaConfig;
use crate::error::{ApneaError, Result};
use crate::series::{RPeakSequence, TimeSeries};
use crate::signal_processing::{
    HighPassFilter, HilbertTransformer, IntervalExtractor, LowPassFilter, MeanFilter,
    MedianFilter, Normalizer, Resampler,
};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared abort switch, checked between pipeline stages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ApneaError::Aborted)
        } else {
            Ok(())
        }
    }
}

/// Every intermediate series of one pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct StageTrace {
    pub intervals: TimeSeries,
    pub filtered_intervals: TimeSeries,
    pub resampled: TimeSeries,
    pub highpassed: TimeSeries,
    pub lowpassed: TimeSeries,
    pub raw_amplitude: TimeSeries,
    pub raw_frequency: TimeSeries,
    pub amplitude: TimeSeries,
    pub frequency: TimeSeries,
    pub normalization_mean: Option<f64>,
    pub thresholds: Option<Thresholds>,
    pub flags: Vec<WindowFlag>,
    pub result: DetectionResult,
}

/// RR-interval apnea pipeline for one channel at a time
///
/// Holds no per-run state, so a single processor can be shared by
/// independent channels.
pub struct ApneaProcessor {
    config: ApneaConfig,
}

impl ApneaProcessor {
    pub fn new(config: &ApneaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &ApneaConfig {
        &self.config
    }

    /// Run the full pipeline and return the detection result.
    pub fn process(&self, peaks: &RPeakSequence, sample_rate: f64) -> Result<DetectionResult> {
        self.process_with_cancel(peaks, sample_rate, &CancelToken::new())
    }

    /// Like [`ApneaProcessor::process`], returning [`ApneaError::Aborted`]
    /// once `cancel` is set.
    pub fn process_with_cancel(
        &self,
        peaks: &RPeakSequence,
        sample_rate: f64,
        cancel: &CancelToken,
    ) -> Result<DetectionResult> {
        Ok(self.trace_with_cancel(peaks, sample_rate, cancel)?.result)
    }

    /// Run the full pipeline keeping every intermediate series.
    pub fn trace(&self, peaks: &RPeakSequence, sample_rate: f64) -> Result<StageTrace> {
        self.trace_with_cancel(peaks, sample_rate, &CancelToken::new())
    }

    pub fn trace_with_cancel(
        &self,
        peaks: &RPeakSequence,
        sample_rate: f64,
        cancel: &CancelToken,
    ) -> Result<StageTrace> {
        if !(sample_rate > 0.0) || !sample_rate.is_finite() {
            return Err(ApneaError::InvalidInput(format!(
                "sampling frequency must be positive, got {}",
                sample_rate
            )));
        }
        let config = &self.config;
        let mut trace = StageTrace::default();

        cancel.check()?;
        trace.intervals = IntervalExtractor::new(sample_rate).process(peaks);

        cancel.check()?;
        trace.filtered_intervals = MeanFilter::new(&config.mean_filter).process(&trace.intervals);

        cancel.check()?;
        trace.resampled = Resampler::new(config.resample.rate_hz).process(&trace.filtered_intervals);

        cancel.check()?;
        let highpass =
            HighPassFilter::with_cutoff(config.resample.rate_hz, config.highpass.cutoff_hz);
        log::trace!("High-pass alpha {:.6}", highpass.alpha());
        trace.highpassed = highpass.process(&trace.resampled);

        cancel.check()?;
        trace.lowpassed = LowPassFilter::new(config.lowpass.window_len).process(&trace.highpassed);

        cancel.check()?;
        let hilbert = HilbertTransformer::new().process(&trace.lowpassed);
        trace.raw_amplitude = hilbert.amplitude;
        trace.raw_frequency = hilbert.frequency;

        cancel.check()?;
        let median = MedianFilter::new(config.median.window_len);
        trace.amplitude = median.process(&trace.raw_amplitude);
        trace.frequency = median.process(&trace.raw_frequency);

        cancel.check()?;
        trace.normalization_mean = Normalizer::normalize(&mut trace.amplitude);

        cancel.check()?;
        let detector = ApneaDetector::new(&config.detector);
        trace.thresholds = detector.thresholds(&trace.amplitude);
        trace.flags = detector.detect(&trace.amplitude, &trace.frequency)?;

        cancel.check()?;
        trace.result = EpisodeAggregator::aggregate(&trace.flags);

        log::debug!(
            "Stage sizes: rr={} filtered={} resampled={} hp={} lp={} hilbert={} median={} windows={}",
            trace.intervals.len(),
            trace.filtered_intervals.len(),
            trace.resampled.len(),
            trace.highpassed.len(),
            trace.lowpassed.len(),
            trace.raw_amplitude.len(),
            trace.amplitude.len(),
            trace.flags.len()
        );
        if trace.flags.is_empty() {
            log::warn!(
                "No analysis windows: {} R-peaks left {} samples after filtering",
                peaks.len(),
                trace.amplitude.len()
            );
        }

        Ok(trace)
    }
}

pub mod detector;
pub mod episodes;

pub use detector::{ApneaDetector, Thresholds};
pub use episodes::EpisodeAggregator;

use serde::Serialize;

/// Classification of one analysis window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowFlag {
    /// Timestamp of the first sample in the window, in seconds
    pub start_time: f64,
    /// Whether the window shows the apnea amplitude/frequency pattern
    pub is_apnea: bool,
}

impl WindowFlag {
    pub fn new(start_time: f64, is_apnea: bool) -> Self {
        Self {
            start_time,
            is_apnea,
        }
    }
}

/// Contiguous apnea span, bounds in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApneaEpisode {
    pub start: u64,
    pub end: u64,
}

impl ApneaEpisode {
    pub fn duration_secs(&self) -> u64 {
        self.end - self.start
    }
}

/// Final per-channel outcome: detected episodes and the fraction of
/// analysis windows classified as apnea.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetectionResult {
    episodes: Vec<ApneaEpisode>,
    apnea_fraction: f64,
    window_count: usize,
}

impl DetectionResult {
    pub(crate) fn new(episodes: Vec<ApneaEpisode>, apnea_fraction: f64, window_count: usize) -> Self {
        Self {
            episodes,
            apnea_fraction,
            window_count,
        }
    }

    /// Result for a channel that produced no analysis windows
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn episodes(&self) -> &[ApneaEpisode] {
        &self.episodes
    }

    /// Fraction of windows flagged as apnea, in `[0, 1]`
    pub fn apnea_fraction(&self) -> f64 {
        self.apnea_fraction
    }

    /// Number of analysis windows the fraction is based on
    pub fn window_count(&self) -> usize {
        self.window_count
    }

    pub fn is_empty(&self) -> bool {
        self.window_count == 0
    }

    /// Total time covered by episodes, in seconds
    pub fn total_apnea_secs(&self) -> u64 {
        self.episodes.iter().map(ApneaEpisode::duration_secs).sum()
    }
}

//! Configuration for the RR-interval apnea pipeline.
//!
//! Every empirical constant of the pipeline lives here with its default.
//! A TOML file only needs to name the values it overrides:
//!
//! ```
//! use apneaclub::config::ApneaConfig;
//!
//! let config = ApneaConfig::from_toml_str(
//!     r#"
//!     [detector]
//!     freq_threshold_hz = 0.05
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.detector.freq_threshold_hz, 0.05);
//! assert_eq!(config.median.window_len, 181);
//! ```

use crate::error::{ApneaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// ECG sampling frequency specification
///
/// Can be given either as a frequency in Hz or as a sample period in
/// milliseconds.
///
/// # Parsing formats
/// - `360` - frequency in Hz (no suffix)
/// - `360hz` or `360Hz` - frequency in Hz (explicit)
/// - `4ms` - sample period in milliseconds
///
/// # Example
/// ```
/// use apneaclub::config::SamplingFrequency;
///
/// let fs: SamplingFrequency = "4ms".parse().unwrap();
/// assert!((fs.as_hz() - 250.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingFrequency(f64);

impl SamplingFrequency {
    /// Create from frequency in Hz
    pub fn from_hz(hz: f64) -> Self {
        Self(hz)
    }

    /// Create from sample period in milliseconds
    pub fn from_period_ms(ms: f64) -> Self {
        Self(1000.0 / ms)
    }

    /// Get frequency in Hz
    pub fn as_hz(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for SamplingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}hz", self.0)
    }
}

impl FromStr for SamplingFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(num) = s.strip_suffix("ms") {
            let ms: f64 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid period: {}", s))?;
            if ms <= 0.0 || !ms.is_finite() {
                return Err("period must be positive".to_string());
            }
            return Ok(Self::from_period_ms(ms));
        }

        let num = s
            .strip_suffix("hz")
            .or_else(|| s.strip_suffix("Hz"))
            .or_else(|| s.strip_suffix("HZ"))
            .unwrap_or(s);

        let hz: f64 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid frequency: {}", s))?;
        if hz <= 0.0 || !hz.is_finite() {
            return Err("frequency must be positive".to_string());
        }
        Ok(Self::from_hz(hz))
    }
}

/// Full pipeline configuration
///
/// Use `ApneaConfig::default()` for the published algorithm constants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApneaConfig {
    /// RR outlier rejection
    pub mean_filter: MeanFilterConfig,
    /// Uniform resampling of the RR series
    pub resample: ResampleConfig,
    /// Baseline drift removal
    pub highpass: HighpassConfig,
    /// Moving-average smoothing
    pub lowpass: LowpassConfig,
    /// Median smoothing of Hilbert amplitude and frequency
    pub median: MedianConfig,
    /// Windowed apnea classification
    pub detector: DetectorConfig,
}

/// RR outlier rejection using a local windowed mean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeanFilterConfig {
    /// Window length in RR intervals (must be odd)
    pub window_len: usize,
    /// Lower physiological RR bound in seconds (exclusive)
    pub min_rr_secs: f64,
    /// Upper physiological RR bound in seconds (exclusive)
    pub max_rr_secs: f64,
    /// Accepted relative deviation from the local mean (0.2 = ±20%)
    pub tolerance: f64,
}

/// Resampling onto a uniform grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleConfig {
    /// Output rate in Hz
    pub rate_hz: f64,
}

/// Single-pole IIR high-pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighpassConfig {
    /// Cutoff frequency in Hz
    pub cutoff_hz: f64,
}

/// Moving-average low-pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowpassConfig {
    /// Window length in samples
    pub window_len: usize,
}

/// Sliding median
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedianConfig {
    /// Window length in samples
    pub window_len: usize,
}

/// Adaptive-threshold window classifier
///
/// The amplitude threshold is `amp_offset + amp_slope * (mid + 1) * 0.5`
/// where `mid` is the midpoint of the normalized amplitude range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Threshold intercept `a`
    pub amp_offset: f64,
    /// Threshold slope `b`
    pub amp_slope: f64,
    /// Maximum mean instantaneous frequency of an apnea window in Hz
    pub freq_threshold_hz: f64,
    /// Analysis window length in seconds
    pub window_secs: f64,
    /// Step between window starts in seconds
    pub step_secs: f64,
}

impl Default for MeanFilterConfig {
    fn default() -> Self {
        Self {
            window_len: 41,
            min_rr_secs: 0.4,
            max_rr_secs: 2.0,
            tolerance: 0.2,
        }
    }
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self { rate_hz: 1.0 }
    }
}

impl Default for HighpassConfig {
    fn default() -> Self {
        Self { cutoff_hz: 0.01 }
    }
}

impl Default for LowpassConfig {
    fn default() -> Self {
        Self { window_len: 5 }
    }
}

impl Default for MedianConfig {
    fn default() -> Self {
        Self { window_len: 181 }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            amp_offset: -0.555,
            amp_slope: 1.3,
            freq_threshold_hz: 0.06,
            window_secs: 300.0,
            step_secs: 60.0,
        }
    }
}

impl ApneaConfig {
    /// Parse a (possibly partial) TOML document and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ApneaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check that every window and rate is usable.
    pub fn validate(&self) -> Result<()> {
        let mf = &self.mean_filter;
        if mf.window_len < 3 || mf.window_len % 2 == 0 {
            return Err(ApneaError::Config(format!(
                "mean filter window must be odd and at least 3, got {}",
                mf.window_len
            )));
        }
        if !(mf.min_rr_secs < mf.max_rr_secs) {
            return Err(ApneaError::Config(format!(
                "RR bounds must satisfy min < max, got ({}, {})",
                mf.min_rr_secs, mf.max_rr_secs
            )));
        }
        if !(mf.tolerance > 0.0) {
            return Err(ApneaError::Config("mean filter tolerance must be positive".to_string()));
        }
        if !(self.resample.rate_hz > 0.0) || !self.resample.rate_hz.is_finite() {
            return Err(ApneaError::Config("resample rate must be positive".to_string()));
        }
        if !(self.highpass.cutoff_hz > 0.0) {
            return Err(ApneaError::Config("high-pass cutoff must be positive".to_string()));
        }
        if self.lowpass.window_len == 0 {
            return Err(ApneaError::Config("low-pass window must not be empty".to_string()));
        }
        if self.median.window_len == 0 {
            return Err(ApneaError::Config("median window must not be empty".to_string()));
        }
        let det = &self.detector;
        if !(det.window_secs > 0.0) || !(det.step_secs > 0.0) {
            return Err(ApneaError::Config(
                "detector window and step must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_frequency_from_hz() {
        let fs: SamplingFrequency = "360".parse().unwrap();
        assert!((fs.as_hz() - 360.0).abs() < 1e-9);

        let fs: SamplingFrequency = "360Hz".parse().unwrap();
        assert!((fs.as_hz() - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_sampling_frequency_from_period() {
        let fs: SamplingFrequency = "2ms".parse().unwrap();
        assert!((fs.as_hz() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_sampling_frequency_invalid() {
        assert!("abc".parse::<SamplingFrequency>().is_err());
        assert!("-100hz".parse::<SamplingFrequency>().is_err());
        assert!("0ms".parse::<SamplingFrequency>().is_err());
    }

    #[test]
    fn test_defaults_validate() {
        assert!(ApneaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ApneaConfig::from_toml_str(
            r#"
            [median]
            window_len = 61

            [detector]
            step_secs = 30.0
            "#,
        )
        .unwrap();
        assert_eq!(config.median.window_len, 61);
        assert_eq!(config.detector.step_secs, 30.0);
        assert_eq!(config.detector.window_secs, 300.0);
        assert_eq!(config.mean_filter, MeanFilterConfig::default());
    }

    #[test]
    fn test_even_mean_window_rejected() {
        let result = ApneaConfig::from_toml_str("[mean_filter]\nwindow_len = 40\n");
        assert!(matches!(result, Err(ApneaError::Config(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(ApneaConfig::from_toml_str("[detector\n").is_err());
    }
}

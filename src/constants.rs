//! Numeric constants for pipeline stability
//!
//! These constants define thresholds and epsilon values used throughout
//! the RR-interval pipeline to guard against degenerate arithmetic.

/// Smallest sample spacing (seconds) accepted when deriving a sampling rate
/// from adjacent timestamps. Used by the Hilbert stage.
pub const MIN_SAMPLE_SPACING: f64 = 1e-9;

/// Means with a magnitude below this are treated as zero by the normalizer.
pub const MIN_NORMALIZATION_MEAN: f64 = 1e-12;

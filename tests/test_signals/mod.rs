#![allow(dead_code)]

use apneaclub::simulation::{ApneaSpan, NoiseConfig, RhythmConfig, generate_rpeaks};
use apneaclub::{RPeakSequence, Sample, TimeSeries};
use std::f64::consts::PI;

pub const SAMPLE_RATE: f64 = 360.0;

/// R-peaks of a recording with slow RR oscillation during `spans`.
pub fn recording(duration_secs: f64, spans: &[(f64, f64)], seed: u64) -> RPeakSequence {
    let mut rhythm = RhythmConfig::default()
        .with_duration(duration_secs)
        .with_sample_rate(SAMPLE_RATE);
    for &(start, end) in spans {
        rhythm = rhythm.with_apnea(ApneaSpan::new(start, end));
    }
    let noise = NoiseConfig::default()
        .with_seed(seed)
        .with_jitter(0.005)
        .with_ectopic(0.002, 0.6);
    RPeakSequence::new(generate_rpeaks(&rhythm, &noise)).expect("generated peaks are increasing")
}

/// Uniformly sampled `amplitude * cos(2π f t)`.
pub fn sinusoid(n: usize, spacing: f64, freq_hz: f64, amplitude: f64) -> TimeSeries {
    TimeSeries::new(
        (0..n)
            .map(|i| {
                let t = i as f64 * spacing;
                Sample::new(t, amplitude * (2.0 * PI * freq_hz * t).cos())
            })
            .collect(),
    )
    .unwrap()
}

/// One sample per second, all equal to `value`.
pub fn constant(n: usize, value: f64) -> TimeSeries {
    TimeSeries::new((0..n).map(|i| Sample::new(i as f64, value)).collect()).unwrap()
}

//! FFT-based analytic signal and instantaneous amplitude / frequency.
//!
//! The spectrum of the real input is multiplied by the Hilbert multiplier
//! `h` and transformed back, giving the analytic signal `z`. `|z|` is the
//! instantaneous amplitude; the phase difference between neighbouring
//! samples, scaled by `Fs / 2π`, is the instantaneous frequency.
//!
//! rustfft plans a transform for any length (mixed radix, Rader or
//! Bluestein), so the record is never padded.

use crate::constants::MIN_SAMPLE_SPACING;
use crate::series::{Sample, TimeSeries};
use num_complex::Complex;
use rustfft::FftPlanner;
use std::f64::consts::PI;

/// Instantaneous amplitude and frequency on a shared timestamp axis.
#[derive(Debug, Clone, Default)]
pub struct HilbertOutput {
    pub amplitude: TimeSeries,
    pub frequency: TimeSeries,
}

pub struct HilbertTransformer;

impl HilbertTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Hilbert multiplier for an `n`-point spectrum.
    ///
    /// DC is kept, bins `1..n/2` are doubled and, for even `n`, the Nyquist
    /// bin is kept. For odd `n` the doubled range stops before `n/2`
    /// (integer division). Everything else is zeroed.
    pub fn multiplier(n: usize) -> Vec<f64> {
        let mut h = vec![0.0; n];
        if n == 0 {
            return h;
        }
        h[0] = 1.0;
        let half = n / 2;
        for value in h.iter_mut().take(half).skip(1) {
            *value = 2.0;
        }
        if n % 2 == 0 && half > 0 {
            h[half] = 1.0;
        }
        h
    }

    /// Complex analytic signal of `signal`, same length.
    pub fn analytic_signal(&self, signal: &[f64]) -> Vec<Complex<f64>> {
        let n = signal.len();
        if n == 0 {
            return Vec::new();
        }

        let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();

        let mut planner = FftPlanner::new();
        planner.plan_fft_forward(n).process(&mut buffer);

        for (bin, h) in buffer.iter_mut().zip(Self::multiplier(n)) {
            *bin *= h;
        }

        planner.plan_fft_inverse(n).process(&mut buffer);

        // rustfft leaves the inverse unnormalized
        let scale = 1.0 / n as f64;
        for value in buffer.iter_mut() {
            *value *= scale;
        }
        buffer
    }

    /// Instantaneous amplitude and frequency of a uniformly sampled series.
    ///
    /// Both outputs are one sample shorter than the input and share its
    /// timestamps minus the last one. Inputs with fewer than two samples or
    /// a non-positive spacing give empty outputs.
    pub fn process(&self, input: &TimeSeries) -> HilbertOutput {
        let samples = input.samples();
        if samples.len() < 2 {
            log::warn!("Hilbert transform needs at least 2 samples, got {}", samples.len());
            return HilbertOutput::default();
        }

        let spacing = samples[1].time - samples[0].time;
        if spacing < MIN_SAMPLE_SPACING {
            log::warn!("Hilbert transform got non-positive sample spacing {}", spacing);
            return HilbertOutput::default();
        }
        let fs = 1.0 / spacing;

        let values: Vec<f64> = input.values().collect();
        let z = self.analytic_signal(&values);

        let mut amplitude = Vec::with_capacity(z.len() - 1);
        let mut frequency = Vec::with_capacity(z.len() - 1);
        for (i, pair) in z.windows(2).enumerate() {
            let time = samples[i].time;
            let phase = wrapped_phase(pair[0]);
            let next_phase = wrapped_phase(pair[1]);
            amplitude.push(Sample::new(time, pair[0].norm()));
            frequency.push(Sample::new(time, fs / (2.0 * PI) * (next_phase - phase)));
        }

        HilbertOutput {
            amplitude: TimeSeries::from_ordered(amplitude),
            frequency: TimeSeries::from_ordered(frequency),
        }
    }
}

impl Default for HilbertTransformer {
    fn default() -> Self {
        Self::new()
    }
}

/// Phase of `z` mapped into `[0, 2π)`.
fn wrapped_phase(z: Complex<f64>) -> f64 {
    let phase = z.arg();
    if phase < 0.0 { phase + 2.0 * PI } else { phase }
}

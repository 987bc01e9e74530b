use std::f64::consts::PI;

/// Span of a recording during which the RR interval oscillates slowly,
/// the cyclic-variation pattern that accompanies obstructive apnea.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct ApneaSpan {
    pub start_secs: f64,
    pub end_secs: f64,
    /// Oscillation frequency in Hz (apnea cycles are typically 0.01-0.05 Hz)
    pub cycle_hz: f64,
    /// Peak RR deviation in seconds
    pub depth_secs: f64,
}

impl ApneaSpan {
    pub fn new(start_secs: f64, end_secs: f64) -> Self {
        Self {
            start_secs,
            end_secs,
            cycle_hz: 0.02,
            depth_secs: 0.1,
        }
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start_secs && t < self.end_secs
    }
}

/// Deterministic heart rhythm: baseline RR with respiratory modulation,
/// plus slow oscillation inside apnea spans.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct RhythmConfig {
    pub duration_secs: f64,
    /// ECG sampling frequency peak indices are expressed in, Hz
    pub sample_rate: f64,
    pub mean_rr_secs: f64,
    /// Respiratory sinus arrhythmia frequency in Hz
    pub respiration_hz: f64,
    /// Respiratory RR deviation in seconds
    pub respiration_depth_secs: f64,
    #[serde(default)]
    pub apnea: Vec<ApneaSpan>,
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            duration_secs: 3600.0,
            sample_rate: 360.0,
            mean_rr_secs: 1.0,
            respiration_hz: 0.12,
            respiration_depth_secs: 0.03,
            apnea: Vec::new(),
        }
    }
}

impl RhythmConfig {
    pub fn with_duration(mut self, duration_secs: f64) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_apnea(mut self, span: ApneaSpan) -> Self {
        self.apnea.push(span);
        self
    }

    /// RR interval of the beat that starts at `t` seconds.
    pub fn rr_at(&self, t: f64) -> f64 {
        let mut rr = self.mean_rr_secs
            + self.respiration_depth_secs * (2.0 * PI * self.respiration_hz * t).sin();
        for span in self.apnea.iter().filter(|s| s.contains(t)) {
            rr += span.depth_secs * (2.0 * PI * span.cycle_hz * (t - span.start_secs)).sin();
        }
        rr
    }

    /// Beat times in seconds, first beat at 0.
    pub fn beat_times(&self) -> Vec<f64> {
        let mut beats = Vec::with_capacity((self.duration_secs / self.mean_rr_secs) as usize + 1);
        let mut t = 0.0;
        while t < self.duration_secs {
            beats.push(t);
            t += self.rr_at(t).max(0.2);
        }
        beats
    }
}

/// Convert beat times to strictly increasing sample indices.
pub fn beat_times_to_indices(beats: &[f64], sample_rate: f64) -> Vec<u64> {
    let mut indices: Vec<u64> = Vec::with_capacity(beats.len());
    for &t in beats {
        let mut index = (t.max(0.0) * sample_rate).round() as u64;
        if let Some(&prev) = indices.last()
            && index <= prev
        {
            index = prev + 1;
        }
        indices.push(index);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beat_count_matches_mean_rr() {
        let rhythm = RhythmConfig::default().with_duration(600.0);
        let beats = rhythm.beat_times();
        assert!((beats.len() as i64 - 600).abs() <= 2, "got {} beats", beats.len());
    }

    #[test]
    fn test_apnea_span_modulates_rr() {
        let rhythm = RhythmConfig::default().with_apnea(ApneaSpan::new(100.0, 200.0));
        // Quarter cycle into the span: full positive deviation
        let t = 112.5;
        let baseline = 1.0 + 0.03 * (2.0 * PI * 0.12 * t).sin();
        assert!((rhythm.rr_at(t) - baseline - 0.1).abs() < 1e-9);
        assert!((rhythm.rr_at(250.0) - 1.0).abs() <= 0.03 + 1e-12);
    }

    #[test]
    fn test_indices_strictly_increasing() {
        let indices = beat_times_to_indices(&[0.0, 0.001, 0.002, 1.0], 360.0);
        assert_eq!(indices, vec![0, 1, 2, 360]);
    }
}

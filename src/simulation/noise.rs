use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use super::rhythm::{RhythmConfig, beat_times_to_indices};

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    pub jitter: Option<JitterConfig>,
    pub ectopic: Option<EctopicConfig>,
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_jitter(mut self, std_secs: f64) -> Self {
        self.jitter = Some(JitterConfig { std_secs });
        self
    }

    pub fn with_ectopic(mut self, probability: f64, prematurity: f64) -> Self {
        self.ectopic = Some(EctopicConfig {
            probability,
            prematurity,
        });
        self
    }
}

/// Gaussian beat-to-beat timing jitter
#[derive(Clone, Debug, serde::Deserialize)]
pub struct JitterConfig {
    pub std_secs: f64,
}

/// Premature beats followed by a compensatory pause
#[derive(Clone, Debug, serde::Deserialize)]
pub struct EctopicConfig {
    /// Chance that a given beat is followed by a premature beat
    pub probability: f64,
    /// Premature beat position as a fraction of the RR interval (e.g. 0.6)
    pub prematurity: f64,
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

fn apply_jitter(beats: &mut [f64], config: &JitterConfig, rng: &mut ChaCha8Rng) {
    if config.std_secs <= 0.0 {
        return;
    }
    let normal = Normal::new(0.0, config.std_secs).unwrap();
    for beat in beats.iter_mut().skip(1) {
        *beat += normal.sample(rng);
    }
}

fn insert_ectopic_beats(beats: &[f64], config: &EctopicConfig, rng: &mut ChaCha8Rng) -> Vec<f64> {
    let mut out = Vec::with_capacity(beats.len() + beats.len() / 10);
    for pair in beats.windows(2) {
        out.push(pair[0]);
        if rng.random::<f64>() < config.probability {
            out.push(pair[0] + (pair[1] - pair[0]) * config.prematurity);
        }
    }
    if let Some(&last) = beats.last() {
        out.push(last);
    }
    out
}

/// Synthetic R-peak sample indices for `rhythm` with the given noise.
pub fn generate_rpeaks(rhythm: &RhythmConfig, noise: &NoiseConfig) -> Vec<u64> {
    let mut rng = create_rng(noise.seed);
    let mut beats = rhythm.beat_times();

    if let Some(ref jitter) = noise.jitter {
        apply_jitter(&mut beats, jitter, &mut rng);
    }
    if let Some(ref ectopic) = noise.ectopic {
        beats = insert_ectopic_beats(&beats, ectopic, &mut rng);
    }

    beat_times_to_indices(&beats, rhythm.sample_rate)
}

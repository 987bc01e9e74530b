mod noise;
mod rhythm;

pub use noise::{EctopicConfig, JitterConfig, NoiseConfig, generate_rpeaks};
pub use rhythm::{ApneaSpan, RhythmConfig, beat_times_to_indices};

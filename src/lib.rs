pub mod apnea;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod output;
pub mod processing;
pub mod series;
pub mod session;
pub mod signal_processing;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use apnea::{ApneaEpisode, DetectionResult, WindowFlag};
pub use config::ApneaConfig;
pub use error::{ApneaError, Result};
pub use processing::{ApneaProcessor, CancelToken, StageTrace};
pub use series::{RPeakSequence, Sample, TimeSeries};
pub use session::{AnalysisSession, ChannelInput, ChannelReport, SessionState};

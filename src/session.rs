//! Multi-channel analysis session.
//!
//! A session owns a list of named channels and analyses them one per
//! [`AnalysisSession::step`]. Results become readable once every channel
//! has been processed; reading them earlier is a programming error and
//! fails with [`ApneaError::PrematureRead`]. The session can be aborted at
//! any time through [`AnalysisSession::abort`] or a cloned [`CancelToken`].
//! Channels finished before an abort keep their results; the rest are
//! reported as aborted.

use crate::apnea::DetectionResult;
use crate::config::ApneaConfig;
use crate::error::{ApneaError, Result};
use crate::processing::{ApneaProcessor, CancelToken, StageTrace};
use crate::series::RPeakSequence;
use serde::Serialize;

/// R-peaks of one named channel
#[derive(Debug, Clone)]
pub struct ChannelInput {
    pub name: String,
    pub peaks: RPeakSequence,
    /// Sampling frequency the peak indices refer to, Hz
    pub sample_rate: f64,
}

impl ChannelInput {
    pub fn new(name: impl Into<String>, peaks: RPeakSequence, sample_rate: f64) -> Self {
        Self {
            name: name.into(),
            peaks,
            sample_rate,
        }
    }
}

/// Outcome of one channel: a result, or the error that stopped it
#[derive(Debug, Clone, Serialize)]
pub struct ChannelReport {
    pub channel: String,
    pub result: Option<DetectionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChannelReport {
    /// Label/value pairs in reporting order: the apnea fraction first, then
    /// one entry per episode numbered from 1.
    pub fn labeled_stats(&self) -> Vec<(String, String)> {
        let Some(result) = &self.result else {
            return Vec::new();
        };

        let mut stats = Vec::with_capacity(result.episodes().len() + 1);
        stats.push((
            format!("{} apnea percentage", self.channel),
            result.apnea_fraction().to_string(),
        ));
        for (k, episode) in result.episodes().iter().enumerate() {
            stats.push((
                format!("{}, interval {}", self.channel, k + 1),
                format!("{} - {}", episode.start, episode.end),
            ));
        }
        stats
    }

    /// Formatted report lines, `"<label>: <value>"`
    pub fn lines(&self) -> Vec<String> {
        self.labeled_stats()
            .into_iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Ended,
    Aborted,
}

pub struct AnalysisSession {
    processor: ApneaProcessor,
    channels: Vec<ChannelInput>,
    next_channel: usize,
    reports: Vec<ChannelReport>,
    cancel: CancelToken,
    state: SessionState,
    traced_channel: Option<usize>,
    trace: Option<StageTrace>,
}

impl AnalysisSession {
    pub fn new(config: &ApneaConfig, channels: Vec<ChannelInput>) -> Result<Self> {
        let state = if channels.is_empty() {
            SessionState::Ended
        } else {
            SessionState::Running
        };
        let processor = ApneaProcessor::new(config)?;
        log::debug!(
            "Session over {} channels, {} s windows every {} s",
            channels.len(),
            processor.config().detector.window_secs,
            processor.config().detector.step_secs
        );
        Ok(Self {
            processor,
            reports: Vec::with_capacity(channels.len()),
            channels,
            next_channel: 0,
            cancel: CancelToken::new(),
            state,
            traced_channel: None,
            trace: None,
        })
    }

    /// Keep every intermediate series of channel `index` when it is analysed.
    pub fn keep_trace(&mut self, index: usize) {
        self.traced_channel = Some(index);
    }

    /// Stage trace of the channel chosen with [`AnalysisSession::keep_trace`],
    /// once that channel has been analysed successfully.
    pub fn trace(&self) -> Option<&StageTrace> {
        self.trace.as_ref()
    }

    /// Token that aborts this session when cancelled, usable from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn abort(&self) {
        self.cancel.cancel();
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ended(&self) -> bool {
        self.state == SessionState::Ended
    }

    /// Analyse the next channel and return the resulting state.
    pub fn step(&mut self) -> SessionState {
        if self.state != SessionState::Running {
            return self.state;
        }
        if self.cancel.is_cancelled() {
            log::info!("Session aborted after {} channels", self.reports.len());
            return self.mark_aborted();
        }

        let index = self.next_channel;
        let channel = &self.channels[index];
        let outcome = if self.traced_channel == Some(index) {
            self.processor
                .trace_with_cancel(&channel.peaks, channel.sample_rate, &self.cancel)
                .map(|trace| {
                    let result = trace.result.clone();
                    self.trace = Some(trace);
                    result
                })
        } else {
            self.processor
                .process_with_cancel(&channel.peaks, channel.sample_rate, &self.cancel)
        };

        match outcome {
            Ok(result) => {
                log::info!(
                    "{}: {} episodes, apnea fraction {:.3} over {} windows",
                    channel.name,
                    result.episodes().len(),
                    result.apnea_fraction(),
                    result.window_count()
                );
                self.reports.push(ChannelReport {
                    channel: channel.name.clone(),
                    result: Some(result),
                    error: None,
                });
            }
            Err(ApneaError::Aborted) => {
                log::info!("{}: aborted", channel.name);
                return self.mark_aborted();
            }
            Err(e) => {
                log::warn!("{}: analysis failed: {}", channel.name, e);
                self.reports.push(ChannelReport {
                    channel: channel.name.clone(),
                    result: None,
                    error: Some(e.to_string()),
                });
            }
        }

        self.next_channel += 1;
        if self.next_channel >= self.channels.len() {
            self.state = SessionState::Ended;
        }
        self.state
    }

    /// Record every channel not yet analysed as aborted.
    fn mark_aborted(&mut self) -> SessionState {
        let error = ApneaError::Aborted.to_string();
        for channel in &self.channels[self.next_channel..] {
            self.reports.push(ChannelReport {
                channel: channel.name.clone(),
                result: None,
                error: Some(error.clone()),
            });
        }
        self.next_channel = self.channels.len();
        self.state = SessionState::Aborted;
        self.state
    }

    /// Step until the session ends or is aborted, then return the reports.
    pub fn run(&mut self) -> Result<&[ChannelReport]> {
        while self.step() == SessionState::Running {}
        self.reports()
    }

    /// Per-channel reports, one per channel, available once the session has
    /// ended or been aborted. Channels cut off by an abort carry an error
    /// and no result.
    pub fn reports(&self) -> Result<&[ChannelReport]> {
        match self.state {
            SessionState::Ended | SessionState::Aborted => Ok(&self.reports),
            SessionState::Running => Err(ApneaError::PrematureRead),
        }
    }

    /// All channels' label/value pairs, available once the session has
    /// ended or been aborted.
    pub fn labeled_stats(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .reports()?
            .iter()
            .flat_map(ChannelReport::labeled_stats)
            .collect())
    }
}

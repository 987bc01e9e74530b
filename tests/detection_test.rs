mod test_signals;

use apneaclub::config::ApneaConfig;
use apneaclub::output::{OutputFormat, create_formatter};
use apneaclub::{
    AnalysisSession, ApneaError, ApneaProcessor, CancelToken, ChannelInput, SessionState,
};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn test_detects_apnea_span() {
    let peaks = test_signals::recording(5400.0, &[(1800.0, 3600.0)], 42);
    let processor = ApneaProcessor::new(&ApneaConfig::default()).unwrap();
    let result = processor.process(&peaks, test_signals::SAMPLE_RATE).unwrap();

    let covering = result
        .episodes()
        .iter()
        .find(|e| e.start <= 1850 && e.end >= 3300);
    assert!(
        covering.is_some(),
        "No episode covers the apnea span: {:?}",
        result.episodes()
    );
    let episode = covering.unwrap();
    assert!(episode.start >= 1500, "Episode starts too early: {:?}", episode);
    assert!(episode.end <= 3800, "Episode ends too late: {:?}", episode);

    assert!(
        result.total_apnea_secs() <= 2300,
        "Too much apnea: {:?}",
        result.episodes()
    );
    assert!(
        result.apnea_fraction() > 0.2 && result.apnea_fraction() < 0.6,
        "Unexpected apnea fraction {}",
        result.apnea_fraction()
    );
}

#[test]
fn test_normal_rhythm_has_no_apnea() {
    let peaks = test_signals::recording(3600.0, &[], 7);
    let processor = ApneaProcessor::new(&ApneaConfig::default()).unwrap();
    let trace = processor.trace(&peaks, test_signals::SAMPLE_RATE).unwrap();

    assert!(!trace.flags.is_empty());
    assert!(trace.flags.iter().all(|f| !f.is_apnea));
    assert!(trace.result.episodes().is_empty());
    assert_eq!(trace.result.apnea_fraction(), 0.0);
}

#[test]
fn test_apnea_throughout() {
    let peaks = test_signals::recording(3600.0, &[(0.0, 3600.0)], 8);
    let processor = ApneaProcessor::new(&ApneaConfig::default()).unwrap();
    let result = processor.process(&peaks, test_signals::SAMPLE_RATE).unwrap();

    assert!(
        result.apnea_fraction() > 0.9,
        "Unexpected apnea fraction {}",
        result.apnea_fraction()
    );
    assert!(!result.episodes().is_empty());
}

#[test]
fn test_session_reports_each_channel() {
    let channels = vec![
        ChannelInput::new(
            "MLII",
            test_signals::recording(5400.0, &[(1800.0, 3600.0)], 1),
            test_signals::SAMPLE_RATE,
        ),
        ChannelInput::new(
            "V1",
            test_signals::recording(3600.0, &[], 2),
            test_signals::SAMPLE_RATE,
        ),
    ];
    let mut session = AnalysisSession::new(&ApneaConfig::default(), channels).unwrap();
    while session.step() == SessionState::Running {}

    let stats = session.labeled_stats().unwrap();
    assert_eq!(stats[0].0, "MLII apnea percentage");
    assert!(stats.iter().any(|(label, _)| label == "MLII, interval 1"));
    assert!(
        stats
            .iter()
            .any(|(label, value)| label == "V1 apnea percentage" && value == "0")
    );
    assert!(!stats.iter().any(|(label, _)| label.starts_with("V1, interval")));

    let formatter = create_formatter(OutputFormat::Csv, false);
    let reports = session.reports().unwrap();
    assert!(formatter.format(&reports[0]).starts_with("MLII,"));
}

#[test]
fn test_cancel_from_another_thread_during_processing() {
    let peaks = test_signals::recording(7200.0, &[(2000.0, 4000.0)], 21);
    let processor = ApneaProcessor::new(&ApneaConfig::default()).unwrap();
    let cancel = CancelToken::new();
    let started = Arc::new(Barrier::new(2));

    let canceller = {
        let cancel = cancel.clone();
        let started = Arc::clone(&started);
        thread::spawn(move || {
            started.wait();
            thread::sleep(Duration::from_millis(20));
            cancel.cancel();
        })
    };

    started.wait();
    let mut completed = 0usize;
    let outcome = loop {
        match processor.process_with_cancel(&peaks, test_signals::SAMPLE_RATE, &cancel) {
            Ok(_) => completed += 1,
            Err(e) => break e,
        }
    };
    canceller.join().unwrap();

    assert!(
        matches!(outcome, ApneaError::Aborted),
        "Unexpected error {:?} after {} runs",
        outcome,
        completed
    );
    assert!(cancel.is_cancelled());
}

#[test]
fn test_session_cancelled_from_another_thread() {
    let channels: Vec<ChannelInput> = (0..4)
        .map(|i| {
            ChannelInput::new(
                format!("ch{}", i),
                test_signals::recording(3600.0, &[(1200.0, 2400.0)], 30 + i),
                test_signals::SAMPLE_RATE,
            )
        })
        .collect();
    let mut session = AnalysisSession::new(&ApneaConfig::default(), channels).unwrap();

    assert_eq!(session.step(), SessionState::Running);
    let cancel = session.cancel_token();
    thread::spawn(move || cancel.cancel()).join().unwrap();
    assert_eq!(session.step(), SessionState::Aborted);

    let reports = session.reports().unwrap();
    assert_eq!(reports.len(), 4);
    assert!(reports[0].result.is_some());
    for report in &reports[1..] {
        assert!(report.result.is_none(), "{} leaked a result", report.channel);
        assert_eq!(report.error.as_deref(), Some("Analysis aborted"));
    }

    let stats = session.labeled_stats().unwrap();
    assert_eq!(stats[0].0, "ch0 apnea percentage");
    assert!(stats.iter().all(|(label, _)| label.starts_with("ch0")));
}

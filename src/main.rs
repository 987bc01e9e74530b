use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use apneaclub::config::{ApneaConfig, SamplingFrequency};
use apneaclub::io::read_rpeaks;
use apneaclub::output::{OutputFormat, create_formatter};
use apneaclub::{AnalysisSession, ChannelInput, RPeakSequence, StageTrace};

#[derive(Parser, Debug)]
#[command(name = "apneaclub")]
#[command(about = "Detect sleep apnea episodes from ECG R-peak positions", long_about = None)]
struct Args {
    /// R-peak files to analyze, one channel per file
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// ECG sampling frequency the peak indices refer to (e.g., "360", "250hz", "4ms")
    #[arg(long, default_value = "360")]
    fs: SamplingFrequency,

    /// TOML file overriding pipeline constants
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write every intermediate stage of the first file as JSON
    #[arg(long)]
    dump_stages: Option<PathBuf>,
}

fn channel_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn load_channel(path: &Path, sample_rate: f64) -> Result<ChannelInput> {
    let indices = read_rpeaks(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let peaks = RPeakSequence::new(indices)
        .with_context(|| format!("Invalid R-peaks in {}", path.display()))?;
    Ok(ChannelInput::new(channel_name(path), peaks, sample_rate))
}

fn dump_stages(path: &Path, channel: &str, trace: &StageTrace) -> Result<()> {
    let json = serde_json::to_string_pretty(trace).context("Failed to serialize stages")?;
    fs::write(path, json).context("Failed to write stage dump")?;
    log::info!("Stage dump for {} written to {}", channel, path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match args.config {
        Some(ref path) => ApneaConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ApneaConfig::default(),
    };

    let sample_rate = args.fs.as_hz();
    let channels = args
        .files
        .iter()
        .map(|path| load_channel(path, sample_rate))
        .collect::<Result<Vec<_>>>()?;

    let mut session = AnalysisSession::new(&config, channels)?;
    if args.dump_stages.is_some() {
        session.keep_trace(0);
    }
    let reports = session.run()?.to_vec();

    if let Some(path) = args.dump_stages.as_deref() {
        match (session.trace(), reports.first()) {
            (Some(trace), Some(first)) => dump_stages(path, &first.channel, trace)?,
            _ => log::warn!("No stage trace to dump: the first channel did not complete"),
        }
    }

    let formatter = create_formatter(args.format, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }
    for report in &reports {
        println!("{}", formatter.format(report));
    }

    Ok(())
}

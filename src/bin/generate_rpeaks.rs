use anyhow::{Context, Result};
use apneaclub::io::write_rpeaks;
use apneaclub::simulation::{ApneaSpan, NoiseConfig, RhythmConfig, generate_rpeaks};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "generate_rpeaks")]
#[command(about = "Generate synthetic R-peak files with configurable apnea spans and noise")]
struct Args {
    /// TOML configuration file ([rhythm] and [noise] sections)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "data/synthetic")]
    output_dir: PathBuf,

    /// Apnea spans in seconds: comma-separated "start-end" pairs (e.g., "1800-3600,5000-5600")
    #[arg(short, long, default_value = "")]
    apnea: String,

    /// Number of files to generate
    #[arg(short, long, default_value_t = 1)]
    trials: u32,

    /// Base seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Recording duration in seconds
    #[arg(short, long, default_value_t = 3600.0)]
    duration: f64,

    /// ECG sample rate in Hz
    #[arg(long, default_value_t = 360.0)]
    sample_rate: f64,

    /// Beat timing jitter standard deviation in seconds (CLI override)
    #[arg(long)]
    jitter: Option<f64>,

    /// Probability of a premature beat after each beat (CLI override)
    #[arg(long)]
    ectopic_rate: Option<f64>,

    /// Output filename prefix
    #[arg(long, default_value = "synth")]
    prefix: String,

    /// Generate manifest.json
    #[arg(long)]
    manifest: bool,
}

#[derive(Debug, Deserialize, Default)]
struct TomlConfig {
    rhythm: Option<RhythmConfig>,
    #[serde(default)]
    noise: NoiseConfig,
}

#[derive(Debug, serde::Serialize)]
struct ManifestEntry {
    file: String,
    trial: u32,
    seed: u64,
    beats: usize,
}

#[derive(Debug, serde::Serialize)]
struct Manifest {
    sample_rate: f64,
    duration: f64,
    apnea: Vec<ApneaSpan>,
    files: Vec<ManifestEntry>,
}

fn parse_spans(s: &str) -> Result<Vec<ApneaSpan>> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            let (start, end) = p
                .split_once('-')
                .context("Invalid span format. Use 'start-end'")?;
            let start: f64 = start.trim().parse().context("Invalid span start")?;
            let end: f64 = end.trim().parse().context("Invalid span end")?;
            if end <= start {
                anyhow::bail!("Span end must be after start: {}", p);
            }
            Ok(ApneaSpan::new(start, end))
        })
        .collect()
}

fn load_toml_config(path: &PathBuf) -> Result<TomlConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    fs::create_dir_all(&args.output_dir).context("Failed to create output directory")?;

    let toml_config = if let Some(ref config_path) = args.config {
        load_toml_config(config_path)?
    } else {
        TomlConfig::default()
    };

    let mut rhythm = toml_config.rhythm.unwrap_or_else(|| {
        RhythmConfig::default()
            .with_duration(args.duration)
            .with_sample_rate(args.sample_rate)
    });
    rhythm.apnea.extend(parse_spans(&args.apnea)?);

    let mut noise = toml_config.noise;
    if let Some(jitter) = args.jitter {
        noise = noise.with_jitter(jitter);
    }
    if let Some(rate) = args.ectopic_rate {
        noise = noise.with_ectopic(rate, 0.6);
    }

    let base_seed = args.seed.or(noise.seed).unwrap_or(0);
    let mut manifest_entries = Vec::new();

    for trial in 0..args.trials {
        let seed = base_seed + trial as u64;
        let peaks = generate_rpeaks(&rhythm, &noise.clone().with_seed(seed));

        let filename = format!("{}_t{:02}.txt", args.prefix, trial);
        let filepath = args.output_dir.join(&filename);
        write_rpeaks(&filepath, &peaks).context("Failed to write R-peak file")?;

        manifest_entries.push(ManifestEntry {
            file: filename,
            trial,
            seed,
            beats: peaks.len(),
        });
        eprint!("\rGenerating: {}/{}", trial + 1, args.trials);
    }
    eprintln!();

    if args.manifest {
        let manifest = Manifest {
            sample_rate: rhythm.sample_rate,
            duration: rhythm.duration_secs,
            apnea: rhythm.apnea.clone(),
            files: manifest_entries,
        };
        let manifest_path = args.output_dir.join("manifest.json");
        let manifest_json =
            serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        fs::write(&manifest_path, manifest_json).context("Failed to write manifest")?;
        eprintln!("Manifest written to: {}", manifest_path.display());
    }

    eprintln!(
        "Generated {} files in {}",
        args.trials,
        args.output_dir.display()
    );
    Ok(())
}

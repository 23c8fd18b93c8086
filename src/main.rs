use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use kaiserband::audio::{PlaybackSession, read_wav_mono};
use kaiserband::config::AppConfig;
use kaiserband::output::{DesignSummary, OutputFormat, create_formatter};
use kaiserband::signal_processing::frequency_response;
use kaiserband::{FilterPipeline, save_wav};

/// Slack on top of the buffer duration before playback counts as stalled
const PLAYBACK_MARGIN: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(name = "kaiserband")]
#[command(about = "Zero-phase Kaiser-window FIR bandpass filtering of WAV files", long_about = None)]
struct Args {
    /// Input WAV file (mixed down to mono)
    input: PathBuf,

    /// Write the filtered audio to this WAV file (16-bit mono)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Lower cutoff in Hz
    #[arg(long)]
    low: Option<f64>,

    /// Upper cutoff in Hz
    #[arg(long)]
    high: Option<f64>,

    /// Transition width in Hz
    #[arg(long)]
    transition: Option<f64>,

    /// Stopband attenuation in dB
    #[arg(long)]
    attenuation: Option<f64>,

    /// Write the frequency response to this file
    #[arg(long)]
    response: Option<PathBuf>,

    /// Number of frequency response points
    #[arg(long)]
    response_points: Option<usize>,

    /// Output format for the design summary and response: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Play the filtered audio on the default output device
    #[arg(long)]
    play: bool,

    /// Do not peak-normalize the saved file
    #[arg(long)]
    no_normalize: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_toml_file(path).context("Failed to load config file")?,
        None => AppConfig::default(),
    };
    apply_overrides(&mut config, &args);

    let input = read_wav_mono(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let pipeline = FilterPipeline::new(config.filter);
    let result = pipeline.run(&input).context("Filtering failed")?;

    let formatter = create_formatter(args.format);
    println!("{}", formatter.format_design(&DesignSummary::from(&result.design)));

    if let Some(path) = &args.response {
        let response = frequency_response(
            &result.design.coefficients,
            result.design.spec.sample_rate_hz,
            config.response.points,
        );
        fs::write(path, formatter.format_response(&response))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Wrote {} response points to {}", response.len(), path.display());
    }

    if let Some(path) = &args.output {
        save_wav(path, &result.filtered, config.output.normalize_peak)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if args.play {
        let session = PlaybackSession::start(&result.filtered).context("Playback failed")?;
        let progress = session.progress();
        progress
            .wait(progress.duration() + PLAYBACK_MARGIN, Duration::from_millis(50))
            .context("Playback failed")?;
        // Let the device drain its last buffer
        thread::sleep(Duration::from_millis(200));
        session.stop();
    }

    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(low) = args.low {
        config.filter.low_cutoff_hz = low;
    }
    if let Some(high) = args.high {
        config.filter.high_cutoff_hz = high;
    }
    if let Some(transition) = args.transition {
        config.filter.transition_width_hz = transition;
    }
    if let Some(attenuation) = args.attenuation {
        config.filter.stopband_attenuation_db = attenuation;
    }
    if let Some(points) = args.response_points {
        config.response.points = points;
    }
    if args.no_normalize {
        config.output.normalize_peak = false;
    }
}

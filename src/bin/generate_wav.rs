use anyhow::{Context, Result};
use clap::Parser;
use kaiserband::save_wav;
use kaiserband::simulation::{NoiseConfig, Tone, add_noise, generate_tones};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "generate_wav")]
#[command(about = "Generate synthetic tone mixtures for exercising the bandpass filter")]
struct Args {
    /// TOML signal configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output WAV file
    #[arg(short, long, default_value = "data/synthetic/tones.wav")]
    output: PathBuf,

    /// Tones as comma-separated "freq:amplitude" pairs (e.g., "50:0.4,3000:0.4")
    #[arg(short, long, default_value = "50:0.4,3000:0.4")]
    tones: String,

    /// Seed for reproducible noise
    #[arg(short, long)]
    seed: Option<u64>,

    /// Signal duration in seconds
    #[arg(short, long, default_value_t = 1.0)]
    duration: f64,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 44100)]
    sample_rate: u32,

    /// AWGN SNR in dB (CLI override)
    #[arg(long)]
    snr: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlConfig {
    tones: Option<Vec<Tone>>,
    noise: Option<NoiseConfig>,
}

fn parse_tones(s: &str) -> Result<Vec<Tone>> {
    s.split(',')
        .map(|part| {
            let (freq, amp) = part
                .trim()
                .split_once(':')
                .context("Invalid tone format. Use 'freq:amplitude'")?;
            let freq: f64 = freq.trim().parse().context("Invalid tone frequency")?;
            let amp: f64 = amp.trim().parse().context("Invalid tone amplitude")?;
            Ok(Tone::new(freq, amp))
        })
        .collect()
}

fn load_toml_config(path: &PathBuf) -> Result<TomlConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let toml_config = if let Some(ref config_path) = args.config {
        load_toml_config(config_path)?
    } else {
        TomlConfig::default()
    };

    let tones = match toml_config.tones {
        Some(tones) if !tones.is_empty() => tones,
        _ => parse_tones(&args.tones)?,
    };

    let mut noise = toml_config.noise.unwrap_or_default();
    if let Some(snr) = args.snr {
        noise = noise.with_awgn(snr);
    }
    if let Some(seed) = args.seed {
        noise = noise.with_seed(seed);
    }

    let mut buffer = generate_tones(args.duration, args.sample_rate, &tones);
    add_noise(&mut buffer.samples, &noise);

    if let Some(parent) = args.output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    save_wav(&args.output, &buffer, true).context("Failed to write WAV file")?;

    eprintln!(
        "Wrote {} ({} tones, {:.2}s @ {} Hz)",
        args.output.display(),
        tones.len(),
        buffer.duration_secs(),
        args.sample_rate
    );

    Ok(())
}
